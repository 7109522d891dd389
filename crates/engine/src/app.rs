//! Application state and composition.

use std::sync::Arc;

use spellring_domain::RingSettings;

use crate::infrastructure::ports::{CasterDirectory, ClockPort, HostDocumentStore};
use crate::use_cases;
use crate::use_cases::ring::{CastSpell, InspectRing, RemoveSpell, RingDocuments, StoreSpell};

/// Main application state.
///
/// Holds the ports and the use cases built on top of them.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Container for the injected ports.
pub struct Repositories {
    pub documents: Arc<dyn HostDocumentStore>,
    pub casters: Arc<dyn CasterDirectory>,
}

/// Container for all use cases.
pub struct UseCases {
    pub ring: use_cases::RingUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        documents: Arc<dyn HostDocumentStore>,
        casters: Arc<dyn CasterDirectory>,
        clock: Arc<dyn ClockPort>,
        settings: RingSettings,
    ) -> Self {
        let ring_documents = Arc::new(RingDocuments::new(documents.clone(), settings));

        let ring = use_cases::RingUseCases::new(
            Arc::new(StoreSpell::new(
                ring_documents.clone(),
                casters.clone(),
                clock,
            )),
            Arc::new(CastSpell::new(ring_documents.clone())),
            Arc::new(RemoveSpell::new(ring_documents.clone())),
            Arc::new(InspectRing::new(ring_documents, casters.clone())),
        );

        Self {
            repositories: Repositories { documents, casters },
            use_cases: UseCases { ring },
        }
    }
}
