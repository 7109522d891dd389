//! Ring of Spell Storing use cases.
//!
//! Every operation is load, mutate, save against the host document. A save
//! only lands if nobody else wrote the ring in between.

use std::sync::Arc;

mod cast_spell;
mod documents;
mod error;
mod inspect_ring;
mod remove_spell;
mod store_spell;
mod types;

pub use cast_spell::CastSpell;
pub use documents::{LoadedLedger, RingDocuments};
pub use error::RingError;
pub use inspect_ring::InspectRing;
pub use remove_spell::RemoveSpell;
pub use store_spell::StoreSpell;
pub use types::{CastOutcome, RingSummary};

/// Container for ring use cases.
pub struct RingUseCases {
    pub store: Arc<StoreSpell>,
    pub cast: Arc<CastSpell>,
    pub remove: Arc<RemoveSpell>,
    pub inspect: Arc<InspectRing>,
}

impl RingUseCases {
    pub fn new(
        store: Arc<StoreSpell>,
        cast: Arc<CastSpell>,
        remove: Arc<RemoveSpell>,
        inspect: Arc<InspectRing>,
    ) -> Self {
        Self {
            store,
            cast,
            remove,
            inspect,
        }
    }
}
