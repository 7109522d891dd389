//! Loading and saving a ring's ledger through the host document store.

use std::sync::Arc;

use spellring_domain::{ItemId, RingSettings, SpellStorageLedger};

use crate::infrastructure::ports::{HostDocumentStore, RepoError};

use super::error::RingError;

/// A ledger read from the host, plus the revision a save must match.
pub struct LoadedLedger {
    pub ledger: SpellStorageLedger,
    pub expected_revision: u64,
}

/// Ledger access shared by the ring use cases.
pub struct RingDocuments {
    store: Arc<dyn HostDocumentStore>,
    settings: RingSettings,
}

impl RingDocuments {
    pub fn new(store: Arc<dyn HostDocumentStore>, settings: RingSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &RingSettings {
        &self.settings
    }

    /// Read the item's ledger. A missing document is an empty ring.
    pub async fn load(&self, item_id: &ItemId) -> Result<LoadedLedger, RingError> {
        let Some(raw) = self.store.load(item_id).await? else {
            let ledger = self.settings.empty_ledger();
            return Ok(LoadedLedger {
                expected_revision: ledger.revision(),
                ledger,
            });
        };

        let (ledger, report) =
            SpellStorageLedger::load_with_capacity(&raw, self.settings.capacity_levels);
        if report.dropped > 0 {
            tracing::warn!(
                item_id = %item_id,
                dropped = report.dropped,
                "Skipped malformed stored spell records"
            );
        }
        if report.revision_reset {
            tracing::warn!(
                item_id = %item_id,
                "Ring document revision out of range; counting from 0"
            );
        }
        if report.is_over_capacity() {
            tracing::warn!(
                item_id = %item_id,
                used_levels = report.used_levels,
                capacity = report.capacity,
                "Ring holds more levels than its capacity"
            );
        }

        Ok(LoadedLedger {
            expected_revision: ledger.revision(),
            ledger,
        })
    }

    /// Write the ledger back, failing if another writer got there first.
    pub async fn save(
        &self,
        item_id: &ItemId,
        ledger: &SpellStorageLedger,
        expected_revision: u64,
    ) -> Result<(), RingError> {
        let document = ledger.serialize().map_err(|e| {
            tracing::error!(item_id = %item_id, error = %e, "Failed to serialize ring ledger");
            RingError::PersistenceFailure(RepoError::serialization(e).to_string())
        })?;

        match self.store.save(item_id, document, expected_revision).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::warn!(
                    item_id = %item_id,
                    expected_revision,
                    "Ring document changed since it was read; write rejected"
                );
                Err(RingError::PersistenceFailure(format!(
                    "ring {item_id} was modified concurrently"
                )))
            }
            Err(e) => {
                tracing::warn!(item_id = %item_id, error = %e, "Failed to save ring document");
                Err(RingError::PersistenceFailure(e.to_string()))
            }
        }
    }
}
