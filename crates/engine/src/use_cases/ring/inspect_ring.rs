//! Read-only ring queries.

use std::sync::Arc;

use spellring_domain::{CasterId, ItemId, SlotOption};

use crate::infrastructure::ports::CasterDirectory;

use super::documents::RingDocuments;
use super::error::RingError;
use super::types::RingSummary;

pub struct InspectRing {
    documents: Arc<RingDocuments>,
    casters: Arc<dyn CasterDirectory>,
}

impl InspectRing {
    pub fn new(documents: Arc<RingDocuments>, casters: Arc<dyn CasterDirectory>) -> Self {
        Self { documents, casters }
    }

    pub async fn execute(&self, item_id: &ItemId) -> Result<RingSummary, RingError> {
        let ledger = self.documents.load(item_id).await?.ledger;
        Ok(RingSummary {
            used: ledger.compute_used_levels(),
            remaining: ledger.remaining_capacity(),
            capacity: ledger.capacity(),
            entries: ledger.entries().to_vec(),
        })
    }

    /// Slots `caster_id` could spend to put a `base_level` spell into this
    /// ring right now. Levels the ring has no room for are left out; pools
    /// with no slots left are kept with `available == 0`.
    pub async fn storable_levels(
        &self,
        item_id: &ItemId,
        caster_id: &CasterId,
        base_level: u8,
    ) -> Result<Vec<SlotOption>, RingError> {
        let caster = self
            .casters
            .profile(caster_id)
            .await?
            .ok_or_else(|| RingError::CasterNotFound(caster_id.clone()))?;
        let ledger = self.documents.load(item_id).await?.ledger;

        Ok(caster
            .storable_slot_options(base_level)
            .into_iter()
            .filter(|option| ledger.can_store(option.level))
            .collect())
    }
}
