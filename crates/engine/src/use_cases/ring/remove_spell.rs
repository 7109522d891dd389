//! Remove spell use case.

use std::sync::Arc;

use spellring_domain::{ItemId, StoredSpellEntry};

use super::documents::RingDocuments;
use super::error::RingError;

/// Discards a stored spell without casting it. No slot is refunded.
pub struct RemoveSpell {
    documents: Arc<RingDocuments>,
}

impl RemoveSpell {
    pub fn new(documents: Arc<RingDocuments>) -> Self {
        Self { documents }
    }

    pub async fn execute(
        &self,
        item_id: &ItemId,
        index: usize,
    ) -> Result<StoredSpellEntry, RingError> {
        let mut loaded = self.documents.load(item_id).await?;
        let entry = loaded.ledger.remove_at(index)?;

        self.documents
            .save(item_id, &loaded.ledger, loaded.expected_revision)
            .await?;

        tracing::info!(
            item_id = %item_id,
            spell = %entry.name(),
            level = entry.stored_level(),
            remaining = loaded.ledger.remaining_capacity(),
            "Spell removed from ring"
        );

        Ok(entry)
    }
}
