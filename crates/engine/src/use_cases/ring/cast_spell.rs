//! Cast spell use case.

use std::sync::Arc;

use spellring_domain::ItemId;

use super::documents::RingDocuments;
use super::error::RingError;
use super::types::CastOutcome;

/// Releases a stored spell using the original caster's numbers.
pub struct CastSpell {
    documents: Arc<RingDocuments>,
}

impl CastSpell {
    pub fn new(documents: Arc<RingDocuments>) -> Self {
        Self { documents }
    }

    pub async fn execute(&self, item_id: &ItemId, index: usize) -> Result<CastOutcome, RingError> {
        let mut loaded = self.documents.load(item_id).await?;
        let entry = loaded.ledger.cast_at(index)?;

        self.documents
            .save(item_id, &loaded.ledger, loaded.expected_revision)
            .await?;

        let outcome = CastOutcome::from_entry(entry);
        tracing::info!(
            item_id = %item_id,
            spell = %outcome.entry.name(),
            cast_level = outcome.cast_level,
            save_dc = outcome.save_dc,
            attack_bonus = outcome.attack_bonus,
            "Spell cast from ring"
        );

        Ok(outcome)
    }
}
