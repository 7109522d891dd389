//! Store spell use case.
//!
//! Moves a caster's spell into a ring, paying for it with one of the
//! caster's slots.

use std::sync::Arc;

use spellring_domain::{CasterId, ItemId, SlotKind, SpellDescriptor, StoredSpellEntry};

use crate::infrastructure::ports::{CasterDirectory, ClockPort};

use super::documents::RingDocuments;
use super::error::RingError;

/// Store spell use case.
///
/// Orchestrates: table policy, ledger validation, slot spending, persistence.
pub struct StoreSpell {
    documents: Arc<RingDocuments>,
    casters: Arc<dyn CasterDirectory>,
    clock: Arc<dyn ClockPort>,
}

impl StoreSpell {
    pub fn new(
        documents: Arc<RingDocuments>,
        casters: Arc<dyn CasterDirectory>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            documents,
            casters,
            clock,
        }
    }

    /// Store `spell` in the ring at `level`, spending a `slot_kind` slot.
    ///
    /// The slot is spent only after the ledger accepts the spell, and is
    /// handed back if the ring cannot be saved.
    pub async fn execute(
        &self,
        item_id: &ItemId,
        caster_id: &CasterId,
        spell: &SpellDescriptor,
        level: u8,
        slot_kind: SlotKind,
    ) -> Result<StoredSpellEntry, RingError> {
        if !self.documents.settings().permits(spell) {
            return Err(RingError::PolicyViolation(format!(
                "{} only targets its caster and cannot be stored",
                spell.name()
            )));
        }

        let mut loaded = self.documents.load(item_id).await?;

        let caster = self
            .casters
            .profile(caster_id)
            .await?
            .ok_or_else(|| RingError::CasterNotFound(caster_id.clone()))?;

        let entry = loaded.ledger.store(
            spell,
            caster.snapshot(),
            level,
            slot_kind,
            self.clock.now(),
        )?;

        if !self.casters.consume_slot(caster_id, level, slot_kind).await? {
            return Err(RingError::NoSlotAvailable {
                level,
                kind: slot_kind,
            });
        }

        if let Err(e) = self
            .documents
            .save(item_id, &loaded.ledger, loaded.expected_revision)
            .await
        {
            if let Err(restore_err) = self.casters.restore_slot(caster_id, level, slot_kind).await
            {
                tracing::error!(
                    caster_id = %caster_id,
                    level,
                    kind = %slot_kind,
                    error = %restore_err,
                    "Failed to restore spell slot after ring save failed"
                );
            }
            return Err(e);
        }

        tracing::info!(
            item_id = %item_id,
            caster_id = %caster_id,
            spell = %entry.name(),
            level,
            kind = %slot_kind,
            used_levels = loaded.ledger.compute_used_levels(),
            "Spell stored in ring"
        );

        Ok(entry)
    }
}
