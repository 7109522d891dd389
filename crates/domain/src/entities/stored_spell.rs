//! Stored spell entry - one spell parked in a ring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::SpellDescriptor;
use crate::error::DomainError;
use crate::ids::{CasterId, SpellId};

/// Highest slot level a ring can hold a spell at.
pub const MAX_STORABLE_LEVEL: u8 = 5;

/// Attack bonus recorded when the caster sheet has no spellcasting stats.
pub const DEFAULT_SPELL_ATTACK_BONUS: i32 = 0;

/// Save DC recorded when the caster sheet has no spellcasting stats.
pub const DEFAULT_SPELL_SAVE_DC: i32 = 8;

/// Which slot pool paid for a stored spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotKind {
    /// Regular per-level spell slot
    #[default]
    Spell,
    /// Pact magic slot
    Pact,
}

impl std::fmt::Display for SlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spell => write!(f, "spell"),
            Self::Pact => write!(f, "pact"),
        }
    }
}

impl std::str::FromStr for SlotKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spell" => Ok(Self::Spell),
            "pact" => Ok(Self::Pact),
            _ => Err(DomainError::parse(format!("Unknown slot kind: {}", s))),
        }
    }
}

/// Frozen copy of the original caster's power at store time.
///
/// Casting from the ring uses these numbers, not the wearer's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasterSnapshot {
    /// Absent only for legacy records written before ids were kept
    pub caster_id: Option<CasterId>,
    pub caster_name: String,
    pub attack_bonus: i32,
    pub save_dc: i32,
}

/// One spell held by a ring.
///
/// # Invariants
///
/// - `base_level >= 1`
/// - `base_level <= stored_level <= MAX_STORABLE_LEVEL`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSpellEntry {
    spell_id: Option<SpellId>,
    name: String,
    stored_level: u8,
    base_level: u8,
    slot_kind: SlotKind,
    caster: CasterSnapshot,
    stored_at_epoch_millis: i64,
}

impl StoredSpellEntry {
    /// Build an entry for a spell being stored now. Level bounds are the
    /// ledger's job; this only records what was decided.
    pub(crate) fn capture(
        spell: &SpellDescriptor,
        caster: CasterSnapshot,
        stored_level: u8,
        slot_kind: SlotKind,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            spell_id: Some(spell.id().clone()),
            name: spell.name().to_string(),
            stored_level,
            base_level: spell.base_level(),
            slot_kind,
            caster,
            stored_at_epoch_millis: now.timestamp_millis(),
        }
    }

    /// Rebuild an entry from persisted parts, rejecting anything that breaks
    /// the level invariants.
    pub(crate) fn restore(
        spell_id: Option<SpellId>,
        name: String,
        stored_level: u8,
        base_level: u8,
        slot_kind: SlotKind,
        caster: CasterSnapshot,
        stored_at_epoch_millis: i64,
    ) -> Option<Self> {
        let levels_ok = base_level >= 1
            && base_level <= stored_level
            && stored_level <= MAX_STORABLE_LEVEL;
        if !levels_ok || name.trim().is_empty() {
            return None;
        }
        Some(Self {
            spell_id,
            name,
            stored_level,
            base_level,
            slot_kind,
            caster,
            stored_at_epoch_millis,
        })
    }

    /// Source spell id. Absent for legacy records that only kept a name.
    pub fn spell_id(&self) -> Option<&SpellId> {
        self.spell_id.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slot level consumed to store the spell, and the level it is cast at.
    pub fn stored_level(&self) -> u8 {
        self.stored_level
    }

    pub fn base_level(&self) -> u8 {
        self.base_level
    }

    pub fn is_upcast(&self) -> bool {
        self.stored_level > self.base_level
    }

    pub fn slot_kind(&self) -> SlotKind {
        self.slot_kind
    }

    pub fn caster(&self) -> &CasterSnapshot {
        &self.caster
    }

    pub fn stored_at_epoch_millis(&self) -> i64 {
        self.stored_at_epoch_millis
    }

    pub fn stored_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.stored_at_epoch_millis)
    }
}
