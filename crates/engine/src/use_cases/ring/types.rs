//! Ring operation result types.

use spellring_domain::StoredSpellEntry;

/// A stored spell released from the ring.
///
/// The numbers come from the snapshot taken when the spell was stored, not
/// from whoever wears the ring now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastOutcome {
    pub entry: StoredSpellEntry,
    pub cast_level: u8,
    pub attack_bonus: i32,
    pub save_dc: i32,
}

impl CastOutcome {
    pub fn from_entry(entry: StoredSpellEntry) -> Self {
        Self {
            cast_level: entry.stored_level(),
            attack_bonus: entry.caster().attack_bonus,
            save_dc: entry.caster().save_dc,
            entry,
        }
    }
}

/// Current contents of a ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingSummary {
    pub entries: Vec<StoredSpellEntry>,
    pub used: u32,
    pub remaining: u32,
    pub capacity: u32,
}
