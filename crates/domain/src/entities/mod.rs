//! Domain entities for spell storage.

pub mod caster;
pub mod spell;
pub mod stored_spell;

pub use caster::{CasterProfile, PactSlots, SlotOption, SpellSlotPool};
pub use spell::{SpellDescriptor, SpellTarget, MAX_SPELL_LEVEL};
pub use stored_spell::{
    CasterSnapshot, SlotKind, StoredSpellEntry, DEFAULT_SPELL_ATTACK_BONUS, DEFAULT_SPELL_SAVE_DC,
    MAX_STORABLE_LEVEL,
};
