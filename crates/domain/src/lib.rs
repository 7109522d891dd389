//! Ring of Spell Storing domain.
//!
//! Pure model of a magic ring that holds up to a fixed number of spell
//! levels: what a stored spell records, how a caster's slots are spent, and
//! the ledger that enforces the ring's capacity. No I/O happens here; the
//! engine crate wires these types to the host's document store.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::{LedgerDocument, LoadReport, SpellStorageLedger};
pub use entities::{
    CasterProfile, CasterSnapshot, PactSlots, SlotKind, SlotOption, SpellDescriptor,
    SpellSlotPool, SpellTarget, StoredSpellEntry, DEFAULT_SPELL_ATTACK_BONUS,
    DEFAULT_SPELL_SAVE_DC, MAX_SPELL_LEVEL, MAX_STORABLE_LEVEL,
};
pub use error::{DomainError, LedgerError};
pub use ids::{CasterId, ItemId, SpellId};
pub use value_objects::RingSettings;
