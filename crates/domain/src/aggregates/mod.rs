//! Aggregate roots - domain objects that own their related data
//!
//! The ring's ledger is the only aggregate: it owns its entries and guards
//! the capacity budget on every mutation.

pub mod ledger_document;
pub mod spell_ledger;

pub use ledger_document::{
    document_revision, CasterRecord, LedgerDocument, StoredSpellRecord, MAX_REVISION,
};
pub use spell_ledger::{LoadReport, SpellStorageLedger};
