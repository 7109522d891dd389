//! Ring of Spell Storing engine library.
//!
//! Wires the pure ledger from `spellring-domain` to the host's storage.
//!
//! ## Structure
//!
//! - `use_cases/` - store, cast, remove and inspect orchestration
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
