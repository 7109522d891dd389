//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - The host's item documents (could swap SQLite -> the host's flag API)
//! - The host's character sheets (caster stats and spell slots)
//! - Clock (for testing)

mod error;
mod repos;
mod testing;

// =============================================================================
// Host Ports
// =============================================================================
pub use repos::{CasterDirectory, HostDocumentStore};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockCasterDirectory, MockHostDocumentStore};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
