//! Ring operation errors.

use spellring_domain::{CasterId, LedgerError, SlotKind};

use crate::infrastructure::ports::RepoError;

/// Errors that can occur during ring operations.
#[derive(Debug, thiserror::Error)]
pub enum RingError {
    /// The ledger refused the mutation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// The updated ledger could not be written back to the host.
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),
    /// Table rules forbid storing this spell.
    #[error("Policy violation: {0}")]
    PolicyViolation(String),
    #[error("Caster not found: {0}")]
    CasterNotFound(CasterId),
    #[error("No {kind} slot of level {level} available")]
    NoSlotAvailable { level: u8, kind: SlotKind },
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = RingError::from(LedgerError::insufficient_capacity(3, 1));
        assert_eq!(
            err.to_string(),
            "Insufficient capacity: 3 levels required, 1 available"
        );

        let err = RingError::NoSlotAvailable {
            level: 3,
            kind: SlotKind::Pact,
        };
        assert_eq!(err.to_string(), "No pact slot of level 3 available");
    }
}
