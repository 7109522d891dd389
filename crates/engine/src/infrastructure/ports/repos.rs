//! Port traits for the host application's data.

use async_trait::async_trait;
use serde_json::Value;
use spellring_domain::{CasterId, CasterProfile, ItemId, SlotKind};

use super::error::RepoError;

// =============================================================================
// Host Document Store
// =============================================================================

/// Persistence for a ring item's ledger document.
///
/// The store never interprets the document beyond its `revision` field.
/// `save` is a compare-and-swap: it writes only if the revision currently
/// held for the item equals `expected_revision` (0 when nothing is stored),
/// and returns `Ok(false)` otherwise.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostDocumentStore: Send + Sync {
    async fn load(&self, item_id: &ItemId) -> Result<Option<Value>, RepoError>;
    async fn save(
        &self,
        item_id: &ItemId,
        document: Value,
        expected_revision: u64,
    ) -> Result<bool, RepoError>;
}

// =============================================================================
// Caster Directory
// =============================================================================

/// Lookup of characters' spellcasting stats and slot accounting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CasterDirectory: Send + Sync {
    async fn profile(&self, caster_id: &CasterId) -> Result<Option<CasterProfile>, RepoError>;

    /// Spend one slot. `Ok(false)` when the caster has none of that level/kind left.
    async fn consume_slot(
        &self,
        caster_id: &CasterId,
        level: u8,
        kind: SlotKind,
    ) -> Result<bool, RepoError>;

    /// Give back a slot spent by `consume_slot`.
    async fn restore_slot(
        &self,
        caster_id: &CasterId,
        level: u8,
        kind: SlotKind,
    ) -> Result<(), RepoError>;
}
