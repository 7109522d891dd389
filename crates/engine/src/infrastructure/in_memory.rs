//! In-memory adapters for the host ports.
//!
//! Used by tests and by the CLI, which backs the caster directory with a
//! JSON file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use spellring_domain::aggregates::document_revision;
use spellring_domain::{CasterId, CasterProfile, ItemId, SlotKind};

use crate::infrastructure::ports::{CasterDirectory, HostDocumentStore, RepoError};

// =============================================================================
// Documents
// =============================================================================

/// Ring documents held in a map, one per item.
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<ItemId, Value>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Seed a document without a revision check (fixtures, imports).
    pub async fn insert(&self, item_id: ItemId, document: Value) {
        self.documents.write().await.insert(item_id, document);
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostDocumentStore for InMemoryDocumentStore {
    async fn load(&self, item_id: &ItemId) -> Result<Option<Value>, RepoError> {
        Ok(self.documents.read().await.get(item_id).cloned())
    }

    async fn save(
        &self,
        item_id: &ItemId,
        document: Value,
        expected_revision: u64,
    ) -> Result<bool, RepoError> {
        // Hold the write lock across compare and swap
        let mut documents = self.documents.write().await;
        let current = documents.get(item_id).map(document_revision).unwrap_or(0);
        if current != expected_revision {
            return Ok(false);
        }
        documents.insert(item_id.clone(), document);
        Ok(true)
    }
}

// =============================================================================
// Casters
// =============================================================================

/// Caster profiles held in a map.
///
/// When loaded with [`Self::from_json_file`], every slot change is written
/// through to that file before the call returns. A failed write undoes the
/// change and surfaces as an error.
pub struct InMemoryCasterDirectory {
    casters: RwLock<HashMap<CasterId, CasterProfile>>,
    backing_file: Option<PathBuf>,
}

impl InMemoryCasterDirectory {
    pub fn new(profiles: impl IntoIterator<Item = CasterProfile>) -> Self {
        let casters = profiles
            .into_iter()
            .map(|p| (p.id().clone(), p))
            .collect();
        Self {
            casters: RwLock::new(casters),
            backing_file: None,
        }
    }

    /// Load profiles from a JSON array and keep `path` as the backing file.
    /// A missing file yields an empty directory.
    pub async fn from_json_file(path: &Path) -> Result<Self, RepoError> {
        let profiles: Vec<CasterProfile> = match tokio::fs::read_to_string(path).await {
            Ok(contents) => serde_json::from_str(&contents).map_err(RepoError::serialization)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(RepoError::database("casters.read", e)),
        };
        Ok(Self {
            backing_file: Some(path.to_path_buf()),
            ..Self::new(profiles)
        })
    }

    /// Write every profile as a JSON array, sorted by id.
    pub async fn write_json_file(&self, path: &Path) -> Result<(), RepoError> {
        write_profiles(path, &*self.casters.read().await).await
    }

    pub async fn profiles(&self) -> Vec<CasterProfile> {
        sorted_profiles(&*self.casters.read().await)
    }

    async fn write_through(
        &self,
        casters: &HashMap<CasterId, CasterProfile>,
    ) -> Result<(), RepoError> {
        match &self.backing_file {
            Some(path) => write_profiles(path, casters).await,
            None => Ok(()),
        }
    }
}

fn sorted_profiles(casters: &HashMap<CasterId, CasterProfile>) -> Vec<CasterProfile> {
    let mut profiles: Vec<CasterProfile> = casters.values().cloned().collect();
    profiles.sort_by(|a, b| a.id().cmp(b.id()));
    profiles
}

async fn write_profiles(
    path: &Path,
    casters: &HashMap<CasterId, CasterProfile>,
) -> Result<(), RepoError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| RepoError::database("casters.write", e))?;
    }
    let json = serde_json::to_string_pretty(&sorted_profiles(casters))
        .map_err(RepoError::serialization)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| RepoError::database("casters.write", e))
}

#[async_trait]
impl CasterDirectory for InMemoryCasterDirectory {
    async fn profile(&self, caster_id: &CasterId) -> Result<Option<CasterProfile>, RepoError> {
        Ok(self.casters.read().await.get(caster_id).cloned())
    }

    async fn consume_slot(
        &self,
        caster_id: &CasterId,
        level: u8,
        kind: SlotKind,
    ) -> Result<bool, RepoError> {
        let mut casters = self.casters.write().await;
        let caster = casters
            .get_mut(caster_id)
            .ok_or_else(|| RepoError::not_found("Caster", caster_id))?;
        let before = caster.clone();
        if !caster.consume_slot(level, kind) {
            return Ok(false);
        }

        if let Err(e) = self.write_through(&casters).await {
            casters.insert(caster_id.clone(), before);
            return Err(e);
        }
        Ok(true)
    }

    async fn restore_slot(
        &self,
        caster_id: &CasterId,
        level: u8,
        kind: SlotKind,
    ) -> Result<(), RepoError> {
        let mut casters = self.casters.write().await;
        let caster = casters
            .get_mut(caster_id)
            .ok_or_else(|| RepoError::not_found("Caster", caster_id))?;
        let before = caster.clone();
        if !caster.restore_slot(level, kind) {
            return Err(RepoError::not_found(
                "SpellSlotPool",
                format!("{caster_id} {kind} level {level}"),
            ));
        }

        if let Err(e) = self.write_through(&casters).await {
            casters.insert(caster_id.clone(), before);
            return Err(e);
        }
        Ok(())
    }
}
