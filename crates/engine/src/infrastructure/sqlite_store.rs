//! SQLite-backed ring document storage.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use spellring_domain::aggregates::document_revision;
use spellring_domain::ItemId;

use crate::infrastructure::ports::{ClockPort, HostDocumentStore, RepoError};

/// SQLite implementation of the host document store.
///
/// One row per ring item. The `revision` column mirrors the document's own
/// `revision` field so the compare-and-swap runs inside a single statement.
pub struct SqliteDocumentStore {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteDocumentStore {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("ring_documents.connect", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ring_documents (
                item_id TEXT PRIMARY KEY,
                document_json TEXT NOT NULL,
                revision INTEGER NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("ring_documents.migrate", e))?;

        Ok(Self { pool, clock })
    }

    /// Every stored item id, sorted.
    pub async fn item_ids(&self) -> Result<Vec<String>, RepoError> {
        let rows = sqlx::query("SELECT item_id FROM ring_documents ORDER BY item_id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("ring_documents.list", e))?;
        Ok(rows.iter().map(|row| row.get("item_id")).collect())
    }
}

fn to_sql_revision(revision: u64) -> Result<i64, RepoError> {
    i64::try_from(revision)
        .map_err(|_| RepoError::serialization(format!("revision {revision} out of range")))
}

#[async_trait]
impl HostDocumentStore for SqliteDocumentStore {
    async fn load(&self, item_id: &ItemId) -> Result<Option<Value>, RepoError> {
        let row = sqlx::query("SELECT document_json FROM ring_documents WHERE item_id = ?")
            .bind(item_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("ring_documents.load", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("document_json");
                let document = serde_json::from_str(&json).map_err(RepoError::serialization)?;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    async fn save(
        &self,
        item_id: &ItemId,
        document: Value,
        expected_revision: u64,
    ) -> Result<bool, RepoError> {
        let new_revision = to_sql_revision(document_revision(&document))?;
        let expected = to_sql_revision(expected_revision)?;
        let json = serde_json::to_string(&document).map_err(RepoError::serialization)?;
        let now = self.clock.now().to_rfc3339();

        let result = if expected_revision == 0 {
            // Fresh item, or one still holding a legacy document without a revision
            sqlx::query(
                r#"
                INSERT INTO ring_documents (item_id, document_json, revision, updated_at)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(item_id) DO UPDATE SET
                    document_json = excluded.document_json,
                    revision = excluded.revision,
                    updated_at = excluded.updated_at
                WHERE ring_documents.revision = 0
                "#,
            )
            .bind(item_id.as_str())
            .bind(json)
            .bind(new_revision)
            .bind(now)
            .execute(&self.pool)
            .await
        } else {
            sqlx::query(
                r#"
                UPDATE ring_documents
                SET document_json = ?, revision = ?, updated_at = ?
                WHERE item_id = ? AND revision = ?
                "#,
            )
            .bind(json)
            .bind(new_revision)
            .bind(now)
            .bind(item_id.as_str())
            .bind(expected)
            .execute(&self.pool)
            .await
        }
        .map_err(|e| RepoError::database("ring_documents.save", e))?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use chrono::DateTime;
    use serde_json::json;

    async fn open(dir: &tempfile::TempDir) -> SqliteDocumentStore {
        let path = dir.path().join("rings.db");
        let clock = Arc::new(FixedClock(
            DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
        ));
        SqliteDocumentStore::new(path.to_str().unwrap(), clock)
            .await
            .expect("open sqlite store")
    }

    fn item() -> ItemId {
        ItemId::new("ring-1").unwrap()
    }

    #[tokio::test]
    async fn missing_item_loads_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = open(&dir).await;
        assert!(store.load(&item()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_returns_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = open(&dir).await;
        let doc = json!({ "storedSpells": [{ "name": "Shield", "level": 1 }], "revision": 1 });

        assert!(store.save(&item(), doc.clone(), 0).await.unwrap());
        assert_eq!(store.load(&item()).await.unwrap(), Some(doc));
        assert_eq!(store.item_ids().await.unwrap(), vec!["ring-1".to_string()]);
    }

    #[tokio::test]
    async fn stale_revision_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = open(&dir).await;

        assert!(store
            .save(&item(), json!({ "storedSpells": [], "revision": 1 }), 0)
            .await
            .unwrap());
        // A second writer that also read revision 0 loses
        assert!(!store
            .save(&item(), json!({ "storedSpells": [], "revision": 1 }), 0)
            .await
            .unwrap());
        assert!(!store
            .save(&item(), json!({ "storedSpells": [], "revision": 3 }), 2)
            .await
            .unwrap());
        assert!(store
            .save(&item(), json!({ "storedSpells": [], "revision": 2 }), 1)
            .await
            .unwrap());

        let doc = store.load(&item()).await.unwrap().unwrap();
        assert_eq!(doc["revision"], 2);
    }

    #[tokio::test]
    async fn update_of_missing_item_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = open(&dir).await;

        assert!(!store
            .save(&item(), json!({ "storedSpells": [], "revision": 5 }), 4)
            .await
            .unwrap());
        assert!(store.load(&item()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let store = open(&dir).await;
            store
                .save(&item(), json!({ "storedSpells": [], "revision": 1 }), 0)
                .await
                .unwrap();
        }
        let store = open(&dir).await;
        assert!(store.load(&item()).await.unwrap().is_some());
    }
}
