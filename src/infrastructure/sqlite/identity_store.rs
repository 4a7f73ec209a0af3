use crate::domain::entities::identity_record::IdentityRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::identity_store::{IdentityStore, SimilarityMatch};
use crate::domain::values::deletion::DeletionOutcome;
use crate::domain::values::embedding::Embedding;
use crate::infrastructure::sqlite::migrations::run_migrations;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Embedded identity store. Exact cosine search over every row; reads see
/// writes immediately, so deletes are always confirmed.
pub struct SqliteIdentityStore {
    conn: Mutex<Connection>,
    dimension: usize,
}

impl SqliteIdentityStore {
    pub fn new(conn: Connection, dimension: usize) -> Self {
        Self { conn: Mutex::new(conn), dimension }
    }

    pub fn open(path: &str, dimension: usize) -> Result<Self, DomainError> {
        let conn = Connection::open(path).map_err(|e| DomainError::StoreUnavailable(format!("DB error: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::StoreUnavailable(format!("WAL error: {e}")))?;
        Ok(Self::new(conn, dimension))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DomainError> {
        self.conn.lock().map_err(|e| DomainError::StoreUnavailable(e.to_string()))
    }

    fn check(&self, vector: &Embedding) -> Result<(), DomainError> {
        vector.check_dimension(self.dimension).map_err(DomainError::InvalidInput)
    }

    fn count_by_name(conn: &Connection, name: &str) -> Result<i64, DomainError> {
        conn.query_row(
            "SELECT COUNT(*) FROM identities WHERE name = ?1",
            params![name],
            |r| r.get(0),
        ).map_err(|e| DomainError::StoreUnavailable(e.to_string()))
    }
}

#[async_trait::async_trait]
impl IdentityStore for SqliteIdentityStore {
    async fn ensure_collection(&self) -> Result<(), DomainError> {
        let conn = self.lock()?;
        run_migrations(&conn).map_err(DomainError::StoreUnavailable)?;

        let stored: Option<String> = conn
            .query_row("SELECT value FROM collection_meta WHERE key = 'dimension'", [], |r| r.get(0))
            .optional()
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;
        match stored {
            None => {
                conn.execute(
                    "INSERT INTO collection_meta (key, value) VALUES ('dimension', ?1)",
                    params![self.dimension.to_string()],
                ).map_err(|e| DomainError::StoreUnavailable(format!("Failed to record dimension: {e}")))?;
            }
            Some(d) if d != self.dimension.to_string() => {
                warn!(stored = %d, configured = self.dimension, "collection was created with a different embedding dimension");
            }
            Some(_) => {}
        }
        Ok(())
    }

    async fn upsert(&self, name: &str, vector: &Embedding) -> Result<(), DomainError> {
        self.check(vector)?;
        let record = IdentityRecord::new(name, vector.clone());
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO identities (id, name, vector, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![record.id, record.name, record.vector.to_le_bytes(), Utc::now().to_rfc3339()],
        ).map_err(|e| DomainError::StoreUnavailable(format!("Failed to store identity: {e}")))?;
        Ok(())
    }

    async fn search(&self, vector: &Embedding, limit: usize) -> Result<Vec<SimilarityMatch>, DomainError> {
        self.check(vector)?;
        if limit == 0 {
            return Ok(vec![]);
        }
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name, vector FROM identities")
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;
        let rows = stmt.query_map([], |row| {
            let name: String = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            Ok((name, blob))
        }).map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            let (name, blob) = row.map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;
            let stored = Embedding::from_le_bytes(&blob)
                .map_err(|e| DomainError::StoreUnavailable(format!("Corrupt vector for '{name}': {e}")))?;
            let score = vector.cosine_similarity(&stored);
            results.push(SimilarityMatch { name, score });
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);
        Ok(results)
    }

    async fn exists(&self, name: &str) -> Result<bool, DomainError> {
        let conn = self.lock()?;
        Ok(Self::count_by_name(&conn, name)? > 0)
    }

    async fn delete(&self, name: &str) -> Result<DeletionOutcome, DomainError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM identities WHERE name = ?1", params![name])
            .map_err(|e| DomainError::StoreUnavailable(format!("Failed to delete identity: {e}")))?;
        if Self::count_by_name(&conn, name)? == 0 {
            Ok(DeletionOutcome::ConfirmedRemoved)
        } else {
            Ok(DeletionOutcome::RemovalPending)
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emb(values: &[f32]) -> Embedding {
        Embedding::new(values.to_vec()).unwrap()
    }

    async fn store(dimension: usize) -> SqliteIdentityStore {
        let store = SqliteIdentityStore::new(Connection::open_in_memory().unwrap(), dimension);
        store.ensure_collection().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_ensure_collection_is_idempotent() {
        let store = store(2).await;
        store.upsert("alice", &emb(&[1.0, 0.0])).await.unwrap();
        store.ensure_collection().await.unwrap();
        assert!(store.exists("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_same_name() {
        let store = store(2).await;
        store.upsert("alice", &emb(&[1.0, 0.0])).await.unwrap();
        store.upsert("alice", &emb(&[0.0, 1.0])).await.unwrap();

        let conn = store.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM identities", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 1);
        drop(conn);

        let matches = store.search(&emb(&[0.0, 1.0]), 5).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert!((matches[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_search_orders_by_descending_score() {
        let store = store(3).await;
        store.upsert("a", &emb(&[1.0, 0.0, 0.0])).await.unwrap();
        store.upsert("b", &emb(&[0.0, 1.0, 0.0])).await.unwrap();
        store.upsert("c", &emb(&[0.9, 0.1, 0.0])).await.unwrap();

        let matches = store.search(&emb(&[1.0, 0.0, 0.0]), 2).await.unwrap();
        let names: Vec<_> = matches.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
        assert!(matches[0].score >= matches[1].score);
    }

    #[tokio::test]
    async fn test_search_empty_collection() {
        let store = store(2).await;
        assert!(store.search(&emb(&[1.0, 0.0]), 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_rejected() {
        let store = store(2).await;
        let err = store.upsert("alice", &emb(&[1.0, 0.0, 0.0])).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        let err = store.search(&emb(&[1.0]), 1).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_delete_is_confirmed() {
        let store = store(2).await;
        store.upsert("alice", &emb(&[1.0, 0.0])).await.unwrap();
        assert_eq!(store.delete("alice").await.unwrap(), DeletionOutcome::ConfirmedRemoved);
        assert!(!store.exists("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_table_is_store_error() {
        let store = SqliteIdentityStore::new(Connection::open_in_memory().unwrap(), 2);
        let err = store.exists("alice").await.unwrap_err();
        assert!(matches!(err, DomainError::StoreUnavailable(_)));
    }
}
