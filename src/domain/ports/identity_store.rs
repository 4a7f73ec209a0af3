use crate::domain::error::DomainError;
use crate::domain::values::deletion::DeletionOutcome;
use crate::domain::values::embedding::Embedding;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatch {
    pub name: String,
    pub score: f32,
}

/// Vector store holding one identity record per registered name.
///
/// Every backend failure surfaces as [`DomainError::StoreUnavailable`];
/// implementations never retry.
#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    /// Create the backing collection if it does not exist yet.
    async fn ensure_collection(&self) -> Result<(), DomainError>;

    /// Write the record for `name` under its deterministic id, overwriting
    /// any existing one.
    async fn upsert(&self, name: &str, vector: &Embedding) -> Result<(), DomainError>;

    /// Up to `limit` matches by descending cosine similarity. No thresholding.
    async fn search(&self, vector: &Embedding, limit: usize) -> Result<Vec<SimilarityMatch>, DomainError>;

    async fn exists(&self, name: &str) -> Result<bool, DomainError>;

    /// Remove all records for `name`, then re-read to report whether the
    /// removal is already visible.
    async fn delete(&self, name: &str) -> Result<DeletionOutcome, DomainError>;

    fn dimension(&self) -> usize;
}
