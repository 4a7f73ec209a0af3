use crate::domain::error::DomainError;
use crate::domain::values::embedding::Embedding;

/// Detects faces in an encoded image and returns one embedding per face.
///
/// Implementations are shared across concurrent requests and may be
/// expensive; callers invoke them once per image.
#[async_trait::async_trait]
pub trait FaceExtractor: Send + Sync {
    async fn extract(&self, image: &[u8]) -> Result<Vec<Embedding>, DomainError>;

    /// Embedding dimension this extractor produces, or 0 if unknown.
    fn dimension(&self) -> usize;
}
