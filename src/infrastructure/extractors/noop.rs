use crate::domain::error::DomainError;
use crate::domain::ports::face_extractor::FaceExtractor;
use crate::domain::values::embedding::Embedding;

pub struct NoopExtractor;

#[async_trait::async_trait]
impl FaceExtractor for NoopExtractor {
    async fn extract(&self, _image: &[u8]) -> Result<Vec<Embedding>, DomainError> {
        // No model: every image reads as faceless
        Ok(vec![])
    }

    fn dimension(&self) -> usize {
        0
    }
}
