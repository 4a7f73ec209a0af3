use crate::domain::entities::recognition::Recognition;
use crate::domain::error::DomainError;
use crate::domain::ports::face_extractor::FaceExtractor;
use crate::domain::ports::identity_store::IdentityStore;
use crate::domain::values::threshold::SimilarityThreshold;
use std::sync::Arc;
use tracing::debug;

pub struct RecognizeUseCase {
    extractor: Arc<dyn FaceExtractor>,
    store: Arc<dyn IdentityStore>,
    threshold: SimilarityThreshold,
}

impl RecognizeUseCase {
    pub fn new(
        extractor: Arc<dyn FaceExtractor>,
        store: Arc<dyn IdentityStore>,
        threshold: SimilarityThreshold,
    ) -> Self {
        Self { extractor, store, threshold }
    }

    /// Classify a query image. Face-count outcomes are decided before the
    /// store is touched.
    pub async fn execute(&self, image: &[u8]) -> Result<Recognition, DomainError> {
        let mut faces = self.extractor.extract(image).await?;
        let query = match faces.len() {
            0 => return Ok(Recognition::no_faces()),
            1 => faces.remove(0),
            _ => return Ok(Recognition::multiple_faces()),
        };

        let best = self.store.search(&query, 1).await?.into_iter().next();
        match best {
            Some(m) if self.threshold.accepts(m.score) => {
                debug!(person = %m.name, score = m.score, "recognized");
                Ok(Recognition::success(m.name, m.score))
            }
            Some(m) => {
                debug!(closest = %m.name, score = m.score, threshold = %self.threshold, "below threshold");
                Ok(Recognition::not_registered())
            }
            None => Ok(Recognition::not_registered()),
        }
    }

    pub fn threshold(&self) -> SimilarityThreshold {
        self.threshold
    }
}
