pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod http;
pub mod infrastructure;

use crate::application::lifecycle::LifecycleUseCase;
use crate::application::recognize::RecognizeUseCase;
use crate::application::register::{ImageSource, RegisterUseCase, Registration};
use crate::config::{Config, ExtractorBackend, StoreBackend};
use crate::domain::entities::recognition::Recognition;
use crate::domain::error::DomainError;
use crate::domain::ports::face_extractor::FaceExtractor;
use crate::domain::ports::identity_store::IdentityStore;
use crate::domain::values::deletion::DeletionOutcome;
use crate::domain::values::threshold::SimilarityThreshold;
use crate::infrastructure::extractors::http::HttpFaceExtractor;
use crate::infrastructure::extractors::noop::NoopExtractor;
use crate::infrastructure::qdrant::identity_store::QdrantIdentityStore;
use crate::infrastructure::sqlite::identity_store::SqliteIdentityStore;
use std::sync::Arc;
use tracing::warn;

/// Face identity service: one long-lived extractor handle and one store
/// handle, shared by every request.
pub struct FaceId {
    register_uc: RegisterUseCase,
    recognize_uc: RecognizeUseCase,
    lifecycle_uc: LifecycleUseCase,
}

impl FaceId {
    pub async fn new(config: &Config) -> Result<Self, DomainError> {
        let extractor: Arc<dyn FaceExtractor> = match config.extractor {
            ExtractorBackend::Http => Arc::new(HttpFaceExtractor::new(
                config.extractor_url.clone(),
                config.embedding_size,
            )),
            ExtractorBackend::Noop => Arc::new(NoopExtractor),
        };

        let store: Arc<dyn IdentityStore> = match config.store {
            StoreBackend::Qdrant => Arc::new(QdrantIdentityStore::new(
                config.qdrant_url.clone(),
                config.collection.clone(),
                config.embedding_size,
            )),
            StoreBackend::Sqlite => Arc::new(SqliteIdentityStore::open(&config.db_path, config.embedding_size)?),
        };

        Self::with_components(extractor, store, config.threshold).await
    }

    pub async fn with_components(
        extractor: Arc<dyn FaceExtractor>,
        store: Arc<dyn IdentityStore>,
        threshold: SimilarityThreshold,
    ) -> Result<Self, DomainError> {
        let extractor_dim = extractor.dimension();
        if extractor_dim > 0 && extractor_dim != store.dimension() {
            warn!(
                extractor = extractor_dim,
                store = store.dimension(),
                "extractor and store disagree on embedding dimension"
            );
        }

        store.ensure_collection().await?;

        Ok(Self {
            register_uc: RegisterUseCase::new(extractor.clone(), store.clone()),
            recognize_uc: RecognizeUseCase::new(extractor, store.clone(), threshold),
            lifecycle_uc: LifecycleUseCase::new(store),
        })
    }

    pub async fn register<I>(&self, name: &str, images: &[I]) -> Result<Registration, DomainError>
    where
        I: ImageSource + Sync,
    {
        self.register_uc.execute(name, images).await
    }

    pub async fn recognize(&self, image: &[u8]) -> Result<Recognition, DomainError> {
        self.recognize_uc.execute(image).await
    }

    pub async fn delete_person(&self, name: &str) -> Result<DeletionOutcome, DomainError> {
        self.lifecycle_uc.delete_person(name).await
    }

    pub async fn exists(&self, name: &str) -> Result<bool, DomainError> {
        self.lifecycle_uc.exists(name).await
    }

    pub fn threshold(&self) -> SimilarityThreshold {
        self.recognize_uc.threshold()
    }
}
