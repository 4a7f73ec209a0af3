//! Shared test helpers: scripted extractor and instrumented stores.
#![allow(dead_code)]

use faceid::domain::error::DomainError;
use faceid::domain::ports::face_extractor::FaceExtractor;
use faceid::domain::ports::identity_store::{IdentityStore, SimilarityMatch};
use faceid::domain::values::deletion::DeletionOutcome;
use faceid::domain::values::embedding::Embedding;
use faceid::domain::values::threshold::SimilarityThreshold;
use faceid::infrastructure::sqlite::identity_store::SqliteIdentityStore;
use faceid::FaceId;
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const DIM: usize = 2;

/// Extractor returning pre-arranged faces per image. Unknown images have no faces.
#[derive(Default)]
pub struct ScriptedExtractor {
    faces: HashMap<Vec<u8>, Vec<Vec<f32>>>,
    failing: Vec<Vec<u8>>,
    calls: AtomicUsize,
}

impl ScriptedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn face(mut self, image: &[u8], embedding: &[f32]) -> Self {
        self.faces.insert(image.to_vec(), vec![embedding.to_vec()]);
        self
    }

    pub fn faces(mut self, image: &[u8], embeddings: Vec<Vec<f32>>) -> Self {
        self.faces.insert(image.to_vec(), embeddings);
        self
    }

    pub fn failing(mut self, image: &[u8]) -> Self {
        self.failing.push(image.to_vec());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl FaceExtractor for ScriptedExtractor {
    async fn extract(&self, image: &[u8]) -> Result<Vec<Embedding>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.iter().any(|f| f == image) {
            return Err(DomainError::Extractor("model crashed".into()));
        }
        self.faces
            .get(image)
            .map(|faces| {
                faces
                    .iter()
                    .map(|f| Embedding::new(f.clone()).map_err(DomainError::Extractor))
                    .collect()
            })
            .unwrap_or_else(|| Ok(vec![]))
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

/// Store wrapper counting every data-plane call.
pub struct RecordingStore {
    inner: Arc<dyn IdentityStore>,
    upserts: AtomicUsize,
    searches: AtomicUsize,
    exists_checks: AtomicUsize,
    deletes: AtomicUsize,
}

impl RecordingStore {
    pub fn new(inner: Arc<dyn IdentityStore>) -> Self {
        Self {
            inner,
            upserts: AtomicUsize::new(0),
            searches: AtomicUsize::new(0),
            exists_checks: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn upserts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// All calls except collection bootstrap.
    pub fn data_calls(&self) -> usize {
        self.upserts() + self.searches() + self.exists_checks.load(Ordering::SeqCst) + self.deletes()
    }
}

#[async_trait::async_trait]
impl IdentityStore for RecordingStore {
    async fn ensure_collection(&self) -> Result<(), DomainError> {
        self.inner.ensure_collection().await
    }

    async fn upsert(&self, name: &str, vector: &Embedding) -> Result<(), DomainError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert(name, vector).await
    }

    async fn search(&self, vector: &Embedding, limit: usize) -> Result<Vec<SimilarityMatch>, DomainError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.inner.search(vector, limit).await
    }

    async fn exists(&self, name: &str) -> Result<bool, DomainError> {
        self.exists_checks.fetch_add(1, Ordering::SeqCst);
        self.inner.exists(name).await
    }

    async fn delete(&self, name: &str) -> Result<DeletionOutcome, DomainError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(name).await
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

/// Store whose deletes stay visible to the next `lag` existence reads,
/// the way an asynchronously-applied delete behaves.
pub struct LaggingStore {
    inner: Arc<dyn IdentityStore>,
    lag: usize,
    pending: Mutex<HashMap<String, usize>>,
}

impl LaggingStore {
    pub fn new(inner: Arc<dyn IdentityStore>, lag: usize) -> Self {
        Self { inner, lag, pending: Mutex::new(HashMap::new()) }
    }
}

#[async_trait::async_trait]
impl IdentityStore for LaggingStore {
    async fn ensure_collection(&self) -> Result<(), DomainError> {
        self.inner.ensure_collection().await
    }

    async fn upsert(&self, name: &str, vector: &Embedding) -> Result<(), DomainError> {
        self.pending.lock().unwrap().remove(name);
        self.inner.upsert(name, vector).await
    }

    async fn search(&self, vector: &Embedding, limit: usize) -> Result<Vec<SimilarityMatch>, DomainError> {
        self.inner.search(vector, limit).await
    }

    async fn exists(&self, name: &str) -> Result<bool, DomainError> {
        {
            let mut pending = self.pending.lock().unwrap();
            if let Some(remaining) = pending.get_mut(name) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Ok(true);
                }
                pending.remove(name);
            }
        }
        self.inner.exists(name).await
    }

    async fn delete(&self, name: &str) -> Result<DeletionOutcome, DomainError> {
        self.inner.delete(name).await?;
        self.pending.lock().unwrap().insert(name.to_string(), self.lag);
        if self.exists(name).await? {
            Ok(DeletionOutcome::RemovalPending)
        } else {
            Ok(DeletionOutcome::ConfirmedRemoved)
        }
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

/// Store whose backend is unreachable for every data-plane call.
pub struct FailingStore;

#[async_trait::async_trait]
impl IdentityStore for FailingStore {
    async fn ensure_collection(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn upsert(&self, _name: &str, _vector: &Embedding) -> Result<(), DomainError> {
        Err(DomainError::StoreUnavailable("connection refused".into()))
    }

    async fn search(&self, _vector: &Embedding, _limit: usize) -> Result<Vec<SimilarityMatch>, DomainError> {
        Err(DomainError::StoreUnavailable("connection refused".into()))
    }

    async fn exists(&self, _name: &str) -> Result<bool, DomainError> {
        Err(DomainError::StoreUnavailable("connection refused".into()))
    }

    async fn delete(&self, _name: &str) -> Result<DeletionOutcome, DomainError> {
        Err(DomainError::StoreUnavailable("connection refused".into()))
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

pub fn sqlite_store() -> Arc<dyn IdentityStore> {
    Arc::new(SqliteIdentityStore::new(Connection::open_in_memory().unwrap(), DIM))
}

pub fn emb(values: &[f32]) -> Embedding {
    Embedding::new(values.to_vec()).unwrap()
}

pub struct Harness {
    pub app: FaceId,
    pub extractor: Arc<ScriptedExtractor>,
    pub store: Arc<RecordingStore>,
}

pub async fn setup_with(
    extractor: ScriptedExtractor,
    inner: Arc<dyn IdentityStore>,
    threshold: SimilarityThreshold,
) -> Harness {
    let extractor = Arc::new(extractor);
    let store = Arc::new(RecordingStore::new(inner));
    let app = FaceId::with_components(extractor.clone(), store.clone(), threshold)
        .await
        .unwrap();
    Harness { app, extractor, store }
}

pub async fn setup(extractor: ScriptedExtractor) -> Harness {
    setup_with(extractor, sqlite_store(), SimilarityThreshold::default()).await
}
