use crate::domain::error::DomainError;
use crate::domain::ports::face_extractor::FaceExtractor;
use crate::domain::ports::identity_store::IdentityStore;
use crate::domain::values::embedding::Embedding;
use serde::Serialize;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{info, warn};

/// Raw image bytes, possibly still encoded as they arrived from a caller.
///
/// Decoding happens only after the name has been checked, so a duplicate
/// registration is reported as such regardless of the image payload.
pub trait ImageSource {
    fn bytes(&self) -> Result<Cow<'_, [u8]>, DomainError>;
}

impl ImageSource for Vec<u8> {
    fn bytes(&self) -> Result<Cow<'_, [u8]>, DomainError> {
        Ok(Cow::Borrowed(self))
    }
}

/// An image that contributed no sample, with the number of faces detected on it.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedImage {
    pub index: usize,
    pub faces: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub samples_used: usize,
    pub skipped: Vec<SkippedImage>,
}

impl Registration {
    pub fn message(&self) -> String {
        format!("Person {} registered successfully", self.name)
    }
}

pub struct RegisterUseCase {
    extractor: Arc<dyn FaceExtractor>,
    store: Arc<dyn IdentityStore>,
}

impl RegisterUseCase {
    pub fn new(extractor: Arc<dyn FaceExtractor>, store: Arc<dyn IdentityStore>) -> Self {
        Self { extractor, store }
    }

    /// Register `name` from a batch of images.
    ///
    /// Images with zero or several faces are skipped. The stored vector is the
    /// plain arithmetic mean of the single-face samples. Nothing is written
    /// unless at least one sample survives.
    pub async fn execute<I>(&self, name: &str, images: &[I]) -> Result<Registration, DomainError>
    where
        I: ImageSource + Sync,
    {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidInput("Name must not be empty".into()));
        }

        if self.store.exists(name).await? {
            return Err(DomainError::AlreadyRegistered(name.to_string()));
        }

        let decoded = images.iter().map(|i| i.bytes()).collect::<Result<Vec<_>, _>>()?;

        let mut samples = Vec::with_capacity(decoded.len());
        let mut skipped = Vec::new();
        for (index, image) in decoded.iter().enumerate() {
            let mut faces = self.extractor.extract(image).await?;
            match faces.len() {
                1 => samples.push(faces.remove(0)),
                0 => {
                    warn!(person = name, image = index, "no faces found, skipping image");
                    skipped.push(SkippedImage { index, faces: 0 });
                }
                n => {
                    warn!(person = name, image = index, faces = n, "more than one face found, skipping image");
                    skipped.push(SkippedImage { index, faces: n });
                }
            }
        }

        let representative =
            Embedding::mean(&samples).ok_or_else(|| DomainError::NoUsableSamples(name.to_string()))?;

        self.store.upsert(name, &representative).await?;
        info!(person = name, samples = samples.len(), skipped = skipped.len(), "registered");

        Ok(Registration {
            name: name.to_string(),
            samples_used: samples.len(),
            skipped,
        })
    }
}
