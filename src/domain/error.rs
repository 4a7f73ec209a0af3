use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Person with name '{0}' has already been registered")]
    AlreadyRegistered(String),

    #[error("Couldn't extract embeddings from the images for '{0}'")]
    NoUsableSamples(String),

    #[error("Person '{0}' not found")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Extractor error: {0}")]
    Extractor(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DomainError {
    /// True for failures of an upstream collaborator rather than of the caller's input.
    pub fn is_upstream(&self) -> bool {
        matches!(self, DomainError::Extractor(_) | DomainError::StoreUnavailable(_))
    }
}
