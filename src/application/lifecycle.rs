use crate::domain::error::DomainError;
use crate::domain::ports::identity_store::IdentityStore;
use crate::domain::values::deletion::DeletionOutcome;
use std::sync::Arc;
use tracing::info;

pub struct LifecycleUseCase {
    store: Arc<dyn IdentityStore>,
}

impl LifecycleUseCase {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    pub async fn exists(&self, name: &str) -> Result<bool, DomainError> {
        self.store.exists(name).await
    }

    /// Delete a registered person. Unknown names fail with `NotFound`; a
    /// pending removal is returned as a normal outcome.
    pub async fn delete_person(&self, name: &str) -> Result<DeletionOutcome, DomainError> {
        if !self.store.exists(name).await? {
            return Err(DomainError::NotFound(name.to_string()));
        }
        let outcome = self.store.delete(name).await?;
        info!(person = name, outcome = %outcome, "deleted");
        Ok(outcome)
    }
}
