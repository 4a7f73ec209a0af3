use crate::domain::values::embedding::Embedding;
use serde::Serialize;
use uuid::Uuid;

/// Deterministic point id for a person's name.
///
/// UUIDv5 in the DNS namespace, so repeated registrations of one name always
/// target the same record slot.
pub fn identity_id(name: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, name.as_bytes()).to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityRecord {
    pub id: String,
    pub name: String,
    pub vector: Embedding,
}

impl IdentityRecord {
    pub fn new(name: &str, vector: Embedding) -> Self {
        Self {
            id: identity_id(name),
            name: name.to_string(),
            vector,
        }
    }
}
