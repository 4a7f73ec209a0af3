use crate::domain::values::recognition_status::RecognitionStatus;
use serde::Serialize;

/// Outcome of classifying one query image.
///
/// Only `Success` carries `name` and `similarity`; the other statuses carry
/// a human-readable `error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recognition {
    pub status: RecognitionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Recognition {
    pub fn success(name: String, similarity: f32) -> Self {
        Self {
            status: RecognitionStatus::Success,
            name: Some(name),
            similarity: Some(similarity),
            error: None,
        }
    }

    pub fn no_faces() -> Self {
        Self::failed(RecognitionStatus::NoFaces, "Faces weren't recognized on the image")
    }

    pub fn multiple_faces() -> Self {
        Self::failed(
            RecognitionStatus::MultipleFaces,
            "Found more than one face on the image",
        )
    }

    pub fn not_registered() -> Self {
        Self::failed(
            RecognitionStatus::NotRegistered,
            "Person wasn't found in the database",
        )
    }

    fn failed(status: RecognitionStatus, error: &str) -> Self {
        Self {
            status,
            name: None,
            similarity: None,
            error: Some(error.to_string()),
        }
    }
}
