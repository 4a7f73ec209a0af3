use crate::domain::error::DomainError;
use crate::domain::ports::face_extractor::FaceExtractor;
use crate::domain::values::embedding::Embedding;
use reqwest::Client;
use serde::Deserialize;

/// Face extractor that delegates detection and embedding to an inference
/// sidecar (e.g. an ArcFace model server).
///
/// The sidecar receives the raw image at `POST {base_url}/extract` and answers
/// `{"faces": [{"embedding": [..]}, ..]}`, one entry per detected face.
pub struct HttpFaceExtractor {
    client: Client,
    base_url: String,
    dimension: usize,
}

#[derive(Deserialize)]
struct ExtractResponse {
    faces: Vec<DetectedFace>,
}

#[derive(Deserialize)]
struct DetectedFace {
    embedding: Vec<f32>,
}

impl HttpFaceExtractor {
    pub fn new(base_url: impl Into<String>, dimension: usize) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            dimension,
        }
    }

    fn parse_faces(&self, response: ExtractResponse) -> Result<Vec<Embedding>, DomainError> {
        response
            .faces
            .into_iter()
            .enumerate()
            .map(|(i, face)| {
                Embedding::with_dimension(face.embedding, self.dimension)
                    .map_err(|e| DomainError::Extractor(format!("face {i}: {e}")))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl FaceExtractor for HttpFaceExtractor {
    async fn extract(&self, image: &[u8]) -> Result<Vec<Embedding>, DomainError> {
        let resp = self
            .client
            .post(format!("{}/extract", self.base_url))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| DomainError::Extractor(format!("Extractor request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Extractor(format!("Extractor {status}: {body}")));
        }

        let parsed: ExtractResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Extractor(format!("Parse error: {e}")))?;
        self.parse_faces(parsed)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
