use crate::domain::error::DomainError;
use crate::domain::values::threshold::SimilarityThreshold;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Qdrant,
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qdrant" => Ok(StoreBackend::Qdrant),
            "sqlite" => Ok(StoreBackend::Sqlite),
            _ => Err(format!("Unknown store backend: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorBackend {
    Http,
    Noop,
}

impl FromStr for ExtractorBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(ExtractorBackend::Http),
            "noop" => Ok(ExtractorBackend::Noop),
            _ => Err(format!("Unknown extractor backend: {s}")),
        }
    }
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    pub qdrant_url: String,
    pub collection: String,
    pub db_path: String,
    pub embedding_size: usize,
    pub threshold: SimilarityThreshold,
    pub extractor: ExtractorBackend,
    pub extractor_url: String,
    pub listen: String,
    /// Largest accepted HTTP request body; registration batches carry
    /// several base64 photos.
    pub max_body_bytes: usize,
}

pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

impl Config {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = get("FACEID_STORE")
            .map(|s| s.parse::<StoreBackend>())
            .transpose()
            .map_err(DomainError::InvalidInput)?
            .unwrap_or(StoreBackend::Qdrant);

        // QDRANT_URL wins; host/port pair kept for older deployments
        let qdrant_url = match get("QDRANT_URL") {
            Some(url) => url,
            None => {
                let host = get("QDRANT_HOST").unwrap_or_else(|| "localhost".into());
                let port: u16 = parse_var(&get, "QDRANT_PORT")?.unwrap_or(6333);
                format!("http://{host}:{port}")
            }
        };

        let embedding_size: usize = parse_var(&get, "EMBEDDING_SIZE")?.unwrap_or(512);
        if embedding_size == 0 {
            return Err(DomainError::InvalidInput("EMBEDDING_SIZE must be positive".into()));
        }

        let threshold = match parse_var::<f32, _>(&get, "SIMILARITY_THRESHOLD")? {
            Some(t) => SimilarityThreshold::new(t).map_err(DomainError::InvalidInput)?,
            None => SimilarityThreshold::default(),
        };

        let extractor = get("FACEID_EXTRACTOR")
            .map(|s| s.parse::<ExtractorBackend>())
            .transpose()
            .map_err(DomainError::InvalidInput)?
            .unwrap_or(ExtractorBackend::Http);

        let max_body_bytes: usize =
            parse_var(&get, "FACEID_MAX_BODY_BYTES")?.unwrap_or(DEFAULT_MAX_BODY_BYTES);
        if max_body_bytes == 0 {
            return Err(DomainError::InvalidInput("FACEID_MAX_BODY_BYTES must be positive".into()));
        }

        Ok(Self {
            store,
            qdrant_url,
            collection: get("COLLECTION_NAME").unwrap_or_else(|| "face_embeddings".into()),
            db_path: get("FACEID_DB").unwrap_or_else(|| "./faceid.db".into()),
            embedding_size,
            threshold,
            extractor,
            extractor_url: get("FACEID_EXTRACTOR_URL").unwrap_or_else(|| "http://localhost:8001".into()),
            listen: get("FACEID_LISTEN").unwrap_or_else(|| "0.0.0.0:8000".into()),
            max_body_bytes,
        })
    }
}

fn parse_var<T, F>(get: &F, key: &str) -> Result<Option<T>, DomainError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DomainError::InvalidInput(format!("{key}: cannot parse '{raw}'"))),
    }
}
