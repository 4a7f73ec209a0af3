use serde::Serialize;

/// A face embedding: a non-empty, finite vector of a fixed dimension.
///
/// Embeddings are only meaningful relative to other embeddings produced by
/// the same extractor, so the type carries no notion of units or scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Result<Self, String> {
        if values.is_empty() {
            return Err("Embedding must not be empty".to_string());
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(format!("Embedding value at index {pos} is not finite"));
        }
        Ok(Embedding(values))
    }

    /// Like [`Embedding::new`], additionally requiring exactly `dimension` values.
    pub fn with_dimension(values: Vec<f32>, dimension: usize) -> Result<Self, String> {
        let embedding = Self::new(values)?;
        embedding.check_dimension(dimension)?;
        Ok(embedding)
    }

    pub fn check_dimension(&self, dimension: usize) -> Result<(), String> {
        if self.0.len() != dimension {
            return Err(format!(
                "Embedding dimension mismatch: got {}, want {dimension}",
                self.0.len()
            ));
        }
        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Element-wise arithmetic mean of `samples`.
    ///
    /// Every sample must share the dimension of the first one. Returns `None`
    /// for an empty slice.
    pub fn mean(samples: &[Embedding]) -> Option<Embedding> {
        let first = samples.first()?;
        debug_assert!(
            samples.iter().all(|s| s.dimension() == first.dimension()),
            "mean over embeddings of different dimensions"
        );
        let mut sums = vec![0.0_f64; first.dimension()];
        for sample in samples {
            for (acc, v) in sums.iter_mut().zip(sample.as_slice()) {
                *acc += *v as f64;
            }
        }
        let count = samples.len() as f64;
        Some(Embedding(sums.into_iter().map(|s| (s / count) as f32).collect()))
    }

    /// Cosine similarity in `[-1, 1]`. Zero vectors and mismatched
    /// dimensions score 0.
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        let (a, b) = (self.as_slice(), other.as_slice());
        if a.len() != b.len() {
            return 0.0;
        }
        let mut dot = 0.0_f64;
        let mut norm_a = 0.0_f64;
        let mut norm_b = 0.0_f64;
        for (x, y) in a.iter().zip(b.iter()) {
            let x = *x as f64;
            let y = *y as f64;
            dot += x * y;
            norm_a += x * x;
            norm_b += y * y;
        }
        let denom = norm_a.sqrt() * norm_b.sqrt();
        if denom == 0.0 {
            0.0
        } else {
            (dot / denom).clamp(-1.0, 1.0) as f32
        }
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, String> {
        if bytes.len() % 4 != 0 {
            return Err(format!("Vector blob length {} is not a multiple of 4", bytes.len()));
        }
        let values = bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Self::new(values)
    }
}
