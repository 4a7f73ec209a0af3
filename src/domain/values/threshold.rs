use std::fmt;

/// Minimum cosine similarity a best match needs to count as a recognition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityThreshold(f32);

impl SimilarityThreshold {
    pub fn new(value: f32) -> Result<Self, String> {
        if !(-1.0..=1.0).contains(&value) {
            return Err(format!(
                "Similarity threshold must be between -1.0 and 1.0, got {value}"
            ));
        }
        Ok(SimilarityThreshold(value))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// A score equal to the threshold is accepted; only strictly lower scores
    /// are rejected. NaN is never accepted.
    pub fn accepts(&self, score: f32) -> bool {
        score >= self.0
    }
}

impl fmt::Display for SimilarityThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Default for SimilarityThreshold {
    fn default() -> Self {
        SimilarityThreshold(0.5)
    }
}
