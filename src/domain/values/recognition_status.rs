use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionStatus {
    Success,
    NoFaces,
    MultipleFaces,
    NotRegistered,
}

impl fmt::Display for RecognitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognitionStatus::Success => write!(f, "success"),
            RecognitionStatus::NoFaces => write!(f, "no_faces"),
            RecognitionStatus::MultipleFaces => write!(f, "multiple_faces"),
            RecognitionStatus::NotRegistered => write!(f, "not_registered"),
        }
    }
}

impl FromStr for RecognitionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(RecognitionStatus::Success),
            "no_faces" => Ok(RecognitionStatus::NoFaces),
            "multiple_faces" => Ok(RecognitionStatus::MultipleFaces),
            "not_registered" => Ok(RecognitionStatus::NotRegistered),
            _ => Err(format!("Unknown recognition status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_wire_format() {
        for status in [
            RecognitionStatus::Success,
            RecognitionStatus::NoFaces,
            RecognitionStatus::MultipleFaces,
            RecognitionStatus::NotRegistered,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
            assert_eq!(status.to_string().parse::<RecognitionStatus>().unwrap(), status);
        }
        assert!("maybe".parse::<RecognitionStatus>().is_err());
    }
}
