pub mod deletion;
pub mod embedding;
pub mod recognition_status;
pub mod threshold;
