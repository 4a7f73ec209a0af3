pub mod extractors;
pub mod qdrant;
pub mod sqlite;
