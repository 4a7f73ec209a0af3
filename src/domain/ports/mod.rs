pub mod face_extractor;
pub mod identity_store;
