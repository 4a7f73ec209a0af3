pub mod identity_record;
pub mod recognition;
