pub mod identity_store;
pub mod migrations;
