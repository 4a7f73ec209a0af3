pub mod lifecycle;
pub mod recognize;
pub mod register;
