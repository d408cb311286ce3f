pub mod build;
pub mod cache;
