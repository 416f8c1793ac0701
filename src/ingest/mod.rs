//! Ingestion: raw extract rows to normalized organization documents.

pub mod loader;
pub mod normalize;
