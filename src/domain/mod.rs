//! Domain layer for the sitemender remediation engine
//!
//! Core models and the port traits adapters implement.

pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use ports::{ContentSourceError, EngineError, GenerationError, StoreError};
