//! Infrastructure layer module
//!
//! External integrations that satisfy the port traits defined in the
//! domain layer:
//! - Content platform HTTP client (reqwest)
//! - Text generation providers and fallback registry
//! - Configuration management (figment)
//! - Logging setup (tracing)

pub mod config;
pub mod content;
pub mod generation;
pub mod logging;
