//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or pretty stdout formatting
//! - `RUST_LOG` environment filter overrides

pub mod logger;

pub use logger::init_logging;
