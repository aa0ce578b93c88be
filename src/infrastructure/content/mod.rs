//! Content platform adapter (HTTP).

pub mod client;

pub use client::{ContentClient, ContentClientConfig};
