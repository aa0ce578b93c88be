//! Text generation backends and provider selection.

pub mod anthropic;
pub mod cleaning;
pub mod openai;
pub mod registry;

pub use registry::{GenerationProvider, ProviderRegistry};
