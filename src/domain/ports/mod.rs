//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that adapters implement:
//! - `IssueStore`: persisted tracked-issue lifecycle operations
//! - `ContentSource`: remote content platform fetch/update
//! - `TextGenerator`: LLM-backed text generation with fallback
//! - `WebsiteStore`: ownership, credentials, aggregate score
//! - `ActivityLog`: append-only audit trail
//!
//! These contracts keep the remediation services independent of any
//! specific infrastructure implementation.

pub mod activity_log;
pub mod content_source;
pub mod errors;
pub mod issue_store;
pub mod text_generator;
pub mod website_store;

pub use activity_log::{ActivityKind, ActivityLog};
pub use content_source::ContentSource;
pub use errors::{ContentSourceError, EngineError, GenerationError, StoreError};
pub use issue_store::{IssueQuery, IssueStore, StatusUpdate};
pub use text_generator::{GenerationRequest, TextGenerator};
pub use website_store::WebsiteStore;
