//! Error taxonomy for the remediation engine.
//!
//! `EngineError` is the internal taxonomy; it never crosses the engine
//! boundary. `RemediationEngine::analyze_and_fix` converts every variant
//! into a structured `RemediationResult` before returning.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::IssueType;

/// Errors raised by the issue/website stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    #[error("Issue not found: {0}")]
    IssueNotFound(Uuid),

    #[error("Website not found: {0}")]
    WebsiteNotFound(Uuid),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(#[from] chrono::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

/// Errors raised by the remote content platform adapter.
#[derive(Debug, Error)]
pub enum ContentSourceError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication rejected: {0}")]
    AuthRejected(String),

    /// The target item no longer exists; callers fold this into the
    /// optimistic-convergence policy rather than treating it as a failure.
    #[error("Content not found: {collection}/{id}")]
    NotFound { collection: String, id: u64 },

    #[error("Update rejected ({status}): {body}")]
    UpdateRejected { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ContentSourceError {
    /// Whether the remote target is gone rather than the call having failed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors raised by text generation providers.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No generation provider available")]
    NoProviderAvailable,

    #[error("Provider '{provider}' failed: {message}")]
    ProviderFailed { provider: String, message: String },

    /// Both the primary and the fallback provider failed.
    #[error("All providers failed; last error from '{provider}': {message}")]
    AllProvidersFailed { provider: String, message: String },

    #[error("Empty response from provider '{0}'")]
    EmptyResponse(String),
}

/// Top-level engine error taxonomy.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller does not own the website. Fatal, raised before any side effect.
    #[error("Access denied: website {0} is not owned by the caller")]
    AccessDenied(Uuid),

    /// Content platform unreachable or credentials rejected. Fatal for
    /// apply mode, detected by the pre-flight connectivity check.
    #[error("Content platform connection failure: {0}")]
    ConnectionFailure(String),

    /// No automated remediation registered for this issue type. Recorded
    /// per-fix; never aborts the run.
    #[error("No remediation strategy for issue type '{0}'")]
    StrategyMissing(String),

    #[error("Mutation rejected by content platform: {0}")]
    MutationFailure(String),

    /// Non-fatal: the run still reports success with a failed reanalysis.
    #[error("Reanalysis failed: {0}")]
    ReanalysisFailure(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    ContentSource(#[from] ContentSourceError),
}

impl EngineError {
    /// Strategy-missing helper keyed by the issue type enum.
    pub fn strategy_missing(issue_type: IssueType) -> Self {
        Self::StrategyMissing(issue_type.as_str().to_string())
    }
}
