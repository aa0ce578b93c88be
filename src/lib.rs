//! Sitemender - SEO issue remediation engine.
//!
//! Takes tracked SEO issues recorded by a detection pass, mutates remote
//! website content to remediate them, and reconciles outcomes back onto the
//! issue lifecycle.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure models and port traits
//! - **Service Layer** (`services`): Remediation orchestration, fix
//!   strategies, reconciliation, score reanalysis
//! - **Infrastructure Layer** (`infrastructure`): Content platform client,
//!   text generation providers, configuration, logging
//! - **Adapters** (`adapters`): SQLite implementations of the store ports
//! - **CLI Layer** (`cli`): Command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, ContentCollection, ContentItem, ContentUpdate, DatabaseConfig, Fix, FixImpact,
    FixTypeSummary, GenerationConfig, IssueSeverity, IssueStatus, IssueType, LoggingConfig,
    ReanalysisOutcome, RemediationConfig, RemediationOptions, RemediationResult, RemediationStats,
    TrackedIssue, WebsiteCredentials,
};
pub use domain::ports::{
    ActivityKind, ActivityLog, ContentSource, ContentSourceError, EngineError, GenerationError,
    GenerationRequest, IssueQuery, IssueStore, StatusUpdate, StoreError, TextGenerator,
    WebsiteStore,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{EngineSettings, RemediationEngine, ScoreReanalyzer};
