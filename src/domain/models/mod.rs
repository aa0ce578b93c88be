pub mod config;
pub mod content;
pub mod fix;
pub mod issue;
pub mod remediation;

pub use config::{
    Config, DatabaseConfig, GenerationConfig, LoggingConfig, ProviderConfig, RemediationConfig,
};
pub use content::{ContentCollection, ContentItem, ContentUpdate, WebsiteCredentials};
pub use fix::{Fix, FixImpact};
pub use issue::{IssueSeverity, IssueStatus, IssueType, TrackedIssue};
pub use remediation::{
    FixTypeSummary, ReanalysisOutcome, RemediationOptions, RemediationResult, RemediationStats,
};
