//! Remediation run contracts: options in, structured result out.
//!
//! `RemediationResult` is the sole output contract of the engine. Errors are
//! folded into it at the engine boundary; callers never see a raw error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::fix::Fix;
use super::issue::IssueType;

/// Caller-supplied knobs for one remediation run.
#[derive(Debug, Clone)]
pub struct RemediationOptions {
    /// Truncate the prioritized fix list to this many entries. `None` = all.
    pub max_changes: Option<usize>,
    /// Restrict the run to these issue types. Empty = all types.
    pub fix_types: Vec<IssueType>,
    /// Record a backup request with the external backup collaborator before
    /// mutating content.
    pub request_backup: bool,
    /// Re-score the site after applying fixes.
    pub run_reanalysis: bool,
    /// Wait for remote caches to settle before re-scoring.
    pub propagation_delay: std::time::Duration,
}

impl Default for RemediationOptions {
    fn default() -> Self {
        Self {
            max_changes: None,
            fix_types: Vec::new(),
            request_backup: true,
            run_reanalysis: true,
            propagation_delay: std::time::Duration::from_secs(2),
        }
    }
}

/// Aggregate counters for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemediationStats {
    pub total_issues_found: usize,
    pub fixes_attempted: usize,
    pub fixes_succeeded: usize,
    pub fixes_failed: usize,
    /// Estimated score delta (dry run) or reanalysis delta (apply)
    pub estimated_score_improvement: f64,
}

/// Outcome of the post-remediation score pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReanalysisOutcome {
    pub initial_score: f64,
    pub final_score: f64,
    pub score_improvement: f64,
    pub analysis_time_ms: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The structured result every invocation of the engine returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationResult {
    pub success: bool,
    pub dry_run: bool,
    pub fixes_applied: Vec<Fix>,
    pub stats: RemediationStats,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
    pub message: String,
    pub detailed_log: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reanalysis: Option<ReanalysisOutcome>,
    pub fix_session_id: Uuid,
    pub completed_at: DateTime<Utc>,
}

impl RemediationResult {
    /// A failure result carrying the detailed log collected so far.
    pub fn failure(
        fix_session_id: Uuid,
        dry_run: bool,
        message: impl Into<String>,
        errors: Vec<String>,
        detailed_log: Vec<String>,
    ) -> Self {
        Self {
            success: false,
            dry_run,
            fixes_applied: Vec::new(),
            stats: RemediationStats::default(),
            errors,
            message: message.into(),
            detailed_log,
            reanalysis: None,
            fix_session_id,
            completed_at: Utc::now(),
        }
    }
}

/// Summary returned by `available_fix_types`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixTypeSummary {
    pub available_fixes: Vec<String>,
    pub total_fixable_issues: usize,
    /// Rough total wall-clock estimate in seconds
    pub estimated_time_secs: u64,
    /// Fixable issue count per issue type
    pub breakdown: HashMap<String, usize>,
}
