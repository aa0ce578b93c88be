//! Issue tracking store port.
//!
//! The engine consumes this store; it is owned by the detection pass. All
//! lifecycle mutations the engine performs go through these methods so the
//! transition rules in `IssueStatus` can be enforced in one place.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::StoreError;
use crate::domain::models::{IssueStatus, TrackedIssue};

/// Filter for fixable-issue queries.
#[derive(Debug, Clone, Default)]
pub struct IssueQuery {
    /// Match any of these statuses. Empty = all statuses.
    pub statuses: Vec<IssueStatus>,
    /// Only issues the engine can remediate without a human.
    pub auto_fixable_only: bool,
    /// Exclude issues fixed within the cool-down window.
    pub exclude_recently_fixed: bool,
    /// Cool-down window length in days (default 7).
    pub fixed_within_days: u32,
}

impl IssueQuery {
    /// The query the orchestrator uses to select remediation candidates.
    pub fn fixable(cooldown_days: u32) -> Self {
        Self {
            statuses: vec![IssueStatus::Detected, IssueStatus::Reappeared],
            auto_fixable_only: true,
            exclude_recently_fixed: true,
            fixed_within_days: cooldown_days,
        }
    }
}

/// Fields written alongside a status update.
#[derive(Debug, Clone, Default)]
pub struct StatusUpdate {
    pub fix_method: Option<String>,
    pub fix_session_id: Option<Uuid>,
    pub resolution_notes: Option<String>,
    pub fixed_at: Option<DateTime<Utc>>,
}

/// Port trait for the persisted tracked-issue store.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Query issues for a website, scoped to the owning user.
    async fn get_tracked_issues(
        &self,
        website_id: Uuid,
        user_id: Uuid,
        query: IssueQuery,
    ) -> Result<Vec<TrackedIssue>, StoreError>;

    /// Update one issue's status and bookkeeping fields.
    async fn update_issue_status(
        &self,
        issue_id: Uuid,
        status: IssueStatus,
        update: StatusUpdate,
    ) -> Result<(), StoreError>;

    /// Move a batch of issues to `status`, tagged with the session id.
    async fn bulk_update_statuses(
        &self,
        issue_ids: &[Uuid],
        status: IssueStatus,
        fix_session_id: Uuid,
    ) -> Result<(), StoreError>;

    /// Reset every issue of this website stuck in `fixing` back to
    /// `detected`, returning the issues that were reset so the caller can
    /// decide whether a concurrent run may be in flight.
    async fn reset_stale_fixing(&self, website_id: Uuid) -> Result<Vec<TrackedIssue>, StoreError>;
}
