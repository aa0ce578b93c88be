//! Activity log port.
//!
//! Append-only audit trail consumed by dashboards and the overlap-detection
//! regression tests. Entries are never read back by the engine itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::StoreError;

/// Kind of activity entry the engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// One aggregated entry per apply-mode run
    AutoFixApplied,
    /// Dry-run simulation completed
    AutoFixSimulated,
    /// Backup requested from the external backup collaborator
    BackupRequested,
    /// Another run appears to have been mutating this website concurrently
    OverlapWarning,
    /// Post-remediation score pass completed
    ReanalysisCompleted,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutoFixApplied => "auto_fix_applied",
            Self::AutoFixSimulated => "auto_fix_simulated",
            Self::BackupRequested => "backup_requested",
            Self::OverlapWarning => "overlap_warning",
            Self::ReanalysisCompleted => "reanalysis_completed",
        }
    }
}

/// Port trait for the append-only audit trail.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn record(
        &self,
        user_id: Uuid,
        website_id: Uuid,
        kind: ActivityKind,
        description: &str,
        metadata: serde_json::Value,
    ) -> Result<(), StoreError>;
}
