//! Ephemeral fix records.
//!
//! A `Fix` describes one remediation attempt within a single engine run.
//! Fixes are never persisted; they exist to carry mutation outcomes from the
//! strategy pipeline back to reconciliation and into the caller's result.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::issue::{IssueType, TrackedIssue};

/// Expected score impact of a fix, used for prioritization and estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixImpact {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl FixImpact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Scale factor applied to per-type score weights in dry-run estimation.
    pub fn estimate_scale(&self) -> f64 {
        match self {
            Self::High => 1.0,
            Self::Medium => 0.7,
            Self::Low => 0.4,
        }
    }
}

/// One remediation attempt, scoped to a single engine run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fix {
    pub fix_type: IssueType,
    pub description: String,
    /// Human-readable target, e.g. `img[src="/uploads/cat.jpg"]`
    pub element: String,
    pub before: Option<String>,
    pub after: Option<String>,
    pub success: bool,
    pub impact: FixImpact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Remote content item the mutation landed on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_path: Option<String>,
    /// Exact-correlation key back to the persisted issue, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracked_issue_id: Option<Uuid>,
}

impl Fix {
    /// Seed a pending fix from a tracked issue. Strategies fill in the
    /// mutation details; reconciliation relies on `tracked_issue_id`.
    pub fn from_issue(issue: &TrackedIssue) -> Self {
        Self {
            fix_type: issue.issue_type,
            description: issue.description.clone(),
            element: issue
                .element_path
                .clone()
                .unwrap_or_else(|| issue.issue_type.as_str().to_string()),
            before: issue.current_value.clone(),
            after: None,
            success: false,
            impact: issue.impact(),
            error: None,
            content_id: None,
            element_path: issue.element_path.clone(),
            tracked_issue_id: Some(issue.id),
        }
    }

    /// Mark this fix successful with a description of what happened.
    pub fn succeed(&mut self, description: impl Into<String>) {
        self.success = true;
        self.error = None;
        self.description = description.into();
    }

    /// Mark this fix failed, keeping the error for the caller.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.success = false;
        self.error = Some(error.into());
    }

    /// Whether this fix already has an outcome (success or recorded error).
    /// Settled fixes are not re-run against later content items.
    pub fn is_settled(&self) -> bool {
        self.success || self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_orders_high_over_low() {
        assert!(FixImpact::High > FixImpact::Medium);
        assert!(FixImpact::Medium > FixImpact::Low);
    }

    #[test]
    fn succeed_clears_previous_error() {
        let mut fix = Fix {
            fix_type: IssueType::MissingAltText,
            description: String::new(),
            element: "img".to_string(),
            before: None,
            after: None,
            success: false,
            impact: FixImpact::Low,
            error: Some("transient".to_string()),
            content_id: None,
            element_path: None,
            tracked_issue_id: None,
        };
        fix.succeed("added alt text");
        assert!(fix.success);
        assert!(fix.error.is_none());
        assert_eq!(fix.description, "added alt text");
    }
}
