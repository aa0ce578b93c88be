//! Tracked SEO issue domain model.
//!
//! Tracked issues are persisted records produced by the detection pass.
//! The remediation engine only moves them through their lifecycle; it never
//! creates or deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fix::FixImpact;

/// Category of SEO issue the detection pass can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    MissingAltText,
    MissingMetaDescription,
    PoorTitleTag,
    HeadingStructure,
    MissingH1,
    LowContentQuality,
    KeywordOptimization,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingAltText => "missing_alt_text",
            Self::MissingMetaDescription => "missing_meta_description",
            Self::PoorTitleTag => "poor_title_tag",
            Self::HeadingStructure => "heading_structure",
            Self::MissingH1 => "missing_h1",
            Self::LowContentQuality => "low_content_quality",
            Self::KeywordOptimization => "keyword_optimization",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "missing_alt_text" => Some(Self::MissingAltText),
            "missing_meta_description" => Some(Self::MissingMetaDescription),
            "poor_title_tag" => Some(Self::PoorTitleTag),
            "heading_structure" => Some(Self::HeadingStructure),
            "missing_h1" => Some(Self::MissingH1),
            "low_content_quality" => Some(Self::LowContentQuality),
            "keyword_optimization" => Some(Self::KeywordOptimization),
            _ => None,
        }
    }

    /// All issue types the engine knows how to remediate automatically.
    pub fn all() -> [Self; 7] {
        [
            Self::MissingAltText,
            Self::MissingMetaDescription,
            Self::PoorTitleTag,
            Self::HeadingStructure,
            Self::MissingH1,
            Self::LowContentQuality,
            Self::KeywordOptimization,
        ]
    }

    /// Static score weight used by the dry-run estimator.
    ///
    /// These mirror the weights the detection pass assigns when scoring a
    /// site, so a simulated improvement stays comparable to a real rescan.
    pub fn score_weight(&self) -> f64 {
        match self {
            Self::MissingAltText => 2.5,
            Self::MissingMetaDescription => 5.0,
            Self::PoorTitleTag => 4.0,
            Self::HeadingStructure => 3.5,
            Self::MissingH1 => 4.5,
            Self::LowContentQuality => 6.0,
            Self::KeywordOptimization => 3.0,
        }
    }

    /// Default impact tier when the detection pass did not record one.
    pub fn default_impact(&self) -> FixImpact {
        match self {
            Self::MissingMetaDescription | Self::MissingH1 | Self::LowContentQuality => {
                FixImpact::High
            }
            Self::PoorTitleTag | Self::HeadingStructure => FixImpact::Medium,
            Self::MissingAltText | Self::KeywordOptimization => FixImpact::Low,
        }
    }

    /// Rough per-fix wall-clock estimate, used by `available_fix_types`.
    pub fn estimated_seconds(&self) -> u64 {
        match self {
            Self::MissingAltText | Self::HeadingStructure | Self::MissingH1 => 5,
            Self::PoorTitleTag | Self::KeywordOptimization => 10,
            Self::MissingMetaDescription => 15,
            Self::LowContentQuality => 30,
        }
    }
}

/// Severity recorded by the detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Critical,
    Warning,
    Info,
}

impl IssueSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

/// Lifecycle status of a tracked issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Recorded by the detection pass, not yet remediated
    Detected,
    /// Claimed by an in-flight remediation session
    Fixing,
    /// A remediation session mutated content for this issue
    Fixed,
    /// Re-detected after having been fixed
    Reappeared,
    /// Manually closed outside the engine
    Resolved,
}

impl Default for IssueStatus {
    fn default() -> Self {
        Self::Detected
    }
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detected => "detected",
            Self::Fixing => "fixing",
            Self::Fixed => "fixed",
            Self::Reappeared => "reappeared",
            Self::Resolved => "resolved",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "detected" => Some(Self::Detected),
            "fixing" => Some(Self::Fixing),
            "fixed" => Some(Self::Fixed),
            "reappeared" => Some(Self::Reappeared),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    /// Valid transitions from this status.
    ///
    /// `Resolved` is reachable from anywhere because it is a manual override
    /// applied outside the engine; the engine itself never sets it.
    pub fn valid_transitions(&self) -> Vec<IssueStatus> {
        match self {
            Self::Detected => vec![Self::Fixing, Self::Resolved],
            Self::Fixing => vec![Self::Fixed, Self::Detected, Self::Resolved],
            Self::Fixed => vec![Self::Reappeared, Self::Resolved],
            Self::Reappeared => vec![Self::Fixing, Self::Resolved],
            Self::Resolved => vec![],
        }
    }

    pub fn can_transition_to(&self, new_status: Self) -> bool {
        self.valid_transitions().contains(&new_status)
    }

    /// Whether a remediation session may claim an issue in this status.
    pub fn is_fixable(&self) -> bool {
        matches!(self, Self::Detected | Self::Reappeared)
    }
}

/// A persisted SEO issue with its remediation lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedIssue {
    pub id: Uuid,
    pub website_id: Uuid,
    pub issue_type: IssueType,
    pub title: String,
    pub description: String,
    pub severity: IssueSeverity,
    pub status: IssueStatus,
    /// Value observed by the detection pass (e.g. the current meta description)
    pub current_value: Option<String>,
    /// Value the detection pass recommends
    pub recommended_value: Option<String>,
    /// CSS-path-like locator of the offending element, when known
    pub element_path: Option<String>,
    pub auto_fix_available: bool,
    /// How the issue was (or would be) remediated, e.g. "automated"
    pub fix_method: Option<String>,
    /// Correlation id of the session currently or last holding this issue
    pub fix_session_id: Option<Uuid>,
    pub last_seen_at: DateTime<Utc>,
    pub fixed_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TrackedIssue {
    /// Impact tier for prioritization: detection-recorded severity first,
    /// falling back to the per-type default.
    pub fn impact(&self) -> FixImpact {
        match self.severity {
            IssueSeverity::Critical => FixImpact::High,
            IssueSeverity::Warning => self.issue_type.default_impact(),
            IssueSeverity::Info => FixImpact::Low,
        }
    }
}
