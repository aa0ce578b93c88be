//! Post-remediation score pass and the dry-run estimator.
//!
//! The reanalyzer recomputes and persists the aggregate score only; it must
//! never re-trigger issue detection, because freshly mutated content would
//! re-surface issues whose tracked status has not been reconciled yet and
//! create a false "reappeared" signal. The score is derived from the issue
//! store's current open set, so no crawl happens at all.

use chrono::Utc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::models::{
    Fix, IssueSeverity, IssueStatus, ReanalysisOutcome, TrackedIssue,
};
use crate::domain::ports::{IssueQuery, IssueStore, StoreError, WebsiteStore};

/// Severity multiplier applied to per-type weights when scoring.
fn severity_scale(severity: IssueSeverity) -> f64 {
    match severity {
        IssueSeverity::Critical => 1.5,
        IssueSeverity::Warning => 1.0,
        IssueSeverity::Info => 0.5,
    }
}

/// Aggregate score for a set of open issues: 100 minus the weighted open
/// deductions, clamped to [0, 100].
pub fn score_from_open_issues(open: &[TrackedIssue]) -> f64 {
    let deduction: f64 = open
        .iter()
        .map(|issue| issue.issue_type.score_weight() * severity_scale(issue.severity))
        .sum();
    (100.0 - deduction).clamp(0.0, 100.0)
}

/// Estimated score delta for a set of fixes, from the static per-type weight
/// table scaled by each fix's impact tier, capped at `cap` points total.
pub fn estimate_improvement(fixes: &[Fix], cap: f64) -> f64 {
    let total: f64 = fixes
        .iter()
        .filter(|f| f.success)
        .map(|f| f.fix_type.score_weight() * f.impact.estimate_scale())
        .sum();
    total.min(cap)
}

/// Score-only reanalysis over the website and issue stores.
pub struct ScoreReanalyzer<'a> {
    pub websites: &'a dyn WebsiteStore,
    pub issues: &'a dyn IssueStore,
}

impl ScoreReanalyzer<'_> {
    /// Wait out the propagation delay, recompute the aggregate score from
    /// the store's open issues, persist it, and report the delta.
    ///
    /// Failures are folded into the outcome; this never raises past its
    /// boundary because a failed rescore must not fail the run.
    #[instrument(skip(self), fields(website_id = %website_id))]
    pub async fn reanalyze(
        &self,
        website_id: Uuid,
        user_id: Uuid,
        propagation_delay: Duration,
    ) -> ReanalysisOutcome {
        tokio::time::sleep(propagation_delay).await;
        let started = Instant::now();

        match self.rescore(website_id, user_id).await {
            Ok((initial, fin)) => {
                info!(initial, final_score = fin, "reanalysis complete");
                ReanalysisOutcome {
                    initial_score: initial,
                    final_score: fin,
                    score_improvement: fin - initial,
                    analysis_time_ms: elapsed_ms(started),
                    success: true,
                    error: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "reanalysis failed");
                ReanalysisOutcome {
                    initial_score: 0.0,
                    final_score: 0.0,
                    score_improvement: 0.0,
                    analysis_time_ms: elapsed_ms(started),
                    success: false,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    async fn rescore(&self, website_id: Uuid, user_id: Uuid) -> Result<(f64, f64), StoreError> {
        let initial = self
            .websites
            .current_score(website_id)
            .await?
            .unwrap_or(0.0);

        // Open = anything the detection pass still considers live. This is
        // a pure store read; no detection runs here.
        let open = self
            .issues
            .get_tracked_issues(
                website_id,
                user_id,
                IssueQuery {
                    statuses: vec![
                        IssueStatus::Detected,
                        IssueStatus::Reappeared,
                        IssueStatus::Fixing,
                    ],
                    ..Default::default()
                },
            )
            .await?;

        let final_score = score_from_open_issues(&open);
        self.websites
            .update_score(website_id, final_score, Utc::now())
            .await?;
        Ok((initial, final_score))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{FixImpact, IssueType};

    fn successful_fix(fix_type: IssueType, impact: FixImpact) -> Fix {
        Fix {
            fix_type,
            description: String::new(),
            element: String::new(),
            before: None,
            after: None,
            success: true,
            impact,
            error: None,
            content_id: None,
            element_path: None,
            tracked_issue_id: None,
        }
    }

    #[test]
    fn estimate_scales_by_impact() {
        let fixes = vec![
            successful_fix(IssueType::MissingMetaDescription, FixImpact::High), // 5.0
            successful_fix(IssueType::MissingAltText, FixImpact::Low),          // 1.0
        ];
        let estimate = estimate_improvement(&fixes, 40.0);
        assert!((estimate - 6.0).abs() < 1e-9);
    }

    #[test]
    fn estimate_ignores_failed_fixes() {
        let mut failed = successful_fix(IssueType::MissingH1, FixImpact::High);
        failed.success = false;
        assert_eq!(estimate_improvement(&[failed], 40.0), 0.0);
    }

    #[test]
    fn estimate_is_capped() {
        let fixes: Vec<Fix> = (0..20)
            .map(|_| successful_fix(IssueType::LowContentQuality, FixImpact::High))
            .collect();
        assert_eq!(estimate_improvement(&fixes, 40.0), 40.0);
    }

    #[test]
    fn empty_open_set_scores_full_marks() {
        assert_eq!(score_from_open_issues(&[]), 100.0);
    }
}
