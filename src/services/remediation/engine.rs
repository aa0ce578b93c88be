//! Remediation orchestrator.
//!
//! `analyze_and_fix` is the single entry point callers use. It validates
//! ownership, self-heals issues stuck in `fixing` from crashed runs, selects
//! and prioritizes fixable issues, and either simulates (dry run) or applies
//! the fixes, reconciling outcomes back onto the tracked issues. Errors are
//! converted into a structured result at the boundary; nothing escapes.

use chrono::{Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::domain::models::{
    Fix, FixTypeSummary, IssueStatus, IssueType, RemediationOptions, RemediationResult,
    RemediationStats, TrackedIssue,
};
use crate::domain::ports::{
    ActivityKind, ActivityLog, ContentSource, EngineError, IssueQuery, IssueStore, StatusUpdate,
    TextGenerator, WebsiteStore,
};
use crate::services::reanalysis::{estimate_improvement, ScoreReanalyzer};
use crate::services::run_log::RunLog;

use super::pipeline::GroupRun;
use super::reconcile::{match_fixes_to_issues, ReconcilePlan};

/// Engine-level tunables, normally sourced from `RemediationConfig`.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub cooldown_days: u32,
    pub content_window: usize,
    pub max_estimated_improvement: f64,
    /// `fixing` issues fresher than this when reset suggest an overlapping
    /// concurrent run rather than a crashed one.
    pub stale_fixing_minutes: i64,
}

impl From<&crate::domain::models::RemediationConfig> for EngineSettings {
    fn from(config: &crate::domain::models::RemediationConfig) -> Self {
        Self {
            cooldown_days: config.cooldown_days,
            content_window: config.content_window,
            max_estimated_improvement: config.max_estimated_improvement,
            stale_fixing_minutes: config.stale_fixing_minutes,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&crate::domain::models::RemediationConfig::default())
    }
}

/// The issue remediation engine.
pub struct RemediationEngine {
    issues: Arc<dyn IssueStore>,
    websites: Arc<dyn WebsiteStore>,
    content: Arc<dyn ContentSource>,
    generator: Arc<dyn TextGenerator>,
    activity: Arc<dyn ActivityLog>,
    settings: EngineSettings,
}

impl RemediationEngine {
    pub fn new(
        issues: Arc<dyn IssueStore>,
        websites: Arc<dyn WebsiteStore>,
        content: Arc<dyn ContentSource>,
        generator: Arc<dyn TextGenerator>,
        activity: Arc<dyn ActivityLog>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            issues,
            websites,
            content,
            generator,
            activity,
            settings,
        }
    }

    /// Analyze tracked issues and fix what can be fixed.
    ///
    /// Never returns an error: every failure is folded into the result.
    #[instrument(skip(self, options), fields(website_id = %website_id, dry_run))]
    pub async fn analyze_and_fix(
        &self,
        website_id: Uuid,
        user_id: Uuid,
        dry_run: bool,
        options: RemediationOptions,
    ) -> RemediationResult {
        let fix_session_id = Uuid::new_v4();
        let mut log = RunLog::new();
        log.add(format!(
            "remediation session {fix_session_id} started ({})",
            if dry_run { "dry run" } else { "apply" }
        ));

        match self
            .run(website_id, user_id, dry_run, &options, fix_session_id, &mut log)
            .await
        {
            Ok(mut result) => {
                result.detailed_log = log.into_lines();
                result
            }
            Err(err) => {
                error!(error = %err, "remediation run failed");
                log.warn(format!("run aborted: {err}"));
                RemediationResult::failure(
                    fix_session_id,
                    dry_run,
                    format!("Remediation failed: {err}"),
                    vec![err.to_string()],
                    log.into_lines(),
                )
            }
        }
    }

    /// Fixable-issue summary for UI/CLI callers.
    pub async fn available_fix_types(
        &self,
        website_id: Uuid,
        user_id: Uuid,
    ) -> Result<FixTypeSummary, EngineError> {
        self.check_ownership(website_id, user_id).await?;
        let fixable = self
            .issues
            .get_tracked_issues(
                website_id,
                user_id,
                IssueQuery::fixable(self.settings.cooldown_days),
            )
            .await?;

        let mut breakdown: HashMap<String, usize> = HashMap::new();
        let mut estimated_time_secs = 0;
        for issue in &fixable {
            *breakdown
                .entry(issue.issue_type.as_str().to_string())
                .or_default() += 1;
            estimated_time_secs += issue.issue_type.estimated_seconds();
        }
        let mut available_fixes: Vec<String> = breakdown.keys().cloned().collect();
        available_fixes.sort();

        Ok(FixTypeSummary {
            available_fixes,
            total_fixable_issues: fixable.len(),
            estimated_time_secs,
            breakdown,
        })
    }

    async fn run(
        &self,
        website_id: Uuid,
        user_id: Uuid,
        dry_run: bool,
        options: &RemediationOptions,
        fix_session_id: Uuid,
        log: &mut RunLog,
    ) -> Result<RemediationResult, EngineError> {
        // 1. Ownership gate. Nothing may touch the store before this passes.
        self.check_ownership(website_id, user_id).await?;

        // 2. Self-healing sweep: issues stuck in `fixing` from a crashed run
        // go back to `detected`. Freshly-touched ones suggest an overlapping
        // run, which gets an audit warning (there is no cross-run lock).
        let reset = self.issues.reset_stale_fixing(website_id).await?;
        if !reset.is_empty() {
            log.add(format!(
                "reset {} issue(s) stuck in fixing from a previous run",
                reset.len()
            ));
            self.warn_on_overlap(website_id, user_id, &reset, log).await;
        }

        // 3. Select candidates.
        let mut candidates = self
            .issues
            .get_tracked_issues(
                website_id,
                user_id,
                IssueQuery::fixable(self.settings.cooldown_days),
            )
            .await?;
        if !options.fix_types.is_empty() {
            candidates.retain(|i| options.fix_types.contains(&i.issue_type));
        }
        let total_found = candidates.len();
        log.add(format!("{total_found} fixable issue(s) found"));

        // 4. Nothing to fix is a normal, successful outcome.
        if candidates.is_empty() {
            return Ok(RemediationResult {
                success: true,
                dry_run,
                fixes_applied: Vec::new(),
                stats: RemediationStats::default(),
                errors: Vec::new(),
                message: "No fixable issues found".to_string(),
                detailed_log: Vec::new(),
                reanalysis: None,
                fix_session_id,
                completed_at: Utc::now(),
            });
        }

        // 5. Prioritize by impact and honor the change cap.
        candidates.sort_by(|a, b| b.impact().cmp(&a.impact()));
        if let Some(max) = options.max_changes {
            candidates.truncate(max);
            log.add(format!("truncated to {} candidate(s) (max_changes)", candidates.len()));
        }

        if dry_run {
            return Ok(self.simulate(website_id, user_id, &candidates, total_found, fix_session_id, log).await);
        }
        self.apply(website_id, user_id, candidates, total_found, options, fix_session_id, log)
            .await
    }

    /// Dry-run branch: no mutation anywhere, estimated score delta from the
    /// static weight table.
    async fn simulate(
        &self,
        website_id: Uuid,
        user_id: Uuid,
        candidates: &[TrackedIssue],
        total_found: usize,
        fix_session_id: Uuid,
        log: &mut RunLog,
    ) -> RemediationResult {
        let fixes: Vec<Fix> = candidates
            .iter()
            .map(|issue| {
                let mut fix = Fix::from_issue(issue);
                fix.succeed(format!("[dry run] would remediate: {}", issue.title));
                fix
            })
            .collect();

        let estimate = estimate_improvement(&fixes, self.settings.max_estimated_improvement);
        log.add(format!(
            "dry run complete: {} fix(es) simulated, estimated +{estimate:.1} score",
            fixes.len()
        ));

        let initial = self
            .websites
            .current_score(website_id)
            .await
            .ok()
            .flatten()
            .unwrap_or(0.0);
        let reanalysis = crate::domain::models::ReanalysisOutcome {
            initial_score: initial,
            final_score: (initial + estimate).min(100.0),
            score_improvement: estimate,
            analysis_time_ms: 0,
            success: true,
            error: None,
        };

        self.record_activity(
            user_id,
            website_id,
            ActivityKind::AutoFixSimulated,
            &format!("Simulated {} SEO fix(es)", fixes.len()),
            serde_json::json!({
                "fix_session_id": fix_session_id,
                "simulated": fixes.len(),
                "estimated_improvement": estimate,
            }),
            log,
        )
        .await;

        let count = fixes.len();
        RemediationResult {
            success: true,
            dry_run: true,
            stats: RemediationStats {
                total_issues_found: total_found,
                fixes_attempted: count,
                fixes_succeeded: count,
                fixes_failed: 0,
                estimated_score_improvement: estimate,
            },
            fixes_applied: fixes,
            errors: Vec::new(),
            message: format!("Dry run: {count} fix(es) would be applied"),
            detailed_log: Vec::new(),
            reanalysis: Some(reanalysis),
            fix_session_id,
            completed_at: Utc::now(),
        }
    }

    /// Apply branch: mark-fixing, mutate, reconcile, cleanup, rescore.
    #[allow(clippy::too_many_lines)]
    async fn apply(
        &self,
        website_id: Uuid,
        user_id: Uuid,
        candidates: Vec<TrackedIssue>,
        total_found: usize,
        options: &RemediationOptions,
        fix_session_id: Uuid,
        log: &mut RunLog,
    ) -> Result<RemediationResult, EngineError> {
        let credentials = self.websites.credentials(website_id).await?;

        // Pre-flight: apply mode must not start mutating against a platform
        // it cannot reach or authenticate with.
        self.content
            .check_connection(&credentials)
            .await
            .map_err(|e| EngineError::ConnectionFailure(e.to_string()))?;
        log.add("content platform connection verified".to_string());

        // Issues whose recorded fix method is not automated have no strategy.
        let (automated, manual): (Vec<_>, Vec<_>) =
            candidates.into_iter().partition(is_automated);
        let mut fixes: Vec<Fix> = Vec::new();
        for issue in &manual {
            let mut fix = Fix::from_issue(issue);
            fix.fail(
                EngineError::strategy_missing(issue.issue_type).to_string(),
            );
            fixes.push(fix);
        }

        // Claim the automated issues for this session.
        let claimed_ids: Vec<Uuid> = automated.iter().map(|i| i.id).collect();
        self.issues
            .bulk_update_statuses(&claimed_ids, IssueStatus::Fixing, fix_session_id)
            .await?;
        log.add(format!("marked {} issue(s) fixing", claimed_ids.len()));

        if options.request_backup {
            self.record_activity(
                user_id,
                website_id,
                ActivityKind::BackupRequested,
                "Requested website backup before automated fixes",
                serde_json::json!({ "fix_session_id": fix_session_id }),
                log,
            )
            .await;
        }

        // Mutation pipeline, one group at a time, never concurrently: two
        // strategies must not write the same remote item at once.
        let groups = group_by_type(&automated);
        let runner = GroupRun {
            content: self.content.as_ref(),
            generator: self.generator.as_ref(),
            credentials: &credentials,
            content_window: self.settings.content_window,
        };
        for (issue_type, group_issues) in groups {
            let mut group_fixes: Vec<Fix> = group_issues.iter().map(|i| Fix::from_issue(i)).collect();
            runner.execute(issue_type, &mut group_fixes, log).await;
            fixes.extend(group_fixes);
        }

        // Reconcile outcomes onto the claimed issues, then sweep: nothing
        // may outlive this run in the fixing state. Issues whose transition
        // write failed are still `fixing`, so they join the sweep too.
        let mut errors = Vec::new();
        let plan = match_fixes_to_issues(&fixes, &automated_as_fixing(&automated));
        let failed_transitions = self.apply_plan(&plan, fix_session_id, log, &mut errors).await;
        let mut stuck = plan.unmatched_issue_ids.clone();
        stuck.extend(failed_transitions);
        self.cleanup_sweep(&stuck, fix_session_id, log, &mut errors).await;

        let succeeded = fixes.iter().filter(|f| f.success).count();
        let failed = fixes.len() - succeeded;

        let reanalysis = if options.run_reanalysis {
            let reanalyzer = ScoreReanalyzer {
                websites: self.websites.as_ref(),
                issues: self.issues.as_ref(),
            };
            let outcome = reanalyzer
                .reanalyze(website_id, user_id, options.propagation_delay)
                .await;
            if outcome.success {
                self.record_activity(
                    user_id,
                    website_id,
                    ActivityKind::ReanalysisCompleted,
                    &format!(
                        "Score {:.1} -> {:.1} after remediation",
                        outcome.initial_score, outcome.final_score
                    ),
                    serde_json::json!({ "fix_session_id": fix_session_id }),
                    log,
                )
                .await;
            } else if let Some(err) = &outcome.error {
                errors.push(format!("reanalysis: {err}"));
            }
            Some(outcome)
        } else {
            None
        };

        let estimated = reanalysis
            .as_ref()
            .filter(|r| r.success)
            .map_or_else(
                || estimate_improvement(&fixes, self.settings.max_estimated_improvement),
                |r| r.score_improvement,
            );

        self.record_activity(
            user_id,
            website_id,
            ActivityKind::AutoFixApplied,
            &format!("Applied {succeeded} of {} SEO fix(es)", fixes.len()),
            serde_json::json!({
                "fix_session_id": fix_session_id,
                "attempted": fixes.len(),
                "succeeded": succeeded,
                "failed": failed,
            }),
            log,
        )
        .await;

        let message = format!("Applied {succeeded} of {} fix(es)", fixes.len());
        Ok(RemediationResult {
            success: true,
            dry_run: false,
            stats: RemediationStats {
                total_issues_found: total_found,
                fixes_attempted: fixes.len(),
                fixes_succeeded: succeeded,
                fixes_failed: failed,
                estimated_score_improvement: estimated,
            },
            fixes_applied: fixes,
            errors,
            message,
            detailed_log: Vec::new(),
            reanalysis,
            fix_session_id,
            completed_at: Utc::now(),
        })
    }

    async fn check_ownership(&self, website_id: Uuid, user_id: Uuid) -> Result<(), EngineError> {
        match self.websites.website_owner(website_id).await? {
            Some(owner) if owner == user_id => Ok(()),
            _ => Err(EngineError::AccessDenied(website_id)),
        }
    }

    /// Reset issues that were touched very recently point at a concurrent
    /// run still in flight; leave a detectable warning in the audit log.
    async fn warn_on_overlap(
        &self,
        website_id: Uuid,
        user_id: Uuid,
        reset: &[TrackedIssue],
        log: &mut RunLog,
    ) {
        let threshold = Utc::now() - ChronoDuration::minutes(self.settings.stale_fixing_minutes);
        let fresh: Vec<&TrackedIssue> = reset
            .iter()
            .filter(|i| i.updated_at > threshold)
            .collect();
        if fresh.is_empty() {
            return;
        }
        let sessions: Vec<String> = fresh
            .iter()
            .filter_map(|i| i.fix_session_id.map(|s| s.to_string()))
            .collect();
        log.warn(format!(
            "{} issue(s) were actively fixing within the last {} minutes; \
             another remediation run may be in flight",
            fresh.len(),
            self.settings.stale_fixing_minutes
        ));
        self.record_activity(
            user_id,
            website_id,
            ActivityKind::OverlapWarning,
            "Possible concurrent remediation run detected",
            serde_json::json!({
                "reset_issues": fresh.iter().map(|i| i.id).collect::<Vec<_>>(),
                "previous_sessions": sessions,
            }),
            log,
        )
        .await;
    }

    /// Apply the reconciliation plan. Returns the ids of transitions whose
    /// store write failed; those issues are still `fixing` and must be
    /// handed to the cleanup sweep.
    async fn apply_plan(
        &self,
        plan: &ReconcilePlan,
        fix_session_id: Uuid,
        log: &mut RunLog,
        errors: &mut Vec<String>,
    ) -> Vec<Uuid> {
        let mut failed = Vec::new();
        for transition in &plan.transitions {
            let update = StatusUpdate {
                fix_method: Some("automated".to_string()),
                fix_session_id: Some(fix_session_id),
                resolution_notes: Some(transition.notes.clone()),
                fixed_at: transition.fixed_at,
            };
            if let Err(err) = self
                .issues
                .update_issue_status(transition.issue_id, transition.to, update)
                .await
            {
                log.warn(format!(
                    "failed to move issue {} to {}: {err}",
                    transition.issue_id,
                    transition.to.as_str()
                ));
                errors.push(err.to_string());
                failed.push(transition.issue_id);
            }
        }
        log.add(format!("reconciled {} issue(s)", plan.transitions.len()));
        failed
    }

    /// Unconditional end-of-run sweep: every session-claimed issue still
    /// `fixing` (unmatched by any fix, or whose transition write failed)
    /// goes back to `detected`, so no issue outlives the run in the fixing
    /// state.
    async fn cleanup_sweep(
        &self,
        stuck_ids: &[Uuid],
        fix_session_id: Uuid,
        log: &mut RunLog,
        errors: &mut Vec<String>,
    ) {
        if stuck_ids.is_empty() {
            return;
        }
        match self
            .issues
            .bulk_update_statuses(stuck_ids, IssueStatus::Detected, fix_session_id)
            .await
        {
            Ok(()) => log.add(format!(
                "cleanup sweep returned {} stuck issue(s) to detected",
                stuck_ids.len()
            )),
            Err(err) => {
                log.warn(format!("cleanup sweep failed: {err}"));
                errors.push(err.to_string());
            }
        }
    }

    /// Activity logging is best-effort; an audit sink failure must not fail
    /// the run it is auditing.
    async fn record_activity(
        &self,
        user_id: Uuid,
        website_id: Uuid,
        kind: ActivityKind,
        description: &str,
        metadata: serde_json::Value,
        log: &mut RunLog,
    ) {
        if let Err(err) = self
            .activity
            .record(user_id, website_id, kind, description, metadata)
            .await
        {
            log.warn(format!("activity log write failed: {err}"));
        }
    }
}

fn is_automated(issue: &TrackedIssue) -> bool {
    issue
        .fix_method
        .as_deref()
        .map_or(true, |m| m.eq_ignore_ascii_case("automated"))
}

/// Group issues by type, preserving the prioritized order of first
/// appearance.
fn group_by_type(issues: &[TrackedIssue]) -> Vec<(IssueType, Vec<&TrackedIssue>)> {
    let mut groups: Vec<(IssueType, Vec<&TrackedIssue>)> = Vec::new();
    for issue in issues {
        match groups.iter_mut().find(|(t, _)| *t == issue.issue_type) {
            Some((_, members)) => members.push(issue),
            None => groups.push((issue.issue_type, vec![issue])),
        }
    }
    groups
}

/// The claimed issues as the reconciler sees them: status already `fixing`.
fn automated_as_fixing(issues: &[TrackedIssue]) -> Vec<TrackedIssue> {
    issues
        .iter()
        .cloned()
        .map(|mut issue| {
            issue.status = IssueStatus::Fixing;
            issue
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::IssueSeverity;

    fn issue(issue_type: IssueType, severity: IssueSeverity) -> TrackedIssue {
        let now = Utc::now();
        TrackedIssue {
            id: Uuid::new_v4(),
            website_id: Uuid::new_v4(),
            issue_type,
            title: issue_type.as_str().to_string(),
            description: String::new(),
            severity,
            status: IssueStatus::Detected,
            current_value: None,
            recommended_value: None,
            element_path: None,
            auto_fix_available: true,
            fix_method: Some("automated".to_string()),
            fix_session_id: None,
            last_seen_at: now,
            fixed_at: None,
            resolution_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn grouping_preserves_priority_order() {
        let issues = vec![
            issue(IssueType::MissingMetaDescription, IssueSeverity::Critical),
            issue(IssueType::MissingAltText, IssueSeverity::Info),
            issue(IssueType::MissingMetaDescription, IssueSeverity::Warning),
        ];
        let groups = group_by_type(&issues);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, IssueType::MissingMetaDescription);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, IssueType::MissingAltText);
    }

    #[test]
    fn missing_fix_method_counts_as_automated() {
        let mut candidate = issue(IssueType::MissingAltText, IssueSeverity::Info);
        candidate.fix_method = None;
        assert!(is_automated(&candidate));
        candidate.fix_method = Some("manual".to_string());
        assert!(!is_automated(&candidate));
    }
}
