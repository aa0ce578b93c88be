//! Reconciliation of ephemeral fixes onto persisted issues.
//!
//! Matching runs in two passes: exact `tracked_issue_id` correlation first,
//! then a heuristic pass for leftover fixes against still-`fixing` issues.
//! A claimed set guarantees each issue is claimed by at most one fix, so the
//! mapping stays one-to-one. Issues left unmatched fall to the cleanup
//! sweep, which returns them to `detected`.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::models::{Fix, IssueStatus, TrackedIssue};

/// One planned status transition for a persisted issue.
#[derive(Debug, Clone)]
pub struct IssueTransition {
    pub issue_id: Uuid,
    pub to: IssueStatus,
    pub notes: String,
    pub fixed_at: Option<DateTime<Utc>>,
}

/// The full reconciliation plan for one run.
#[derive(Debug, Clone, Default)]
pub struct ReconcilePlan {
    pub transitions: Vec<IssueTransition>,
    /// Issues still `fixing` that no fix claimed; the cleanup sweep resets
    /// these to `detected`.
    pub unmatched_issue_ids: Vec<Uuid>,
}

/// Build the reconciliation plan mapping fixes onto the issues this session
/// marked `fixing`. Pure; the engine applies the plan through the store.
pub fn match_fixes_to_issues(fixes: &[Fix], fixing_issues: &[TrackedIssue]) -> ReconcilePlan {
    let mut claimed: HashSet<Uuid> = HashSet::new();
    let mut plan = ReconcilePlan::default();
    let now = Utc::now();

    // Pass 1: exact correlation via tracked_issue_id.
    for fix in fixes {
        let Some(issue_id) = fix.tracked_issue_id else {
            continue;
        };
        if !fixing_issues.iter().any(|i| i.id == issue_id) || claimed.contains(&issue_id) {
            continue;
        }
        claimed.insert(issue_id);
        plan.transitions.push(transition_for(fix, issue_id, now));
    }

    // Pass 2: heuristic claim for fixes the strategies could not correlate.
    for fix in fixes.iter().filter(|f| f.tracked_issue_id.is_none()) {
        let candidate = fixing_issues.iter().find(|issue| {
            !claimed.contains(&issue.id)
                && (issue.issue_type == fix.fix_type
                    || issue
                        .title
                        .to_lowercase()
                        .contains(&humanize(fix.fix_type.as_str())))
        });
        if let Some(issue) = candidate {
            claimed.insert(issue.id);
            plan.transitions.push(transition_for(fix, issue.id, now));
        }
    }

    plan.unmatched_issue_ids = fixing_issues
        .iter()
        .filter(|i| !claimed.contains(&i.id))
        .map(|i| i.id)
        .collect();

    plan
}

fn transition_for(fix: &Fix, issue_id: Uuid, now: DateTime<Utc>) -> IssueTransition {
    if fix.success {
        IssueTransition {
            issue_id,
            to: IssueStatus::Fixed,
            notes: fix.description.clone(),
            fixed_at: Some(now),
        }
    } else {
        IssueTransition {
            issue_id,
            to: IssueStatus::Detected,
            notes: fix
                .error
                .clone()
                .unwrap_or_else(|| "fix did not complete".to_string()),
            fixed_at: None,
        }
    }
}

fn humanize(issue_type: &str) -> String {
    issue_type.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{FixImpact, IssueSeverity, IssueType};

    fn issue(issue_type: IssueType, title: &str) -> TrackedIssue {
        let now = Utc::now();
        TrackedIssue {
            id: Uuid::new_v4(),
            website_id: Uuid::new_v4(),
            issue_type,
            title: title.to_string(),
            description: String::new(),
            severity: IssueSeverity::Warning,
            status: IssueStatus::Fixing,
            current_value: None,
            recommended_value: None,
            element_path: None,
            auto_fix_available: true,
            fix_method: Some("automated".to_string()),
            fix_session_id: Some(Uuid::new_v4()),
            last_seen_at: now,
            fixed_at: None,
            resolution_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn fix(issue_type: IssueType, tracked: Option<Uuid>, success: bool) -> Fix {
        Fix {
            fix_type: issue_type,
            description: "did the thing".to_string(),
            element: String::new(),
            before: None,
            after: None,
            success,
            impact: FixImpact::Medium,
            error: if success { None } else { Some("boom".to_string()) },
            content_id: None,
            element_path: None,
            tracked_issue_id: tracked,
        }
    }

    #[test]
    fn exact_correlation_wins_first_pass() {
        let issue = issue(IssueType::MissingAltText, "Images missing alt text");
        let fixes = vec![fix(IssueType::MissingAltText, Some(issue.id), true)];
        let plan = match_fixes_to_issues(&fixes, &[issue.clone()]);
        assert_eq!(plan.transitions.len(), 1);
        assert_eq!(plan.transitions[0].issue_id, issue.id);
        assert_eq!(plan.transitions[0].to, IssueStatus::Fixed);
        assert!(plan.transitions[0].fixed_at.is_some());
        assert!(plan.unmatched_issue_ids.is_empty());
    }

    #[test]
    fn failed_fix_returns_issue_to_detected() {
        let issue = issue(IssueType::PoorTitleTag, "Title too short");
        let fixes = vec![fix(IssueType::PoorTitleTag, Some(issue.id), false)];
        let plan = match_fixes_to_issues(&fixes, &[issue]);
        assert_eq!(plan.transitions[0].to, IssueStatus::Detected);
        assert!(plan.transitions[0].fixed_at.is_none());
        assert_eq!(plan.transitions[0].notes, "boom");
    }

    #[test]
    fn heuristic_pass_matches_by_type() {
        let issue = issue(IssueType::MissingH1, "Page is missing an H1");
        let fixes = vec![fix(IssueType::MissingH1, None, true)];
        let plan = match_fixes_to_issues(&fixes, &[issue.clone()]);
        assert_eq!(plan.transitions.len(), 1);
        assert_eq!(plan.transitions[0].issue_id, issue.id);
    }

    #[test]
    fn heuristic_pass_matches_by_title_containment() {
        let mut target = issue(IssueType::LowContentQuality, "Found missing alt text on images");
        // Type differs; only the title mentions the fix's type.
        target.issue_type = IssueType::LowContentQuality;
        let fixes = vec![fix(IssueType::MissingAltText, None, true)];
        let plan = match_fixes_to_issues(&fixes, &[target.clone()]);
        assert_eq!(plan.transitions.len(), 1);
        assert_eq!(plan.transitions[0].issue_id, target.id);
    }

    #[test]
    fn claimed_set_keeps_mapping_one_to_one() {
        let first = issue(IssueType::MissingAltText, "alt A");
        let second = issue(IssueType::MissingAltText, "alt B");
        let fixes = vec![
            fix(IssueType::MissingAltText, None, true),
            fix(IssueType::MissingAltText, None, true),
        ];
        let plan = match_fixes_to_issues(&fixes, &[first.clone(), second.clone()]);
        assert_eq!(plan.transitions.len(), 2);
        let claimed: HashSet<Uuid> = plan.transitions.iter().map(|t| t.issue_id).collect();
        assert_eq!(claimed.len(), 2, "each fix claimed a distinct issue");
        assert!(plan.unmatched_issue_ids.is_empty());
    }

    #[test]
    fn unmatched_issues_fall_to_cleanup() {
        let orphan = issue(IssueType::KeywordOptimization, "keywords");
        let plan = match_fixes_to_issues(&[], &[orphan.clone()]);
        assert!(plan.transitions.is_empty());
        assert_eq!(plan.unmatched_issue_ids, vec![orphan.id]);
    }

    #[test]
    fn duplicate_exact_ids_claim_once() {
        let target = issue(IssueType::MissingAltText, "alt");
        let fixes = vec![
            fix(IssueType::MissingAltText, Some(target.id), true),
            fix(IssueType::MissingAltText, Some(target.id), false),
        ];
        let plan = match_fixes_to_issues(&fixes, &[target]);
        assert_eq!(plan.transitions.len(), 1);
        assert_eq!(plan.transitions[0].to, IssueStatus::Fixed);
    }
}
