//! In-memory fakes shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use sitemender::domain::models::{
    ContentCollection, ContentItem, ContentUpdate, IssueSeverity, IssueStatus, IssueType,
    TrackedIssue, WebsiteCredentials,
};
use sitemender::domain::ports::{
    ActivityKind, ActivityLog, ContentSource, ContentSourceError, GenerationError,
    GenerationRequest, IssueQuery, IssueStore, StatusUpdate, StoreError, TextGenerator,
    WebsiteStore,
};

pub fn credentials() -> WebsiteCredentials {
    WebsiteCredentials {
        base_url: "https://example.com".to_string(),
        username: "admin".to_string(),
        app_password: "secret".to_string(),
    }
}

pub fn tracked_issue(website_id: Uuid, issue_type: IssueType) -> TrackedIssue {
    let now = Utc::now();
    TrackedIssue {
        id: Uuid::new_v4(),
        website_id,
        issue_type,
        title: format!("{} detected", issue_type.as_str()),
        description: String::new(),
        severity: IssueSeverity::Warning,
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

pub fn post(id: u64, content: &str) -> ContentItem {
    ContentItem {
        id,
        title: format!("Post {id}"),
        content: content.to_string(),
        excerpt: String::new(),
        link: None,
        collection: ContentCollection::Posts,
    }
}

// ---------------------------------------------------------------------------

pub struct InMemoryIssueStore {
    pub issues: Mutex<Vec<TrackedIssue>>,
}

impl InMemoryIssueStore {
    pub fn new(issues: Vec<TrackedIssue>) -> Self {
        Self {
            issues: Mutex::new(issues),
        }
    }

    pub fn status_of(&self, issue_id: Uuid) -> Option<IssueStatus> {
        self.issues
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == issue_id)
            .map(|i| i.status)
    }

    pub fn get(&self, issue_id: Uuid) -> Option<TrackedIssue> {
        self.issues
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == issue_id)
            .cloned()
    }
}

#[async_trait]
impl IssueStore for InMemoryIssueStore {
    async fn get_tracked_issues(
        &self,
        website_id: Uuid,
        _user_id: Uuid,
        query: IssueQuery,
    ) -> Result<Vec<TrackedIssue>, StoreError> {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(query.fixed_within_days));
        let issues = self.issues.lock().unwrap();
        Ok(issues
            .iter()
            .filter(|i| i.website_id == website_id)
            .filter(|i| query.statuses.is_empty() || query.statuses.contains(&i.status))
            .filter(|i| !query.auto_fixable_only || i.auto_fix_available)
            .filter(|i| {
                !query.exclude_recently_fixed || i.fixed_at.map_or(true, |t| t < cutoff)
            })
            .cloned()
            .collect())
    }

    async fn update_issue_status(
        &self,
        issue_id: Uuid,
        status: IssueStatus,
        update: StatusUpdate,
    ) -> Result<(), StoreError> {
        let mut issues = self.issues.lock().unwrap();
        let issue = issues
            .iter_mut()
            .find(|i| i.id == issue_id)
            .ok_or(StoreError::IssueNotFound(issue_id))?;
        if issue.status != status && !issue.status.can_transition_to(status) {
            return Err(StoreError::InvalidTransition {
                from: issue.status.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }
        issue.status = status;
        if update.fix_method.is_some() {
            issue.fix_method = update.fix_method;
        }
        if update.fix_session_id.is_some() {
            issue.fix_session_id = update.fix_session_id;
        }
        if update.resolution_notes.is_some() {
            issue.resolution_notes = update.resolution_notes;
        }
        if update.fixed_at.is_some() {
            issue.fixed_at = update.fixed_at;
        }
        issue.updated_at = Utc::now();
        Ok(())
    }

    async fn bulk_update_statuses(
        &self,
        issue_ids: &[Uuid],
        status: IssueStatus,
        fix_session_id: Uuid,
    ) -> Result<(), StoreError> {
        let mut issues = self.issues.lock().unwrap();
        for issue in issues.iter_mut().filter(|i| issue_ids.contains(&i.id)) {
            issue.status = status;
            issue.fix_session_id = Some(fix_session_id);
            issue.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn reset_stale_fixing(&self, website_id: Uuid) -> Result<Vec<TrackedIssue>, StoreError> {
        let mut issues = self.issues.lock().unwrap();
        let mut reset = Vec::new();
        for issue in issues
            .iter_mut()
            .filter(|i| i.website_id == website_id && i.status == IssueStatus::Fixing)
        {
            reset.push(issue.clone());
            issue.status = IssueStatus::Detected;
        }
        Ok(reset)
    }
}

// ---------------------------------------------------------------------------

/// Issue store whose single-issue status writes always fail while bulk
/// operations keep working, simulating a partially degraded store.
pub struct BrokenTransitionIssueStore {
    pub inner: InMemoryIssueStore,
}

impl BrokenTransitionIssueStore {
    pub fn new(issues: Vec<TrackedIssue>) -> Self {
        Self {
            inner: InMemoryIssueStore::new(issues),
        }
    }
}

#[async_trait]
impl IssueStore for BrokenTransitionIssueStore {
    async fn get_tracked_issues(
        &self,
        website_id: Uuid,
        user_id: Uuid,
        query: IssueQuery,
    ) -> Result<Vec<TrackedIssue>, StoreError> {
        self.inner.get_tracked_issues(website_id, user_id, query).await
    }

    async fn update_issue_status(
        &self,
        _issue_id: Uuid,
        _status: IssueStatus,
        _update: StatusUpdate,
    ) -> Result<(), StoreError> {
        Err(StoreError::CorruptRow("transient write failure".to_string()))
    }

    async fn bulk_update_statuses(
        &self,
        issue_ids: &[Uuid],
        status: IssueStatus,
        fix_session_id: Uuid,
    ) -> Result<(), StoreError> {
        self.inner
            .bulk_update_statuses(issue_ids, status, fix_session_id)
            .await
    }

    async fn reset_stale_fixing(&self, website_id: Uuid) -> Result<Vec<TrackedIssue>, StoreError> {
        self.inner.reset_stale_fixing(website_id).await
    }
}

// ---------------------------------------------------------------------------

pub struct FakeWebsiteStore {
    pub website_id: Uuid,
    pub owner: Uuid,
    pub score: Mutex<Option<f64>>,
    pub score_updates: Mutex<Vec<(f64, DateTime<Utc>)>>,
}

impl FakeWebsiteStore {
    pub fn new(website_id: Uuid, owner: Uuid) -> Self {
        Self {
            website_id,
            owner,
            score: Mutex::new(Some(70.0)),
            score_updates: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WebsiteStore for FakeWebsiteStore {
    async fn website_owner(&self, website_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        if website_id == self.website_id {
            Ok(Some(self.owner))
        } else {
            Ok(None)
        }
    }

    async fn credentials(&self, website_id: Uuid) -> Result<WebsiteCredentials, StoreError> {
        if website_id == self.website_id {
            Ok(credentials())
        } else {
            Err(StoreError::WebsiteNotFound(website_id))
        }
    }

    async fn current_score(&self, _website_id: Uuid) -> Result<Option<f64>, StoreError> {
        Ok(*self.score.lock().unwrap())
    }

    async fn update_score(
        &self,
        _website_id: Uuid,
        score: f64,
        last_analyzed: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        *self.score.lock().unwrap() = Some(score);
        self.score_updates
            .lock()
            .unwrap()
            .push((score, last_analyzed));
        Ok(())
    }
}

// ---------------------------------------------------------------------------

/// What the fake content source does when an update arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateBehavior {
    /// Apply the update to the stored item.
    Apply,
    /// Pretend the item vanished.
    NotFound,
    /// Reject with a 500-style error.
    Reject,
}

pub struct FakeContentSource {
    pub items: Mutex<HashMap<ContentCollection, Vec<ContentItem>>>,
    pub updates: Mutex<Vec<(ContentCollection, u64, ContentUpdate)>>,
    pub update_behavior: UpdateBehavior,
    pub connection_ok: bool,
}

impl FakeContentSource {
    pub fn with_posts(posts: Vec<ContentItem>) -> Self {
        let mut items = HashMap::new();
        items.insert(ContentCollection::Posts, posts);
        items.insert(ContentCollection::Pages, Vec::new());
        Self {
            items: Mutex::new(items),
            updates: Mutex::new(Vec::new()),
            update_behavior: UpdateBehavior::Apply,
            connection_ok: true,
        }
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl ContentSource for FakeContentSource {
    async fn fetch_recent(
        &self,
        _credentials: &WebsiteCredentials,
        collection: ContentCollection,
        limit: usize,
    ) -> Result<Vec<ContentItem>, ContentSourceError> {
        let items = self.items.lock().unwrap();
        let mut fetched = items.get(&collection).cloned().unwrap_or_default();
        fetched.truncate(limit);
        Ok(fetched)
    }

    async fn update_item(
        &self,
        _credentials: &WebsiteCredentials,
        collection: ContentCollection,
        id: u64,
        update: ContentUpdate,
    ) -> Result<(), ContentSourceError> {
        match self.update_behavior {
            UpdateBehavior::NotFound => Err(ContentSourceError::NotFound {
                collection: collection.as_str().to_string(),
                id,
            }),
            UpdateBehavior::Reject => Err(ContentSourceError::UpdateRejected {
                status: 500,
                body: "simulated rejection".to_string(),
            }),
            UpdateBehavior::Apply => {
                let mut items = self.items.lock().unwrap();
                if let Some(item) = items
                    .get_mut(&collection)
                    .and_then(|list| list.iter_mut().find(|i| i.id == id))
                {
                    if let Some(title) = &update.title {
                        item.title = title.clone();
                    }
                    if let Some(content) = &update.content {
                        item.content = content.clone();
                    }
                    if let Some(excerpt) = &update.excerpt {
                        item.excerpt = excerpt.clone();
                    }
                }
                self.updates.lock().unwrap().push((collection, id, update));
                Ok(())
            }
        }
    }

    async fn check_connection(
        &self,
        _credentials: &WebsiteCredentials,
    ) -> Result<(), ContentSourceError> {
        if self.connection_ok {
            Ok(())
        } else {
            Err(ContentSourceError::ConnectionFailed(
                "simulated outage".to_string(),
            ))
        }
    }
}

// ---------------------------------------------------------------------------

pub struct FakeGenerator {
    pub response: String,
    pub calls: Mutex<usize>,
}

impl FakeGenerator {
    pub fn canned(response: &str) -> Self {
        Self {
            response: response.to_string(),
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.response.clone())
    }

    fn is_available(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------

pub struct RecordingActivityLog {
    pub entries: Mutex<Vec<(ActivityKind, String, serde_json::Value)>>,
}

impl RecordingActivityLog {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn kinds(&self) -> Vec<ActivityKind> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(kind, _, _)| *kind)
            .collect()
    }
}

#[async_trait]
impl ActivityLog for RecordingActivityLog {
    async fn record(
        &self,
        _user_id: Uuid,
        _website_id: Uuid,
        kind: ActivityKind,
        description: &str,
        metadata: serde_json::Value,
    ) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .push((kind, description.to_string(), metadata));
        Ok(())
    }
}
