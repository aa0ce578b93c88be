//! SQLite implementation of the IssueStore.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::models::{IssueSeverity, IssueStatus, IssueType, TrackedIssue};
use crate::domain::ports::{IssueQuery, IssueStore, StatusUpdate, StoreError};

#[derive(Clone)]
pub struct SqliteIssueStore {
    pool: SqlitePool,
}

impl SqliteIssueStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IssueStore for SqliteIssueStore {
    async fn get_tracked_issues(
        &self,
        website_id: Uuid,
        user_id: Uuid,
        query: IssueQuery,
    ) -> Result<Vec<TrackedIssue>, StoreError> {
        let mut sql = String::from(
            r#"SELECT i.* FROM seo_issues i
               INNER JOIN websites w ON w.id = i.website_id
               WHERE i.website_id = ? AND w.user_id = ?"#,
        );
        let mut bindings: Vec<String> = Vec::new();

        if !query.statuses.is_empty() {
            let placeholders = vec!["?"; query.statuses.len()].join(", ");
            sql.push_str(&format!(" AND i.status IN ({placeholders})"));
            for status in &query.statuses {
                bindings.push(status.as_str().to_string());
            }
        }
        if query.auto_fixable_only {
            sql.push_str(" AND i.auto_fix_available = 1");
        }
        if query.exclude_recently_fixed {
            // Issues fixed inside the cool-down window stay untouched, even
            // after the detection pass reopens them.
            sql.push_str(" AND (i.fixed_at IS NULL OR i.fixed_at < ?)");
            let cutoff = Utc::now() - chrono::Duration::days(i64::from(query.fixed_within_days));
            bindings.push(cutoff.to_rfc3339());
        }

        sql.push_str(" ORDER BY i.created_at");

        let mut q = sqlx::query_as::<_, IssueRow>(&sql)
            .bind(website_id.to_string())
            .bind(user_id.to_string());
        for binding in &bindings {
            q = q.bind(binding);
        }

        let rows: Vec<IssueRow> = q.fetch_all(&self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update_issue_status(
        &self,
        issue_id: Uuid,
        status: IssueStatus,
        update: StatusUpdate,
    ) -> Result<(), StoreError> {
        let current: Option<(String,)> =
            sqlx::query_as("SELECT status FROM seo_issues WHERE id = ?")
                .bind(issue_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        let Some((current,)) = current else {
            return Err(StoreError::IssueNotFound(issue_id));
        };

        let from = IssueStatus::parse_str(&current)
            .ok_or_else(|| StoreError::CorruptRow(format!("unknown status '{current}'")))?;
        if from != status && !from.can_transition_to(status) {
            return Err(StoreError::InvalidTransition {
                from: from.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }

        let result = sqlx::query(
            r#"UPDATE seo_issues SET status = ?,
               fix_method = COALESCE(?, fix_method),
               fix_session_id = COALESCE(?, fix_session_id),
               resolution_notes = COALESCE(?, resolution_notes),
               fixed_at = COALESCE(?, fixed_at),
               updated_at = ?
               WHERE id = ?"#,
        )
        .bind(status.as_str())
        .bind(update.fix_method)
        .bind(update.fix_session_id.map(|id| id.to_string()))
        .bind(update.resolution_notes)
        .bind(update.fixed_at.map(|t| t.to_rfc3339()))
        .bind(Utc::now().to_rfc3339())
        .bind(issue_id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::IssueNotFound(issue_id));
        }
        Ok(())
    }

    async fn bulk_update_statuses(
        &self,
        issue_ids: &[Uuid],
        status: IssueStatus,
        fix_session_id: Uuid,
    ) -> Result<(), StoreError> {
        if issue_ids.is_empty() {
            return Ok(());
        }

        let placeholders = vec!["?"; issue_ids.len()].join(", ");
        let sql = format!(
            "UPDATE seo_issues SET status = ?, fix_session_id = ?, updated_at = ?
             WHERE id IN ({placeholders})"
        );

        let mut q = sqlx::query(&sql)
            .bind(status.as_str())
            .bind(fix_session_id.to_string())
            .bind(Utc::now().to_rfc3339());
        for id in issue_ids {
            q = q.bind(id.to_string());
        }
        q.execute(&self.pool).await?;
        Ok(())
    }

    async fn reset_stale_fixing(&self, website_id: Uuid) -> Result<Vec<TrackedIssue>, StoreError> {
        let rows: Vec<IssueRow> =
            sqlx::query_as("SELECT * FROM seo_issues WHERE website_id = ? AND status = 'fixing'")
                .bind(website_id.to_string())
                .fetch_all(&self.pool)
                .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query(
            "UPDATE seo_issues SET status = 'detected', updated_at = ?
             WHERE website_id = ? AND status = 'fixing'",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(website_id.to_string())
        .execute(&self.pool)
        .await?;

        // Returned rows keep their pre-reset timestamps so the caller can
        // judge how recently the stuck session was active.
        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct IssueRow {
    id: String,
    website_id: String,
    issue_type: String,
    title: String,
    description: String,
    severity: String,
    status: String,
    current_value: Option<String>,
    recommended_value: Option<String>,
    element_path: Option<String>,
    auto_fix_available: bool,
    fix_method: Option<String>,
    fix_session_id: Option<String>,
    last_seen_at: String,
    fixed_at: Option<String>,
    resolution_notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<IssueRow> for TrackedIssue {
    type Error = StoreError;

    fn try_from(row: IssueRow) -> Result<Self, Self::Error> {
        let issue_type = IssueType::parse_str(&row.issue_type)
            .ok_or_else(|| StoreError::CorruptRow(format!("unknown issue type '{}'", row.issue_type)))?;
        let severity = IssueSeverity::parse_str(&row.severity)
            .ok_or_else(|| StoreError::CorruptRow(format!("unknown severity '{}'", row.severity)))?;
        let status = IssueStatus::parse_str(&row.status)
            .ok_or_else(|| StoreError::CorruptRow(format!("unknown status '{}'", row.status)))?;

        Ok(TrackedIssue {
            id: Uuid::parse_str(&row.id)?,
            website_id: Uuid::parse_str(&row.website_id)?,
            issue_type,
            title: row.title,
            description: row.description,
            severity,
            status,
            current_value: row.current_value,
            recommended_value: row.recommended_value,
            element_path: row.element_path,
            auto_fix_available: row.auto_fix_available,
            fix_method: row.fix_method,
            fix_session_id: row
                .fix_session_id
                .as_deref()
                .map(Uuid::parse_str)
                .transpose()?,
            last_seen_at: parse_timestamp(&row.last_seen_at)?,
            fixed_at: row.fixed_at.as_deref().map(parse_timestamp).transpose()?,
            resolution_notes: row.resolution_notes,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<chrono::DateTime<Utc>, StoreError> {
    Ok(chrono::DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}
