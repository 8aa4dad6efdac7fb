//! Dashboard figures for the admin panel.

use serde::Serialize;
use sqlx::PgPool;

use crate::services::activity::{self, ActivityEntry};
use crate::services::admin::AdminProfile;
use crate::services::news::NewsPriority;
use crate::services::{ContentError, NO_PERMISSION};

const RECENT_ACTIVITY: i64 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
    pub urgent: i64,
}

impl PriorityCounts {
    /// Fold `(priority, count)` rows; unknown priorities are ignored.
    #[must_use]
    pub fn from_rows(rows: &[(String, i64)]) -> Self {
        let mut counts = Self::default();
        for (priority, n) in rows {
            let slot = match priority.as_str() {
                p if p == NewsPriority::Low.as_str() => &mut counts.low,
                p if p == NewsPriority::Medium.as_str() => &mut counts.medium,
                p if p == NewsPriority::High.as_str() => &mut counts.high,
                p if p == NewsPriority::Urgent.as_str() => &mut counts.urgent,
                _ => continue,
            };
            *slot += n;
        }
        counts
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_news: i64,
    pub published_news: i64,
    pub draft_news: i64,
    pub total_views: i64,
    pub total_admins: i64,
    pub active_admins: i64,
    pub news_by_priority: PriorityCounts,
    pub recent_activity: Vec<ActivityEntry>,
}

pub async fn dashboard(pool: &PgPool) -> Result<DashboardStats, ContentError> {
    let (total_news, published_news, total_views): (i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_published), COALESCE(SUM(views), 0)::bigint FROM news",
    )
    .fetch_one(pool)
    .await?;

    let (total_admins, active_admins): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COUNT(*) FILTER (WHERE is_active) FROM admins")
            .fetch_one(pool)
            .await?;

    let priority_rows: Vec<(String, i64)> = sqlx::query_as("SELECT priority, COUNT(*) FROM news GROUP BY priority")
        .fetch_all(pool)
        .await?;

    Ok(DashboardStats {
        total_news,
        published_news,
        draft_news: total_news - published_news,
        total_views,
        total_admins,
        active_admins,
        news_by_priority: PriorityCounts::from_rows(&priority_rows),
        recent_activity: activity::recent(pool, RECENT_ACTIVITY).await?,
    })
}

/// Full activity log, restricted to the master and admin roles.
///
/// # Errors
///
/// `Forbidden` for editors.
pub async fn activity_log(pool: &PgPool, actor: &AdminProfile, limit: i64) -> Result<Vec<ActivityEntry>, ContentError> {
    if !actor.can_manage_admins() {
        return Err(ContentError::Forbidden(NO_PERMISSION));
    }
    Ok(activity::recent(pool, limit).await?)
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;
