//! Admin activity log.
//!
//! Writes are best-effort: a failed audit insert is logged and never fails
//! the request that triggered it.

use serde::Serialize;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;

const SYSTEM_NAME: &str = "System";
pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 500;

#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub id: i64,
    pub action: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<i64>,
    pub admin_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Append an activity entry. `target` is `(target_type, target_id)`.
pub async fn record(pool: &PgPool, admin_id: Option<i64>, action: &str, description: &str, target: Option<(&str, i64)>) {
    let result = sqlx::query(
        "INSERT INTO activity_logs (admin_id, action, description, target_type, target_id)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(admin_id)
    .bind(action)
    .bind(description)
    .bind(target.map(|(kind, _)| kind))
    .bind(target.map(|(_, id)| id))
    .execute(pool)
    .await;

    if let Err(e) = result {
        tracing::warn!(error = %e, action, "failed to record activity");
    }
}

/// Most recent entries first. The limit is clamped to `1..=MAX_LIMIT`.
pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<ActivityEntry>, sqlx::Error> {
    let rows = sqlx::query(
        r"SELECT l.id, l.action, l.description, l.target_type, l.target_id, l.created_at,
                 a.display_name AS admin_name
          FROM activity_logs l
          LEFT JOIN admins a ON a.id = l.admin_id
          ORDER BY l.created_at DESC, l.id DESC
          LIMIT $1",
    )
    .bind(clamp_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| ActivityEntry {
            id: r.get("id"),
            action: r.get("action"),
            description: r.get("description"),
            target_type: r.get("target_type"),
            target_id: r.get("target_id"),
            admin_name: r
                .get::<Option<String>, _>("admin_name")
                .unwrap_or_else(|| SYSTEM_NAME.to_owned()),
            created_at: r.get("created_at"),
        })
        .collect())
}

#[must_use]
pub fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_LIMIT)
}

#[cfg(test)]
#[path = "activity_test.rs"]
mod tests;
