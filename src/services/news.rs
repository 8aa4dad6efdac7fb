//! News posts.
//!
//! Public readers see published posts ordered pinned-first, then by publish
//! date (unpublished-date rows first), then newest. Only the author or the
//! master admin may edit or delete a post.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::services::admin::AdminProfile;
use crate::services::{ContentError, NO_PERMISSION, activity, require_text};

const NOT_FOUND: &str = "News nicht gefunden";
const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl NewsPriority {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsColor {
    #[default]
    Blue,
    Gold,
    Green,
    Red,
    Purple,
    Slate,
}

impl NewsColor {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Gold => "gold",
            Self::Green => "green",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::Slate => "slate",
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub priority: String,
    pub color: String,
    pub is_published: bool,
    pub is_pinned: bool,
    pub views: i64,
    pub author_id: Option<i64>,
    pub author_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsInput {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub priority: NewsPriority,
    #[serde(default)]
    pub color: NewsColor,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_pinned: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub priority: Option<NewsPriority>,
    pub color: Option<NewsColor>,
    pub is_published: Option<bool>,
    pub is_pinned: Option<bool>,
}

const NEWS_SELECT: &str = r"
    SELECT n.id, n.title, n.content, n.excerpt, n.priority, n.color, n.is_published, n.is_pinned,
           n.views, n.author_id, COALESCE(a.display_name, 'Unbekannt') AS author_name,
           n.created_at, n.updated_at, n.published_at
    FROM news n
    LEFT JOIN admins a ON a.id = n.author_id";

/// Excerpt used when none is given: the content itself, or its first 200
/// characters followed by `...` when longer.
#[must_use]
pub fn derive_excerpt(content: &str) -> String {
    if content.chars().count() > EXCERPT_CHARS {
        let head: String = content.chars().take(EXCERPT_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_owned()
    }
}

// =============================================================================
// QUERIES
// =============================================================================

pub async fn list_news(pool: &PgPool, published_only: bool) -> Result<Vec<NewsItem>, ContentError> {
    let sql = format!(
        "{NEWS_SELECT}
         WHERE ($1 = FALSE OR n.is_published)
         ORDER BY n.is_pinned DESC, n.published_at DESC NULLS FIRST, n.created_at DESC"
    );
    Ok(sqlx::query_as::<_, NewsItem>(&sql)
        .bind(published_only)
        .fetch_all(pool)
        .await?)
}

/// Every post including drafts, newest first.
pub async fn list_all(pool: &PgPool) -> Result<Vec<NewsItem>, ContentError> {
    let sql = format!("{NEWS_SELECT} ORDER BY n.created_at DESC");
    Ok(sqlx::query_as::<_, NewsItem>(&sql).fetch_all(pool).await?)
}

/// Fetch one post and count the view.
pub async fn view_news(pool: &PgPool, news_id: i64) -> Result<NewsItem, ContentError> {
    let bumped: Option<i64> = sqlx::query_scalar("UPDATE news SET views = views + 1 WHERE id = $1 RETURNING id")
        .bind(news_id)
        .fetch_optional(pool)
        .await?;
    if bumped.is_none() {
        return Err(ContentError::NotFound(NOT_FOUND));
    }
    fetch(pool, news_id).await
}

async fn fetch(pool: &PgPool, news_id: i64) -> Result<NewsItem, ContentError> {
    let sql = format!("{NEWS_SELECT} WHERE n.id = $1");
    sqlx::query_as::<_, NewsItem>(&sql)
        .bind(news_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ContentError::NotFound(NOT_FOUND))
}

async fn ensure_can_edit(pool: &PgPool, actor: &AdminProfile, news_id: i64) -> Result<String, ContentError> {
    let row: Option<(Option<i64>, String)> = sqlx::query_as("SELECT author_id, title FROM news WHERE id = $1")
        .bind(news_id)
        .fetch_optional(pool)
        .await?;
    let (author_id, title) = row.ok_or(ContentError::NotFound(NOT_FOUND))?;
    if author_id != Some(actor.id) && !actor.is_master_role() {
        return Err(ContentError::Forbidden(NO_PERMISSION));
    }
    Ok(title)
}

// =============================================================================
// MUTATIONS
// =============================================================================

pub async fn create_news(pool: &PgPool, actor: &AdminProfile, input: NewsInput) -> Result<NewsItem, ContentError> {
    require_text(&input.title, "Titel")?;
    require_text(&input.content, "Inhalt")?;

    let excerpt = input
        .excerpt
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| derive_excerpt(&input.content));

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO news (title, content, excerpt, priority, color, is_published, is_pinned, author_id, published_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, CASE WHEN $6 THEN now() END)
         RETURNING id",
    )
    .bind(input.title.trim())
    .bind(&input.content)
    .bind(excerpt)
    .bind(input.priority.as_str())
    .bind(input.color.as_str())
    .bind(input.is_published)
    .bind(input.is_pinned)
    .bind(actor.id)
    .fetch_one(pool)
    .await?;

    let item = fetch(pool, id).await?;
    activity::record(
        pool,
        Some(actor.id),
        "NEWS_CREATE",
        &format!("News '{}' erstellt", item.title),
        Some(("news", id)),
    )
    .await;
    Ok(item)
}

pub async fn update_news(
    pool: &PgPool,
    actor: &AdminProfile,
    news_id: i64,
    patch: NewsPatch,
) -> Result<NewsItem, ContentError> {
    ensure_can_edit(pool, actor, news_id).await?;
    if let Some(title) = patch.title.as_deref() {
        require_text(title, "Titel")?;
    }
    if let Some(content) = patch.content.as_deref() {
        require_text(content, "Inhalt")?;
    }

    sqlx::query(
        "UPDATE news SET
             title = COALESCE($2, title),
             content = COALESCE($3, content),
             excerpt = COALESCE($4, excerpt),
             priority = COALESCE($5, priority),
             color = COALESCE($6, color),
             is_published = COALESCE($7, is_published),
             published_at = CASE WHEN $7 = TRUE AND published_at IS NULL THEN now() ELSE published_at END,
             is_pinned = COALESCE($8, is_pinned),
             updated_at = now()
         WHERE id = $1",
    )
    .bind(news_id)
    .bind(patch.title.as_deref().map(str::trim))
    .bind(patch.content)
    .bind(patch.excerpt)
    .bind(patch.priority.map(NewsPriority::as_str))
    .bind(patch.color.map(NewsColor::as_str))
    .bind(patch.is_published)
    .bind(patch.is_pinned)
    .execute(pool)
    .await?;

    let item = fetch(pool, news_id).await?;
    activity::record(
        pool,
        Some(actor.id),
        "NEWS_UPDATE",
        &format!("News '{}' aktualisiert", item.title),
        Some(("news", news_id)),
    )
    .await;
    Ok(item)
}

pub async fn delete_news(pool: &PgPool, actor: &AdminProfile, news_id: i64) -> Result<(), ContentError> {
    let title = ensure_can_edit(pool, actor, news_id).await?;
    sqlx::query("DELETE FROM news WHERE id = $1")
        .bind(news_id)
        .execute(pool)
        .await?;
    activity::record(pool, Some(actor.id), "NEWS_DELETE", &format!("News '{title}' gelöscht"), None).await;
    Ok(())
}

#[cfg(test)]
#[path = "news_test.rs"]
mod tests;
