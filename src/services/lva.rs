//! Courses ("LVAs") and their aggregated anonymous ratings.
//!
//! Ratings are aggregated in SQL (count and averages); banding into the
//! German text/colour labels happens here so it can be tested without a
//! database.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::services::admin::AdminProfile;
use crate::services::catalogue::LVA_NAMES;
use crate::services::{ContentError, activity, clean_optional, nullable, require_text};

const NOT_FOUND: &str = "LVA nicht gefunden";
const DUPLICATE_NAME: &str = "LVA mit diesem Namen existiert bereits";
pub const DEFAULT_TOP_LIMIT: i64 = 10;
const MAX_TOP_LIMIT: i64 = 100;

const BAND_COLORS: [&str; 5] = ["green", "lime", "yellow", "orange", "red"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingCategory {
    Effort,
    Difficulty,
    Total,
}

impl RatingCategory {
    fn texts(self) -> [&'static str; 5] {
        match self {
            Self::Effort => ["Niedrig", "Eher niedrig", "Durchschnittlich", "Eher hoch", "Sehr hoch"],
            Self::Difficulty => [
                "Gut verständlich",
                "Verständlich",
                "Anspruchsvoll",
                "Sehr anspruchsvoll",
                "Extrem anspruchsvoll",
            ],
            Self::Total => ["Sehr unkritisch", "Unkritisch", "Ausgewogen", "Fordernd", "Sehr fordernd"],
        }
    }
}

/// Text and colour label for an average on the 1..=5 scale.
#[must_use]
pub fn band(avg: f64, category: RatingCategory) -> (&'static str, &'static str) {
    let index = if avg < 1.5 {
        0
    } else if avg < 2.5 {
        1
    } else if avg < 3.5 {
        2
    } else if avg < 4.5 {
        3
    } else {
        4
    };
    (category.texts()[index], BAND_COLORS[index])
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub rating_count: i64,
    pub avg_effort: Option<f64>,
    pub avg_difficulty: Option<f64>,
    pub avg_total: Option<f64>,
    pub effort_text: Option<&'static str>,
    pub effort_color: Option<&'static str>,
    pub difficulty_text: Option<&'static str>,
    pub difficulty_color: Option<&'static str>,
    pub total_text: Option<&'static str>,
    pub total_color: Option<&'static str>,
}

impl RatingSummary {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rating_count: 0,
            avg_effort: None,
            avg_difficulty: None,
            avg_total: None,
            effort_text: None,
            effort_color: None,
            difficulty_text: None,
            difficulty_color: None,
            total_text: None,
            total_color: None,
        }
    }

    /// Build from SQL aggregates. Bands use the unrounded averages.
    #[must_use]
    pub fn from_aggregates(count: i64, avg_effort: Option<f64>, avg_difficulty: Option<f64>) -> Self {
        let (Some(effort), Some(difficulty)) = (avg_effort, avg_difficulty) else {
            return Self::empty();
        };
        if count == 0 {
            return Self::empty();
        }
        let total = f64::midpoint(effort, difficulty);
        let (effort_text, effort_color) = band(effort, RatingCategory::Effort);
        let (difficulty_text, difficulty_color) = band(difficulty, RatingCategory::Difficulty);
        let (total_text, total_color) = band(total, RatingCategory::Total);
        Self {
            rating_count: count,
            avg_effort: Some(round2(effort)),
            avg_difficulty: Some(round2(difficulty)),
            avg_total: Some(round2(total)),
            effort_text: Some(effort_text),
            effort_color: Some(effort_color),
            difficulty_text: Some(difficulty_text),
            difficulty_color: Some(difficulty_color),
            total_text: Some(total_text),
            total_color: Some(total_color),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct LvaRow {
    id: i64,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    rating_count: i64,
    avg_effort: Option<f64>,
    avg_difficulty: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Lva {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(flatten)]
    pub ratings: RatingSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminLva {
    #[serde(flatten)]
    pub lva: Lva,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<LvaRow> for AdminLva {
    fn from(row: LvaRow) -> Self {
        Self {
            lva: Lva {
                id: row.id,
                name: row.name,
                description: row.description,
                is_active: row.is_active,
                ratings: RatingSummary::from_aggregates(row.rating_count, row.avg_effort, row.avg_difficulty),
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<LvaRow> for Lva {
    fn from(row: LvaRow) -> Self {
        AdminLva::from(row).lva
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LvaStats {
    pub total: i64,
    pub rated: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub imported: u64,
    pub skipped: u64,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LvaInput {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LvaPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

const LVA_SELECT: &str = r"
    SELECT l.id, l.name, l.description, l.is_active, l.created_at, l.updated_at,
           COUNT(r.id) AS rating_count,
           AVG(r.effort_rating)::float8 AS avg_effort,
           AVG(r.difficulty_rating)::float8 AS avg_difficulty
    FROM lvas l
    LEFT JOIN lva_ratings r ON r.lva_id = l.id";

/// Rated LVAs, best (lowest) total first, more ratings breaking ties.
#[must_use]
pub fn rank_top(lvas: Vec<Lva>, limit: usize) -> Vec<Lva> {
    let mut rated: Vec<Lva> = lvas.into_iter().filter(|l| l.ratings.rating_count > 0).collect();
    rated.sort_by(|a, b| {
        let a_total = a.ratings.avg_total.unwrap_or(f64::MAX);
        let b_total = b.ratings.avg_total.unwrap_or(f64::MAX);
        a_total
            .total_cmp(&b_total)
            .then(b.ratings.rating_count.cmp(&a.ratings.rating_count))
    });
    rated.truncate(limit);
    rated
}

// =============================================================================
// PUBLIC QUERIES
// =============================================================================

/// Active LVAs by name, optionally filtered by a case-insensitive substring.
pub async fn list_active(pool: &PgPool, search: Option<&str>) -> Result<Vec<Lva>, ContentError> {
    let search = search.map(str::trim).filter(|s| !s.is_empty());
    let sql = format!(
        "{LVA_SELECT}
         WHERE l.is_active AND ($1::TEXT IS NULL OR strpos(lower(l.name), lower($1)) > 0)
         GROUP BY l.id
         ORDER BY l.name"
    );
    let rows = sqlx::query_as::<_, LvaRow>(&sql).bind(search).fetch_all(pool).await?;
    Ok(rows.into_iter().map(Lva::from).collect())
}

pub async fn get(pool: &PgPool, lva_id: i64) -> Result<Lva, ContentError> {
    let sql = format!("{LVA_SELECT} WHERE l.id = $1 GROUP BY l.id");
    sqlx::query_as::<_, LvaRow>(&sql)
        .bind(lva_id)
        .fetch_optional(pool)
        .await?
        .map(Lva::from)
        .ok_or(ContentError::NotFound(NOT_FOUND))
}

pub async fn top(pool: &PgPool, limit: i64) -> Result<Vec<Lva>, ContentError> {
    let limit = usize::try_from(limit.clamp(1, MAX_TOP_LIMIT)).unwrap_or(1);
    let lvas = list_active(pool, None).await?;
    Ok(rank_top(lvas, limit))
}

pub async fn stats(pool: &PgPool) -> Result<LvaStats, ContentError> {
    let (total, rated): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*),
                COUNT(*) FILTER (WHERE EXISTS (SELECT 1 FROM lva_ratings r WHERE r.lva_id = l.id))
         FROM lvas l
         WHERE l.is_active",
    )
    .fetch_one(pool)
    .await?;
    Ok(LvaStats { total, rated })
}

// =============================================================================
// ADMIN
// =============================================================================

/// Every LVA including inactive ones.
pub async fn list_all(pool: &PgPool) -> Result<Vec<AdminLva>, ContentError> {
    let sql = format!("{LVA_SELECT} GROUP BY l.id ORDER BY l.name");
    let rows = sqlx::query_as::<_, LvaRow>(&sql).fetch_all(pool).await?;
    Ok(rows.into_iter().map(AdminLva::from).collect())
}

async fn name_taken(pool: &PgPool, name: &str, except: Option<i64>) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM lvas WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2))")
        .bind(name)
        .bind(except)
        .fetch_one(pool)
        .await
}

pub async fn create_lva(pool: &PgPool, actor: &AdminProfile, input: LvaInput) -> Result<i64, ContentError> {
    require_text(&input.name, "Name")?;
    let name = input.name.trim();
    if name_taken(pool, name, None).await? {
        return Err(ContentError::Invalid(DUPLICATE_NAME.into()));
    }

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO lvas (name, description, is_active) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(clean_optional(input.description))
    .bind(input.is_active)
    .fetch_one(pool)
    .await?;

    activity::record(pool, Some(actor.id), "LVA_CREATE", &format!("LVA '{name}' erstellt"), Some(("lva", id))).await;
    Ok(id)
}

pub async fn update_lva(pool: &PgPool, actor: &AdminProfile, lva_id: i64, patch: LvaPatch) -> Result<(), ContentError> {
    if let Some(name) = patch.name.as_deref() {
        require_text(name, "Name")?;
        if name_taken(pool, name.trim(), Some(lva_id)).await? {
            return Err(ContentError::Invalid(DUPLICATE_NAME.into()));
        }
    }

    let name: Option<String> = sqlx::query_scalar(
        "UPDATE lvas SET
             name = COALESCE($2, name),
             description = CASE WHEN $3 THEN $4 ELSE description END,
             is_active = COALESCE($5, is_active),
             updated_at = now()
         WHERE id = $1
         RETURNING name",
    )
    .bind(lva_id)
    .bind(patch.name.as_deref().map(str::trim))
    .bind(patch.description.is_some())
    .bind(patch.description.and_then(clean_optional))
    .bind(patch.is_active)
    .fetch_optional(pool)
    .await?;
    let name = name.ok_or(ContentError::NotFound(NOT_FOUND))?;

    activity::record(
        pool,
        Some(actor.id),
        "LVA_UPDATE",
        &format!("LVA '{name}' aktualisiert"),
        Some(("lva", lva_id)),
    )
    .await;
    Ok(())
}

/// Deletes the LVA with its ratings and pending codes.
pub async fn delete_lva(pool: &PgPool, actor: &AdminProfile, lva_id: i64) -> Result<(), ContentError> {
    let name: Option<String> = sqlx::query_scalar("DELETE FROM lvas WHERE id = $1 RETURNING name")
        .bind(lva_id)
        .fetch_optional(pool)
        .await?;
    let name = name.ok_or(ContentError::NotFound(NOT_FOUND))?;
    activity::record(pool, Some(actor.id), "LVA_DELETE", &format!("LVA '{name}' gelöscht"), None).await;
    Ok(())
}

/// Insert every catalogue LVA that does not exist yet. Returns the number of
/// inserted rows.
pub async fn insert_catalogue(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let names: Vec<String> = LVA_NAMES.iter().map(|n| (*n).to_owned()).collect();
    let result = sqlx::query(
        "INSERT INTO lvas (name, is_active)
         SELECT name, TRUE FROM UNNEST($1::TEXT[]) AS t(name)
         ON CONFLICT (name) DO NOTHING",
    )
    .bind(names)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn import_catalogue(pool: &PgPool, actor: &AdminProfile) -> Result<ImportResult, ContentError> {
    let imported = insert_catalogue(pool).await?;
    let skipped = (LVA_NAMES.len() as u64).saturating_sub(imported);
    activity::record(
        pool,
        Some(actor.id),
        "LVA_IMPORT",
        &format!("{imported} LVAs importiert, {skipped} übersprungen"),
        None,
    )
    .await;
    Ok(ImportResult {
        imported,
        skipped,
        message: format!("{imported} LVAs erfolgreich importiert"),
    })
}

#[cfg(test)]
#[path = "lva_test.rs"]
mod tests;
