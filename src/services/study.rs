//! Study categories, programs and per-program updates ("SGU").
//!
//! A category owns programs; a program owns updates. Deleting a parent
//! cascades in the database. Public readers only see active programs and
//! active updates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::services::admin::AdminProfile;
use crate::services::{ContentError, activity, clean_optional, nullable, require_text};

const CATEGORY_NOT_FOUND: &str = "Kategorie nicht gefunden";
const PROGRAM_NOT_FOUND: &str = "Studiengang nicht gefunden";
const UPDATE_NOT_FOUND: &str = "Update nicht gefunden";
const DUPLICATE_CATEGORY: &str = "Kategorie mit diesem Namen existiert bereits";

// =============================================================================
// PUBLIC TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProgramSummary {
    #[serde(skip)]
    pub category_id: i64,
    pub id: i64,
    pub name: String,
    pub short_name: Option<String>,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategoryWithPrograms {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub color: String,
    pub sort_order: i32,
    #[sqlx(skip)]
    pub programs: Vec<ProgramSummary>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Program {
    pub id: i64,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub name: String,
    pub short_name: Option<String>,
    pub description: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProgramUpdate {
    pub id: i64,
    pub program_id: i64,
    pub program_name: Option<String>,
    pub category_name: Option<String>,
    pub content: String,
    pub semester: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// One row of the grouped view before grouping.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupRow {
    pub program_id: i64,
    pub program_name: String,
    pub category_name: Option<String>,
    pub update_id: i64,
    pub content: String,
    pub semester: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedUpdate {
    pub id: i64,
    pub content: String,
    pub semester: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateGroup {
    pub program_id: i64,
    pub program_name: String,
    pub category_name: Option<String>,
    pub updates: Vec<GroupedUpdate>,
}

// =============================================================================
// ADMIN TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminCategory {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub color: String,
    pub sort_order: i32,
    pub program_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminProgram {
    pub id: i64,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub name: String,
    pub short_name: Option<String>,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub update_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminUpdate {
    pub id: i64,
    pub program_id: i64,
    pub program_name: Option<String>,
    pub category_name: Option<String>,
    pub content: String,
    pub semester: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub creator_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_color() -> String {
    "blue".to_owned()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub color: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgramInput {
    pub category_id: i64,
    pub name: String,
    pub short_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgramPatch {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub short_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInput {
    pub program_id: i64,
    pub content: String,
    pub semester: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePatch {
    pub program_id: Option<i64>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub semester: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

// =============================================================================
// PURE HELPERS
// =============================================================================

/// Attach programs to their categories, keeping the order of both inputs.
#[must_use]
pub fn attach_programs(
    mut categories: Vec<CategoryWithPrograms>,
    programs: Vec<ProgramSummary>,
) -> Vec<CategoryWithPrograms> {
    let mut by_category: HashMap<i64, Vec<ProgramSummary>> = HashMap::new();
    for program in programs {
        by_category.entry(program.category_id).or_default().push(program);
    }
    for category in &mut categories {
        category.programs = by_category.remove(&category.id).unwrap_or_default();
    }
    categories
}

/// Group update rows per program. Updates sort by `(sort_order, -id)`,
/// groups by program name.
#[must_use]
pub fn group_updates(rows: Vec<GroupRow>) -> Vec<UpdateGroup> {
    let mut groups: HashMap<i64, UpdateGroup> = HashMap::new();
    for row in rows {
        groups
            .entry(row.program_id)
            .or_insert_with(|| UpdateGroup {
                program_id: row.program_id,
                program_name: row.program_name.clone(),
                category_name: row.category_name.clone(),
                updates: Vec::new(),
            })
            .updates
            .push(GroupedUpdate {
                id: row.update_id,
                content: row.content,
                semester: row.semester,
                sort_order: row.sort_order,
            });
    }

    let mut groups: Vec<UpdateGroup> = groups.into_values().collect();
    for group in &mut groups {
        group.updates.sort_by_key(|u| (u.sort_order, std::cmp::Reverse(u.id)));
    }
    groups.sort_by(|a, b| a.program_name.cmp(&b.program_name).then(a.program_id.cmp(&b.program_id)));
    groups
}

// =============================================================================
// PUBLIC QUERIES
// =============================================================================

pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryWithPrograms>, ContentError> {
    let categories = sqlx::query_as::<_, CategoryWithPrograms>(
        "SELECT id, name, display_name, description, color, sort_order
         FROM study_categories
         ORDER BY sort_order, name",
    )
    .fetch_all(pool)
    .await?;
    let programs = sqlx::query_as::<_, ProgramSummary>(
        "SELECT category_id, id, name, short_name, description, sort_order, is_active
         FROM study_programs
         WHERE is_active
         ORDER BY sort_order, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(attach_programs(categories, programs))
}

pub async fn list_programs(pool: &PgPool, category_id: Option<i64>) -> Result<Vec<Program>, ContentError> {
    Ok(sqlx::query_as::<_, Program>(
        "SELECT p.id, p.category_id, c.display_name AS category_name, p.name, p.short_name,
                p.description, p.sort_order
         FROM study_programs p
         LEFT JOIN study_categories c ON c.id = p.category_id
         WHERE p.is_active AND ($1::BIGINT IS NULL OR p.category_id = $1)
         ORDER BY p.sort_order, p.name",
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?)
}

pub async fn list_updates(pool: &PgPool, program_id: Option<i64>) -> Result<Vec<ProgramUpdate>, ContentError> {
    Ok(sqlx::query_as::<_, ProgramUpdate>(
        "SELECT u.id, u.program_id, p.name AS program_name, c.display_name AS category_name,
                u.content, u.semester, u.is_active, u.sort_order, u.created_at, u.updated_at
         FROM study_updates u
         LEFT JOIN study_programs p ON p.id = u.program_id
         LEFT JOIN study_categories c ON c.id = p.category_id
         WHERE u.is_active AND ($1::BIGINT IS NULL OR u.program_id = $1)
         ORDER BY u.sort_order, u.created_at DESC",
    )
    .bind(program_id)
    .fetch_all(pool)
    .await?)
}

/// Active programs with at least one active update.
pub async fn grouped_updates(pool: &PgPool) -> Result<Vec<UpdateGroup>, ContentError> {
    let rows = sqlx::query_as::<_, GroupRow>(
        "SELECT p.id AS program_id, p.name AS program_name, c.display_name AS category_name,
                u.id AS update_id, u.content, u.semester, u.sort_order
         FROM study_updates u
         JOIN study_programs p ON p.id = u.program_id
         LEFT JOIN study_categories c ON c.id = p.category_id
         WHERE p.is_active AND u.is_active",
    )
    .fetch_all(pool)
    .await?;
    Ok(group_updates(rows))
}

// =============================================================================
// ADMIN: CATEGORIES
// =============================================================================

pub async fn admin_categories(pool: &PgPool) -> Result<Vec<AdminCategory>, ContentError> {
    Ok(sqlx::query_as::<_, AdminCategory>(
        "SELECT c.id, c.name, c.display_name, c.description, c.color, c.sort_order,
                (SELECT COUNT(*) FROM study_programs p WHERE p.category_id = c.id) AS program_count,
                c.created_at
         FROM study_categories c
         ORDER BY c.sort_order, c.name",
    )
    .fetch_all(pool)
    .await?)
}

async fn category_name_taken(pool: &PgPool, name: &str, except: Option<i64>) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM study_categories WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
    )
    .bind(name)
    .bind(except)
    .fetch_one(pool)
    .await
}

pub async fn create_category(pool: &PgPool, actor: &AdminProfile, input: CategoryInput) -> Result<i64, ContentError> {
    require_text(&input.name, "Name")?;
    require_text(&input.display_name, "Anzeigename")?;
    let name = input.name.trim();
    if category_name_taken(pool, name, None).await? {
        return Err(ContentError::Invalid(DUPLICATE_CATEGORY.into()));
    }

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO study_categories (name, display_name, description, color, sort_order)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(name)
    .bind(input.display_name.trim())
    .bind(clean_optional(input.description))
    .bind(&input.color)
    .bind(input.sort_order)
    .fetch_one(pool)
    .await?;

    activity::record(
        pool,
        Some(actor.id),
        "CATEGORY_CREATE",
        &format!("Kategorie '{}' erstellt", input.display_name.trim()),
        Some(("study_category", id)),
    )
    .await;
    Ok(id)
}

pub async fn update_category(
    pool: &PgPool,
    actor: &AdminProfile,
    category_id: i64,
    patch: CategoryPatch,
) -> Result<(), ContentError> {
    if let Some(name) = patch.name.as_deref() {
        require_text(name, "Name")?;
        if category_name_taken(pool, name.trim(), Some(category_id)).await? {
            return Err(ContentError::Invalid(DUPLICATE_CATEGORY.into()));
        }
    }
    if let Some(display_name) = patch.display_name.as_deref() {
        require_text(display_name, "Anzeigename")?;
    }

    let display_name: Option<String> = sqlx::query_scalar(
        "UPDATE study_categories SET
             name = COALESCE($2, name),
             display_name = COALESCE($3, display_name),
             description = CASE WHEN $4 THEN $5 ELSE description END,
             color = COALESCE($6, color),
             sort_order = COALESCE($7, sort_order)
         WHERE id = $1
         RETURNING display_name",
    )
    .bind(category_id)
    .bind(patch.name.as_deref().map(str::trim))
    .bind(patch.display_name.as_deref().map(str::trim))
    .bind(patch.description.is_some())
    .bind(patch.description.and_then(clean_optional))
    .bind(patch.color)
    .bind(patch.sort_order)
    .fetch_optional(pool)
    .await?;
    let display_name = display_name.ok_or(ContentError::NotFound(CATEGORY_NOT_FOUND))?;

    activity::record(
        pool,
        Some(actor.id),
        "CATEGORY_UPDATE",
        &format!("Kategorie '{display_name}' aktualisiert"),
        Some(("study_category", category_id)),
    )
    .await;
    Ok(())
}

/// Deletes the category together with its programs and their updates.
pub async fn delete_category(pool: &PgPool, actor: &AdminProfile, category_id: i64) -> Result<(), ContentError> {
    let display_name: Option<String> =
        sqlx::query_scalar("DELETE FROM study_categories WHERE id = $1 RETURNING display_name")
            .bind(category_id)
            .fetch_optional(pool)
            .await?;
    let display_name = display_name.ok_or(ContentError::NotFound(CATEGORY_NOT_FOUND))?;
    activity::record(
        pool,
        Some(actor.id),
        "CATEGORY_DELETE",
        &format!("Kategorie '{display_name}' gelöscht"),
        None,
    )
    .await;
    Ok(())
}

// =============================================================================
// ADMIN: PROGRAMS
// =============================================================================

pub async fn admin_programs(pool: &PgPool) -> Result<Vec<AdminProgram>, ContentError> {
    Ok(sqlx::query_as::<_, AdminProgram>(
        "SELECT p.id, p.category_id, c.display_name AS category_name, p.name, p.short_name,
                p.description, p.sort_order, p.is_active,
                (SELECT COUNT(*) FROM study_updates u WHERE u.program_id = p.id AND u.is_active) AS update_count,
                p.created_at
         FROM study_programs p
         LEFT JOIN study_categories c ON c.id = p.category_id
         ORDER BY p.category_id, p.sort_order, p.name",
    )
    .fetch_all(pool)
    .await?)
}

async fn category_exists(pool: &PgPool, category_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM study_categories WHERE id = $1)")
        .bind(category_id)
        .fetch_one(pool)
        .await
}

pub async fn create_program(pool: &PgPool, actor: &AdminProfile, input: ProgramInput) -> Result<i64, ContentError> {
    require_text(&input.name, "Name")?;
    if !category_exists(pool, input.category_id).await? {
        return Err(ContentError::Invalid(CATEGORY_NOT_FOUND.into()));
    }

    let name = input.name.trim();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO study_programs (category_id, name, short_name, description, sort_order, is_active)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(input.category_id)
    .bind(name)
    .bind(clean_optional(input.short_name))
    .bind(clean_optional(input.description))
    .bind(input.sort_order)
    .bind(input.is_active)
    .fetch_one(pool)
    .await?;

    activity::record(
        pool,
        Some(actor.id),
        "PROGRAM_CREATE",
        &format!("Studiengang '{name}' erstellt"),
        Some(("study_program", id)),
    )
    .await;
    Ok(id)
}

pub async fn update_program(
    pool: &PgPool,
    actor: &AdminProfile,
    program_id: i64,
    patch: ProgramPatch,
) -> Result<(), ContentError> {
    if let Some(name) = patch.name.as_deref() {
        require_text(name, "Name")?;
    }
    if let Some(category_id) = patch.category_id {
        if !category_exists(pool, category_id).await? {
            return Err(ContentError::Invalid(CATEGORY_NOT_FOUND.into()));
        }
    }

    let name: Option<String> = sqlx::query_scalar(
        "UPDATE study_programs SET
             category_id = COALESCE($2, category_id),
             name = COALESCE($3, name),
             short_name = CASE WHEN $4 THEN $5 ELSE short_name END,
             description = CASE WHEN $6 THEN $7 ELSE description END,
             sort_order = COALESCE($8, sort_order),
             is_active = COALESCE($9, is_active)
         WHERE id = $1
         RETURNING name",
    )
    .bind(program_id)
    .bind(patch.category_id)
    .bind(patch.name.as_deref().map(str::trim))
    .bind(patch.short_name.is_some())
    .bind(patch.short_name.and_then(clean_optional))
    .bind(patch.description.is_some())
    .bind(patch.description.and_then(clean_optional))
    .bind(patch.sort_order)
    .bind(patch.is_active)
    .fetch_optional(pool)
    .await?;
    let name = name.ok_or(ContentError::NotFound(PROGRAM_NOT_FOUND))?;

    activity::record(
        pool,
        Some(actor.id),
        "PROGRAM_UPDATE",
        &format!("Studiengang '{name}' aktualisiert"),
        Some(("study_program", program_id)),
    )
    .await;
    Ok(())
}

pub async fn delete_program(pool: &PgPool, actor: &AdminProfile, program_id: i64) -> Result<(), ContentError> {
    let name: Option<String> = sqlx::query_scalar("DELETE FROM study_programs WHERE id = $1 RETURNING name")
        .bind(program_id)
        .fetch_optional(pool)
        .await?;
    let name = name.ok_or(ContentError::NotFound(PROGRAM_NOT_FOUND))?;
    activity::record(pool, Some(actor.id), "PROGRAM_DELETE", &format!("Studiengang '{name}' gelöscht"), None).await;
    Ok(())
}

// =============================================================================
// ADMIN: UPDATES
// =============================================================================

pub async fn admin_updates(pool: &PgPool) -> Result<Vec<AdminUpdate>, ContentError> {
    Ok(sqlx::query_as::<_, AdminUpdate>(
        "SELECT u.id, u.program_id, p.name AS program_name, c.display_name AS category_name,
                u.content, u.semester, u.is_active, u.sort_order, a.display_name AS creator_name,
                u.created_at, u.updated_at
         FROM study_updates u
         LEFT JOIN study_programs p ON p.id = u.program_id
         LEFT JOIN study_categories c ON c.id = p.category_id
         LEFT JOIN admins a ON a.id = u.created_by
         ORDER BY u.created_at DESC, u.id DESC",
    )
    .fetch_all(pool)
    .await?)
}

async fn program_name(pool: &PgPool, program_id: i64) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT name FROM study_programs WHERE id = $1")
        .bind(program_id)
        .fetch_optional(pool)
        .await
}

pub async fn create_update(pool: &PgPool, actor: &AdminProfile, input: UpdateInput) -> Result<i64, ContentError> {
    require_text(&input.content, "Inhalt")?;
    let program = program_name(pool, input.program_id)
        .await?
        .ok_or_else(|| ContentError::Invalid(PROGRAM_NOT_FOUND.into()))?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO study_updates (program_id, content, semester, is_active, sort_order, created_by)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(input.program_id)
    .bind(input.content.trim())
    .bind(clean_optional(input.semester))
    .bind(input.is_active)
    .bind(input.sort_order)
    .bind(actor.id)
    .fetch_one(pool)
    .await?;

    activity::record(
        pool,
        Some(actor.id),
        "UPDATE_CREATE",
        &format!("Update für '{program}' erstellt"),
        Some(("study_update", id)),
    )
    .await;
    Ok(id)
}

pub async fn update_update(
    pool: &PgPool,
    actor: &AdminProfile,
    update_id: i64,
    patch: UpdatePatch,
) -> Result<(), ContentError> {
    if let Some(content) = patch.content.as_deref() {
        require_text(content, "Inhalt")?;
    }
    if let Some(program_id) = patch.program_id {
        if program_name(pool, program_id).await?.is_none() {
            return Err(ContentError::Invalid(PROGRAM_NOT_FOUND.into()));
        }
    }

    let updated: Option<i64> = sqlx::query_scalar(
        "UPDATE study_updates SET
             program_id = COALESCE($2, program_id),
             content = COALESCE($3, content),
             semester = CASE WHEN $4 THEN $5 ELSE semester END,
             is_active = COALESCE($6, is_active),
             sort_order = COALESCE($7, sort_order),
             updated_at = now()
         WHERE id = $1
         RETURNING id",
    )
    .bind(update_id)
    .bind(patch.program_id)
    .bind(patch.content.as_deref().map(str::trim))
    .bind(patch.semester.is_some())
    .bind(patch.semester.and_then(clean_optional))
    .bind(patch.is_active)
    .bind(patch.sort_order)
    .fetch_optional(pool)
    .await?;
    updated.ok_or(ContentError::NotFound(UPDATE_NOT_FOUND))?;

    activity::record(
        pool,
        Some(actor.id),
        "UPDATE_UPDATE",
        "Update aktualisiert",
        Some(("study_update", update_id)),
    )
    .await;
    Ok(())
}

pub async fn delete_update(pool: &PgPool, actor: &AdminProfile, update_id: i64) -> Result<(), ContentError> {
    let deleted: Option<i64> = sqlx::query_scalar("DELETE FROM study_updates WHERE id = $1 RETURNING id")
        .bind(update_id)
        .fetch_optional(pool)
        .await?;
    deleted.ok_or(ContentError::NotFound(UPDATE_NOT_FOUND))?;
    activity::record(pool, Some(actor.id), "UPDATE_DELETE", "Update gelöscht", None).await;
    Ok(())
}

#[cfg(test)]
#[path = "study_test.rs"]
mod tests;
