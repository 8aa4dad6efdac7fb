//! Study program routes: public catalogue plus admin CRUD under
//! `/api/admin/study`.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::error::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::AuthAdmin;
use crate::routes::{created, message};
use crate::services::study::{
    self, AdminCategory, AdminProgram, AdminUpdate, CategoryInput, CategoryPatch, CategoryWithPrograms, Program,
    ProgramInput, ProgramPatch, ProgramUpdate, UpdateGroup, UpdateInput, UpdatePatch,
};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProgramQuery {
    pub category_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateQuery {
    pub program_id: Option<i64>,
}

// =============================================================================
// PUBLIC
// =============================================================================

pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryWithPrograms>>, ApiError> {
    Ok(Json(study::list_categories(&state.pool).await?))
}

pub async fn programs(
    State(state): State<AppState>,
    WithRejection(Query(query), _): ApiQuery<ProgramQuery>,
) -> Result<Json<Vec<Program>>, ApiError> {
    Ok(Json(study::list_programs(&state.pool, query.category_id).await?))
}

pub async fn updates(
    State(state): State<AppState>,
    WithRejection(Query(query), _): ApiQuery<UpdateQuery>,
) -> Result<Json<Vec<ProgramUpdate>>, ApiError> {
    Ok(Json(study::list_updates(&state.pool, query.program_id).await?))
}

/// `GET /api/study/updates/grouped`: one group per program with updates.
pub async fn grouped(State(state): State<AppState>) -> Result<Json<Vec<UpdateGroup>>, ApiError> {
    Ok(Json(study::grouped_updates(&state.pool).await?))
}

// =============================================================================
// ADMIN: CATEGORIES
// =============================================================================

pub async fn admin_categories(
    State(state): State<AppState>,
    _auth: AuthAdmin,
) -> Result<Json<Vec<AdminCategory>>, ApiError> {
    Ok(Json(study::admin_categories(&state.pool).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Json(body), _): ApiJson<CategoryInput>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = study::create_category(&state.pool, &auth.admin, body).await?;
    Ok(created(id, "Kategorie erstellt"))
}

pub async fn update_category(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(category_id), _): ApiPath<i64>,
    WithRejection(Json(body), _): ApiJson<CategoryPatch>,
) -> Result<Json<serde_json::Value>, ApiError> {
    study::update_category(&state.pool, &auth.admin, category_id, body).await?;
    Ok(message("Kategorie aktualisiert"))
}

pub async fn delete_category(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(category_id), _): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    study::delete_category(&state.pool, &auth.admin, category_id).await?;
    Ok(message("Kategorie gelöscht"))
}

// =============================================================================
// ADMIN: PROGRAMS
// =============================================================================

pub async fn admin_programs(State(state): State<AppState>, _auth: AuthAdmin) -> Result<Json<Vec<AdminProgram>>, ApiError> {
    Ok(Json(study::admin_programs(&state.pool).await?))
}

pub async fn create_program(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Json(body), _): ApiJson<ProgramInput>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = study::create_program(&state.pool, &auth.admin, body).await?;
    Ok(created(id, "Studiengang erstellt"))
}

pub async fn update_program(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(program_id), _): ApiPath<i64>,
    WithRejection(Json(body), _): ApiJson<ProgramPatch>,
) -> Result<Json<serde_json::Value>, ApiError> {
    study::update_program(&state.pool, &auth.admin, program_id, body).await?;
    Ok(message("Studiengang aktualisiert"))
}

pub async fn delete_program(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(program_id), _): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    study::delete_program(&state.pool, &auth.admin, program_id).await?;
    Ok(message("Studiengang gelöscht"))
}

// =============================================================================
// ADMIN: UPDATES
// =============================================================================

pub async fn admin_updates(State(state): State<AppState>, _auth: AuthAdmin) -> Result<Json<Vec<AdminUpdate>>, ApiError> {
    Ok(Json(study::admin_updates(&state.pool).await?))
}

pub async fn create_update(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Json(body), _): ApiJson<UpdateInput>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = study::create_update(&state.pool, &auth.admin, body).await?;
    Ok(created(id, "Update erstellt"))
}

pub async fn update_update(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(update_id), _): ApiPath<i64>,
    WithRejection(Json(body), _): ApiJson<UpdatePatch>,
) -> Result<Json<serde_json::Value>, ApiError> {
    study::update_update(&state.pool, &auth.admin, update_id, body).await?;
    Ok(message("Update aktualisiert"))
}

pub async fn delete_update(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(update_id), _): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    study::delete_update(&state.pool, &auth.admin, update_id).await?;
    Ok(message("Update gelöscht"))
}
