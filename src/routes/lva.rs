//! LVA routes: the public course list, the anonymous rating flow under
//! `/api/lva/*`, and admin CRUD under `/api/admin/lvas`.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::AuthAdmin;
use crate::routes::{created, message};
use crate::services::lva::{self, AdminLva, DEFAULT_TOP_LIMIT, ImportResult, Lva, LvaInput, LvaPatch, LvaStats};
use crate::services::verification::{self, CodeCheck, CodeRequest, RatingSubmission};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    #[serde(default = "default_top_limit")]
    pub limit: i64,
}

fn default_top_limit() -> i64 {
    DEFAULT_TOP_LIMIT
}

#[derive(Debug, Serialize)]
pub struct CodeSent {
    pub success: bool,
    pub message: &'static str,
    pub expires_in_minutes: i64,
}

#[derive(Debug, Serialize)]
pub struct CodeValid {
    pub success: bool,
    pub message: &'static str,
    pub is_admin_code: bool,
}

#[derive(Debug, Serialize)]
pub struct RatingAccepted {
    pub success: bool,
    pub message: &'static str,
}

// =============================================================================
// PUBLIC
// =============================================================================

/// `GET /api/lvas?search=`
pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(query), _): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<Lva>>, ApiError> {
    Ok(Json(lva::list_active(&state.pool, query.search.as_deref()).await?))
}

/// `GET /api/lvas/top?limit=10`: best rated (lowest total) first.
pub async fn top(
    State(state): State<AppState>,
    WithRejection(Query(query), _): ApiQuery<TopQuery>,
) -> Result<Json<Vec<Lva>>, ApiError> {
    Ok(Json(lva::top(&state.pool, query.limit).await?))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<LvaStats>, ApiError> {
    Ok(Json(lva::stats(&state.pool).await?))
}

pub async fn get(
    State(state): State<AppState>,
    WithRejection(Path(lva_id), _): ApiPath<i64>,
) -> Result<Json<Lva>, ApiError> {
    Ok(Json(lva::get(&state.pool, lva_id).await?))
}

// =============================================================================
// RATING FLOW
// =============================================================================

/// `POST /api/lva/request-code`: mail a one-time code to a student address.
pub async fn request_code(
    State(state): State<AppState>,
    WithRejection(Json(body), _): ApiJson<CodeRequest>,
) -> Result<Json<CodeSent>, ApiError> {
    let ttl = verification::request_code(&state, body).await?;
    Ok(Json(CodeSent {
        success: true,
        message: "Code wurde gesendet! Überprüfe dein E-Mail-Postfach.",
        expires_in_minutes: ttl,
    }))
}

/// `POST /api/lva/verify-code`: check a code without consuming it.
pub async fn verify_code(
    State(state): State<AppState>,
    WithRejection(Json(body), _): ApiJson<CodeCheck>,
) -> Result<Json<CodeValid>, ApiError> {
    let matched = verification::verify_code(&state.pool, body).await?;
    Ok(Json(CodeValid { success: true, message: "Code ist gültig", is_admin_code: matched.is_admin_code() }))
}

/// `POST /api/lva/submit-rating`: consume the code and store the rating.
pub async fn submit_rating(
    State(state): State<AppState>,
    WithRejection(Json(body), _): ApiJson<RatingSubmission>,
) -> Result<Json<RatingAccepted>, ApiError> {
    verification::submit_rating(&state.pool, body).await?;
    Ok(Json(RatingAccepted {
        success: true,
        message: "Bewertung erfolgreich abgegeben! Vielen Dank für dein Feedback.",
    }))
}

// =============================================================================
// ADMIN
// =============================================================================

pub async fn admin_list(State(state): State<AppState>, _auth: AuthAdmin) -> Result<Json<Vec<AdminLva>>, ApiError> {
    Ok(Json(lva::list_all(&state.pool).await?))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Json(body), _): ApiJson<LvaInput>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = lva::create_lva(&state.pool, &auth.admin, body).await?;
    Ok(created(id, "LVA erstellt"))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(lva_id), _): ApiPath<i64>,
    WithRejection(Json(body), _): ApiJson<LvaPatch>,
) -> Result<Json<serde_json::Value>, ApiError> {
    lva::update_lva(&state.pool, &auth.admin, lva_id, body).await?;
    Ok(message("LVA aktualisiert"))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(lva_id), _): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    lva::delete_lva(&state.pool, &auth.admin, lva_id).await?;
    Ok(message("LVA gelöscht"))
}

/// `POST /api/admin/lvas/import`: insert the built-in catalogue, skipping
/// names that already exist.
pub async fn import(State(state): State<AppState>, auth: AuthAdmin) -> Result<Json<ImportResult>, ApiError> {
    Ok(Json(lva::import_catalogue(&state.pool, &auth.admin).await?))
}

#[cfg(test)]
#[path = "lva_test.rs"]
mod tests;
