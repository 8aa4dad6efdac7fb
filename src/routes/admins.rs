//! Admin account management routes.

use axum::extract::{Path, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;

use crate::error::{ApiError, ApiJson, ApiPath};
use crate::routes::auth::AuthAdmin;
use crate::routes::message;
use crate::services::admin::{self, AdminPatch, AdminRecord, NewAdmin};
use crate::state::AppState;

/// `GET /api/admins`: master and admin roles only.
pub async fn list(State(state): State<AppState>, auth: AuthAdmin) -> Result<Json<Vec<AdminRecord>>, ApiError> {
    Ok(Json(admin::list_admins(&state.pool, &auth.admin).await?))
}

/// `POST /api/admins`: master only.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Json(body), _): ApiJson<NewAdmin>,
) -> Result<Json<AdminRecord>, ApiError> {
    Ok(Json(admin::create_admin(&state.pool, &auth.admin, body).await?))
}

/// `PUT /api/admins/{id}`: master, or the admin editing themselves.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(admin_id), _): ApiPath<i64>,
    WithRejection(Json(body), _): ApiJson<AdminPatch>,
) -> Result<Json<AdminRecord>, ApiError> {
    Ok(Json(admin::update_admin(&state.pool, &auth.admin, admin_id, body).await?))
}

/// `DELETE /api/admins/{id}`: master only.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(admin_id), _): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    admin::delete_admin(&state.pool, &auth.admin, admin_id).await?;
    Ok(message("Admin erfolgreich gelöscht"))
}
