//! Admin verification codes: reusable codes handed out at events so
//! students can rate without a university mailbox.

use axum::extract::{Path, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde::Serialize;

use crate::error::{ApiError, ApiJson, ApiPath};
use crate::routes::auth::AuthAdmin;
use crate::routes::message;
use crate::services::verification::{self, AdminCode, AdminCodeInput, AdminCodePatch, CreatedCode};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CodeCreated {
    #[serde(flatten)]
    pub code: CreatedCode,
    pub message: &'static str,
}

pub async fn list(State(state): State<AppState>, _auth: AuthAdmin) -> Result<Json<Vec<AdminCode>>, ApiError> {
    Ok(Json(verification::list_admin_codes(&state.pool).await?))
}

/// `POST /api/admin/codes`: the generated code is only shown in this
/// response and in the list.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Json(body), _): ApiJson<AdminCodeInput>,
) -> Result<Json<CodeCreated>, ApiError> {
    let code = verification::create_admin_code(&state.pool, &auth.admin, body).await?;
    Ok(Json(CodeCreated { code, message: "Code erfolgreich erstellt" }))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(code_id), _): ApiPath<i64>,
    WithRejection(Json(body), _): ApiJson<AdminCodePatch>,
) -> Result<Json<serde_json::Value>, ApiError> {
    verification::update_admin_code(&state.pool, &auth.admin, code_id, body).await?;
    Ok(message("Code aktualisiert"))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(code_id), _): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    verification::delete_admin_code(&state.pool, &auth.admin, code_id).await?;
    Ok(message("Code gelöscht"))
}
