//! `/api/admin/settings/{key}`

use axum::extract::{Path, Query, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde::Serialize;

use crate::error::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::AuthAdmin;
use crate::services::settings::{self, Setting, SettingUpdate};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SettingSaved {
    #[serde(flatten)]
    pub setting: Setting,
    pub message: &'static str,
}

pub async fn get(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    WithRejection(Path(key), _): ApiPath<String>,
) -> Result<Json<Setting>, ApiError> {
    Ok(Json(settings::get(&state.pool, &key).await?))
}

/// `POST` with a `{"value"}` body; master only.
pub async fn set(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(key), _): ApiPath<String>,
    WithRejection(Json(body), _): ApiJson<SettingUpdate>,
) -> Result<Json<SettingSaved>, ApiError> {
    let setting = settings::set(&state.pool, &auth.admin, &key, body.value).await?;
    Ok(Json(SettingSaved { setting, message: "Einstellung gespeichert" }))
}

/// `PUT ?value=`: the query-string form of [`set`].
pub async fn put(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(key), _): ApiPath<String>,
    WithRejection(Query(query), _): ApiQuery<SettingUpdate>,
) -> Result<Json<SettingSaved>, ApiError> {
    let setting = settings::set(&state.pool, &auth.admin, &key, query.value).await?;
    Ok(Json(SettingSaved { setting, message: "Einstellung gespeichert" }))
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
