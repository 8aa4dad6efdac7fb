//! Auth routes: bearer login, session introspection, logout and password
//! changes.

use axum::extract::{FromRef, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiJson};
use crate::routes::message;
use crate::services::admin::{self, AdminProfile};
use crate::services::session;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid authentication credentials";
const DEACTIVATED: &str = "Admin account is deactivated";

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated admin extracted from the `Authorization: Bearer` header.
/// Use as a handler parameter to require authentication.
pub struct AuthAdmin {
    pub admin: AdminProfile,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(Authorization(bearer)) = parts.headers.typed_get::<Authorization<Bearer>>() else {
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        };
        let token = bearer.token();
        if token.is_empty() {
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }

        let app_state = AppState::from_ref(state);
        let admin = session::validate_session(&app_state.pool, token)
            .await?
            .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;
        if !admin.is_active {
            return Err(ApiError::forbidden(DEACTIVATED));
        }

        Ok(Self { admin, token: token.to_owned() })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub admin: AdminProfile,
}

/// `POST /api/auth/login`: username or email plus password.
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(body), _): ApiJson<LoginBody>,
) -> Result<Json<TokenResponse>, ApiError> {
    let (access_token, profile) =
        admin::login(&state.pool, &body.username, &body.password, state.config.session_ttl_minutes).await?;
    Ok(Json(TokenResponse { access_token, token_type: "bearer", admin: profile }))
}

/// `GET /api/auth/me`
pub async fn me(auth: AuthAdmin) -> Json<AdminProfile> {
    Json(auth.admin)
}

/// `POST /api/auth/logout`: revoke the presented token.
pub async fn logout(State(state): State<AppState>, auth: AuthAdmin) -> Result<Json<serde_json::Value>, ApiError> {
    session::delete_session(&state.pool, &auth.token).await?;
    tracing::info!(admin_id = auth.admin.id, "admin logged out");
    Ok(message("Erfolgreich abgemeldet"))
}

#[derive(Deserialize)]
pub struct ChangePasswordBody {
    pub current_password: String,
    pub new_password: String,
}

/// `POST /api/auth/change-password`
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Json(body), _): ApiJson<ChangePasswordBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    admin::change_password(&state.pool, &auth.admin, &body.current_password, &body.new_password).await?;
    Ok(message("Passwort erfolgreich geändert"))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
