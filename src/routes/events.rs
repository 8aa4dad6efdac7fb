//! Calendar routes: the public calendar and its admin counterpart under
//! `/api/admin/events`.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;

use crate::error::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::AuthAdmin;
use crate::routes::message;
use crate::services::events::{self, CalendarEvent, EventFilter, EventInput, EventPatch};
use crate::state::AppState;

/// `GET /api/events?month&year&tag&search`
pub async fn list_public(
    State(state): State<AppState>,
    WithRejection(Query(filter), _): ApiQuery<EventFilter>,
) -> Result<Json<Vec<CalendarEvent>>, ApiError> {
    Ok(Json(events::list_public(&state.pool, &filter).await?))
}

/// `GET /api/events/tags`
pub async fn tags(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(events::public_tags(&state.pool).await?))
}

/// `GET /api/events/{id}`: private events answer 404.
pub async fn get_public(
    State(state): State<AppState>,
    WithRejection(Path(event_id), _): ApiPath<i64>,
) -> Result<Json<CalendarEvent>, ApiError> {
    Ok(Json(events::get_public(&state.pool, event_id).await?))
}

pub async fn list_all(State(state): State<AppState>, _auth: AuthAdmin) -> Result<Json<Vec<CalendarEvent>>, ApiError> {
    Ok(Json(events::list_all(&state.pool).await?))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Json(body), _): ApiJson<EventInput>,
) -> Result<Json<CalendarEvent>, ApiError> {
    Ok(Json(events::create_event(&state.pool, &auth.admin, body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(event_id), _): ApiPath<i64>,
    WithRejection(Json(body), _): ApiJson<EventPatch>,
) -> Result<Json<CalendarEvent>, ApiError> {
    Ok(Json(events::update_event(&state.pool, &auth.admin, event_id, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(event_id), _): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    events::delete_event(&state.pool, &auth.admin, event_id).await?;
    Ok(message("Event erfolgreich gelöscht"))
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
