//! Dashboard statistics and the admin activity log.

use axum::extract::{Query, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::error::{ApiError, ApiQuery};
use crate::routes::auth::AuthAdmin;
use crate::services::activity::{self, ActivityEntry};
use crate::services::stats::{self, DashboardStats};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    activity::DEFAULT_LIMIT
}

pub async fn dashboard(State(state): State<AppState>, _auth: AuthAdmin) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(stats::dashboard(&state.pool).await?))
}

/// `GET /api/activity?limit=50`: master and admin roles only.
pub async fn activity(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Query(query), _): ApiQuery<ActivityQuery>,
) -> Result<Json<Vec<ActivityEntry>>, ApiError> {
    Ok(Json(stats::activity_log(&state.pool, &auth.admin, query.limit).await?))
}
