//! News routes. Reading is public; writing needs a bearer token.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::error::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::AuthAdmin;
use crate::routes::message;
use crate::services::news::{self, NewsInput, NewsItem, NewsPatch};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    #[serde(default = "default_published_only")]
    pub published_only: bool,
}

fn default_published_only() -> bool {
    true
}

/// `GET /api/news?published_only=true`
pub async fn list_public(
    State(state): State<AppState>,
    WithRejection(Query(query), _): ApiQuery<NewsQuery>,
) -> Result<Json<Vec<NewsItem>>, ApiError> {
    Ok(Json(news::list_news(&state.pool, query.published_only).await?))
}

/// `GET /api/news/all`: drafts included.
pub async fn list_all(State(state): State<AppState>, _auth: AuthAdmin) -> Result<Json<Vec<NewsItem>>, ApiError> {
    Ok(Json(news::list_all(&state.pool).await?))
}

/// `GET /api/news/{id}`: counts a view.
pub async fn view(
    State(state): State<AppState>,
    WithRejection(Path(news_id), _): ApiPath<i64>,
) -> Result<Json<NewsItem>, ApiError> {
    Ok(Json(news::view_news(&state.pool, news_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Json(body), _): ApiJson<NewsInput>,
) -> Result<Json<NewsItem>, ApiError> {
    Ok(Json(news::create_news(&state.pool, &auth.admin, body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(news_id), _): ApiPath<i64>,
    WithRejection(Json(body), _): ApiJson<NewsPatch>,
) -> Result<Json<NewsItem>, ApiError> {
    Ok(Json(news::update_news(&state.pool, &auth.admin, news_id, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthAdmin,
    WithRejection(Path(news_id), _): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    news::delete_news(&state.pool, &auth.admin, news_id).await?;
    Ok(message("News erfolgreich gelöscht"))
}

#[cfg(test)]
#[path = "news_test.rs"]
mod tests;
