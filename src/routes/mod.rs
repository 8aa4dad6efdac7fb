//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds every REST endpoint under `/api` into a single Axum
//! router. When `STATIC_DIR` is configured the built SPA is served from it,
//! with unknown paths falling back to `index.html` so client-side routes
//! survive a reload.

pub mod admins;
pub mod auth;
pub mod codes;
pub mod contact;
pub mod events;
pub mod lva;
pub mod news;
pub mod oehli;
pub mod settings;
pub mod stats;
pub mod study;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post, put};
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

/// Public and admin API routes.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/healthz", get(healthz))
        // auth & admins
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/change-password", post(auth::change_password))
        .route("/api/admins", get(admins::list).post(admins::create))
        .route("/api/admins/{id}", put(admins::update).delete(admins::delete))
        // news
        .route("/api/news", get(news::list_public).post(news::create))
        .route("/api/news/all", get(news::list_all))
        .route("/api/news/{id}", get(news::view).put(news::update).delete(news::delete))
        // calendar
        .route("/api/events", get(events::list_public))
        .route("/api/events/tags", get(events::tags))
        .route("/api/events/{id}", get(events::get_public))
        .route("/api/admin/events", get(events::list_all).post(events::create))
        .route("/api/admin/events/{id}", put(events::update).delete(events::delete))
        // study programs
        .route("/api/study/categories", get(study::categories))
        .route("/api/study/programs", get(study::programs))
        .route("/api/study/updates", get(study::updates))
        .route("/api/study/updates/grouped", get(study::grouped))
        .route(
            "/api/admin/study/categories",
            get(study::admin_categories).post(study::create_category),
        )
        .route(
            "/api/admin/study/categories/{id}",
            put(study::update_category).delete(study::delete_category),
        )
        .route("/api/admin/study/programs", get(study::admin_programs).post(study::create_program))
        .route(
            "/api/admin/study/programs/{id}",
            put(study::update_program).delete(study::delete_program),
        )
        .route("/api/admin/study/updates", get(study::admin_updates).post(study::create_update))
        .route(
            "/api/admin/study/updates/{id}",
            put(study::update_update).delete(study::delete_update),
        )
        // LVAs & ratings
        .route("/api/lvas", get(lva::list))
        .route("/api/lvas/top", get(lva::top))
        .route("/api/lvas/stats", get(lva::stats))
        .route("/api/lvas/{id}", get(lva::get))
        .route("/api/lva/request-code", post(lva::request_code))
        .route("/api/lva/verify-code", post(lva::verify_code))
        .route("/api/lva/submit-rating", post(lva::submit_rating))
        .route("/api/admin/lvas", get(lva::admin_list).post(lva::create))
        .route("/api/admin/lvas/import", post(lva::import))
        .route("/api/admin/lvas/{id}", put(lva::update).delete(lva::delete))
        .route("/api/admin/codes", get(codes::list).post(codes::create))
        .route("/api/admin/codes/{id}", put(codes::update).delete(codes::delete))
        // settings, contact, dashboard
        .route(
            "/api/admin/settings/{key}",
            get(settings::get).post(settings::set).put(settings::put),
        )
        .route("/api/contact", post(contact::submit))
        .route("/api/stats", get(stats::dashboard))
        .route("/api/activity", get(stats::activity))
        // chatbot
        .route("/api/oehli/ask", post(oehli::ask))
        .route("/api/oehli/greeting", get(oehli::greeting))
        .route("/api/oehli/quick-actions", get(oehli::quick_actions))
}

/// Full application router with CORS, compression and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config.static_dir.clone();
    let mut router = api_routes().with_state(state);

    if let Some(dir) = static_dir {
        tracing::info!(dir = %dir.display(), "serving static frontend");
        let index = ServeFile::new(dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(&dir).append_index_html_on_directories(true).fallback(index));
    }

    router
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok", version: env!("CARGO_PKG_VERSION") })
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `{"message": ...}` acknowledgement body used by mutating endpoints.
pub(crate) fn message(text: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": text }))
}

/// `{"id": ..., "message": ...}` body for create endpoints that only hand
/// back the new row id.
pub(crate) fn created(id: i64, text: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "id": id, "message": text }))
}


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
