use axum::http::{Method, StatusCode};

use super::test_client::{app, send};

#[tokio::test]
async fn health_reports_version() {
    let (status, _, body) = send(app(), Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn healthz_is_ok() {
    let (status, _, _) = send(app(), Method::GET, "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_path_without_static_dir_is_404() {
    let (status, _, _) = send(app(), Method::GET, "/definitely/not/here", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn spa_fallback_serves_index() {
    let dir = std::env::temp_dir().join(format!("oeh-static-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<html>spa</html>").unwrap();

    let mut state = crate::state::test_helpers::test_app_state();
    let mut config = (*state.config).clone();
    config.static_dir = Some(dir.clone());
    state.config = std::sync::Arc::new(config);

    let response = tower::ServiceExt::oneshot(
        super::app(state),
        axum::http::Request::get("/news/42").body(axum::body::Body::empty()).unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<html>spa</html>");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn ack_bodies() {
    assert_eq!(super::message("ok").0, serde_json::json!({ "message": "ok" }));
    assert_eq!(super::created(5, "erstellt").0, serde_json::json!({ "id": 5, "message": "erstellt" }));
}
