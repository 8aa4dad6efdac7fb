use axum::http::{Method, StatusCode};

use crate::routes::test_client::{app, send};

#[tokio::test]
async fn invalid_month_is_400_before_querying() {
    let (status, _, body) = send(app(), Method::GET, "/api/events?month=13&year=2025", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Ungültiger Zeitraum");
}

#[tokio::test]
async fn non_numeric_month_is_rejected_by_the_extractor() {
    let (status, _, body) = send(app(), Method::GET, "/api/events?month=may", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().starts_with("Failed to deserialize query string"), "{body}");
}

#[tokio::test]
async fn admin_listing_requires_auth() {
    let (status, _, _) = send(app(), Method::GET, "/api/admin/events", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
