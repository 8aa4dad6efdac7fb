use axum::http::{Method, StatusCode};

use crate::routes::test_client::{app, send};

#[tokio::test]
async fn blank_message_is_rejected_before_lookup() {
    let body = serde_json::json!({
        "name": "Anna",
        "email": "anna@students.jku.at",
        "message": "   "
    });
    let (status, _, json) = send(app(), Method::POST, "/api/contact", Some(body), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn malformed_email_is_400() {
    let body = serde_json::json!({
        "name": "Anna",
        "email": "anna-at-jku",
        "message": "Hallo"
    });
    let (status, _, _) = send(app(), Method::POST, "/api/contact", Some(body), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_name_field_is_422() {
    let body = serde_json::json!({ "email": "anna@students.jku.at", "message": "Hallo" });
    let (status, _, json) = send(app(), Method::POST, "/api/contact", Some(body), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].as_str().unwrap().contains("name"), "{json}");
}

#[tokio::test]
async fn malformed_json_body_renders_detail() {
    let request = axum::http::Request::post("/api/contact")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(json["detail"].is_string(), "{json}");
}

#[tokio::test]
async fn missing_content_type_is_415_with_detail() {
    let request = axum::http::Request::post("/api/contact")
        .body(axum::body::Body::from("{}"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(json["detail"].is_string(), "{json}");
}
