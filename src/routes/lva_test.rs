use axum::extract::Query;
use axum::http::{Method, StatusCode, Uri};

use super::*;
use crate::routes::test_client::{app, send};

#[test]
fn top_limit_defaults_to_ten() {
    let uri: Uri = "/api/lvas/top".parse().unwrap();
    let Query(query) = Query::<TopQuery>::try_from_uri(&uri).unwrap();
    assert_eq!(query.limit, 10);
}

#[tokio::test]
async fn request_code_rejects_foreign_domain_with_403() {
    let body = serde_json::json!({ "email": "someone@gmail.com", "lva_id": 1 });
    let (status, _, json) = send(app(), Method::POST, "/api/lva/request-code", Some(body), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(json["detail"].as_str().unwrap().contains("@students.jku.at"));
}

#[tokio::test]
async fn request_code_rejects_malformed_email_with_400() {
    let body = serde_json::json!({ "email": "nobody", "lva_id": 1 });
    let (status, _, _) = send(app(), Method::POST, "/api/lva/request-code", Some(body), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_rating_out_of_range_is_400() {
    let body = serde_json::json!({
        "code": "AB2CD",
        "lva_id": 1,
        "effort_rating": 0,
        "difficulty_rating": 3
    });
    let (status, _, json) = send(app(), Method::POST, "/api/lva/submit-rating", Some(body), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn import_requires_auth() {
    let (status, _, _) = send(app(), Method::POST, "/api/admin/lvas/import", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
