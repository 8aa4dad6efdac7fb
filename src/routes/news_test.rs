use axum::extract::Query;
use axum::http::{Method, StatusCode, Uri};

use super::*;
use crate::routes::test_client::{app, send};

#[test]
fn published_only_defaults_to_true() {
    let uri: Uri = "/api/news".parse().unwrap();
    let Query(query) = Query::<NewsQuery>::try_from_uri(&uri).unwrap();
    assert!(query.published_only);

    let uri: Uri = "/api/news?published_only=false".parse().unwrap();
    let Query(query) = Query::<NewsQuery>::try_from_uri(&uri).unwrap();
    assert!(!query.published_only);
}

#[tokio::test]
async fn non_numeric_id_is_rejected() {
    let (status, _, body) = send(app(), Method::GET, "/api/news/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string(), "{body}");
}

#[tokio::test]
async fn create_requires_auth() {
    let body = serde_json::json!({ "title": "x", "content": "y" });
    let (status, _, _) = send(app(), Method::POST, "/api/news", Some(body), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
