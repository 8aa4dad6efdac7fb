use super::*;
use crate::services::admin::AdminRole;
use crate::state::test_helpers;

#[test]
fn priority_rows_fold_into_counts() {
    let rows = vec![("high".to_owned(), 2), ("low".to_owned(), 5), ("bogus".to_owned(), 9)];
    let counts = PriorityCounts::from_rows(&rows);
    assert_eq!(counts, PriorityCounts { low: 5, medium: 0, high: 2, urgent: 0 });
}

#[test]
fn priority_counts_serialize_every_bucket() {
    let json = serde_json::to_value(PriorityCounts::default()).unwrap();
    assert_eq!(json, serde_json::json!({ "low": 0, "medium": 0, "high": 0, "urgent": 0 }));
}

#[tokio::test]
async fn editors_cannot_read_activity_log() {
    let pool = test_helpers::lazy_pool();
    let editor = AdminProfile {
        id: 9,
        username: "ed".into(),
        email: "ed@oeh.jku.at".into(),
        display_name: "Ed".into(),
        role: AdminRole::Editor,
        is_master: false,
        is_active: true,
    };
    let err = activity_log(&pool, &editor, 50).await.unwrap_err();
    assert!(matches!(err, ContentError::Forbidden(_)));
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn dashboard_counts_news_and_admins() {
    use crate::db::test_support;
    use crate::services::news::{self, NewsInput};

    let pool = test_support::integration_pool().await;
    let author = test_support::profile(&pool, "stats_author", "admin").await;
    let input: NewsInput = serde_json::from_value(serde_json::json!({
        "title": "Semesterstart",
        "content": "Willkommen!",
        "priority": "high",
        "is_published": true
    }))
    .unwrap();
    news::create_news(&pool, &author, input).await.unwrap();

    let stats = dashboard(&pool).await.unwrap();
    assert_eq!(stats.total_news, 1);
    assert_eq!(stats.published_news, 1);
    assert_eq!(stats.draft_news, 0);
    assert_eq!(stats.total_admins, 1);
    assert_eq!(stats.news_by_priority.high, 1);
    assert!(!stats.recent_activity.is_empty());
}
