use super::*;

// =============================================================================
// derive_excerpt
// =============================================================================

#[test]
fn short_content_is_its_own_excerpt() {
    assert_eq!(derive_excerpt("Kurze Meldung"), "Kurze Meldung");
}

#[test]
fn exactly_200_chars_is_not_truncated() {
    let content = "a".repeat(200);
    assert_eq!(derive_excerpt(&content), content);
}

#[test]
fn long_content_truncates_to_200_chars_plus_ellipsis() {
    let content = "b".repeat(250);
    let excerpt = derive_excerpt(&content);
    assert_eq!(excerpt.chars().count(), 203);
    assert!(excerpt.ends_with("..."));
}

#[test]
fn truncation_counts_umlauts_as_single_chars() {
    let content = "ä".repeat(201);
    let excerpt = derive_excerpt(&content);
    assert_eq!(excerpt, format!("{}...", "ä".repeat(200)));
}

// =============================================================================
// Input parsing
// =============================================================================

#[test]
fn input_defaults_priority_and_color() {
    let input: NewsInput = serde_json::from_value(serde_json::json!({
        "title": "Semesterstart",
        "content": "Willkommen!"
    }))
    .unwrap();
    assert_eq!(input.priority, NewsPriority::Medium);
    assert_eq!(input.color, NewsColor::Blue);
    assert!(!input.is_published);
    assert!(!input.is_pinned);
}

#[test]
fn input_rejects_unknown_color() {
    let parsed = serde_json::from_value::<NewsInput>(serde_json::json!({
        "title": "x",
        "content": "y",
        "color": "orange"
    }));
    assert!(parsed.is_err());
}

#[test]
fn enum_strings_match_database_values() {
    assert_eq!(NewsPriority::Urgent.as_str(), "urgent");
    assert_eq!(NewsColor::Slate.as_str(), "slate");
}

// =============================================================================
// Live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn publish_flow_sets_published_at_once() {
    use crate::db::test_support;

    let pool = test_support::integration_pool().await;
    let author = test_support::profile(&pool, "news_author", "editor").await;

    let draft = create_news(
        &pool,
        &author,
        NewsInput {
            title: "Entwurf".into(),
            content: "Text".into(),
            excerpt: None,
            priority: NewsPriority::High,
            color: NewsColor::Gold,
            is_published: false,
            is_pinned: false,
        },
    )
    .await
    .expect("create draft");
    assert!(draft.published_at.is_none());
    assert!(list_news(&pool, true).await.unwrap().iter().all(|n| n.id != draft.id));

    let published = update_news(
        &pool,
        &author,
        draft.id,
        NewsPatch { is_published: Some(true), ..NewsPatch::default() },
    )
    .await
    .expect("publish");
    let first_published_at = published.published_at.expect("published_at set");

    let again = update_news(
        &pool,
        &author,
        draft.id,
        NewsPatch { is_published: Some(true), ..NewsPatch::default() },
    )
    .await
    .expect("republish");
    assert_eq!(again.published_at, Some(first_published_at));

    let viewed = view_news(&pool, draft.id).await.expect("view");
    assert_eq!(viewed.views, 1);
    assert_eq!(viewed.author_name, author.display_name);
}
