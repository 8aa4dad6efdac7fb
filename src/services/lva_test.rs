use super::*;

fn lva(id: i64, count: i64, effort: f64, difficulty: f64) -> Lva {
    Lva {
        id,
        name: format!("LVA {id}"),
        description: None,
        is_active: true,
        ratings: if count == 0 {
            RatingSummary::empty()
        } else {
            RatingSummary::from_aggregates(count, Some(effort), Some(difficulty))
        },
    }
}

// =============================================================================
// band
// =============================================================================

#[test]
fn band_boundaries() {
    assert_eq!(band(1.0, RatingCategory::Effort), ("Niedrig", "green"));
    assert_eq!(band(1.49, RatingCategory::Effort), ("Niedrig", "green"));
    assert_eq!(band(1.5, RatingCategory::Effort), ("Eher niedrig", "lime"));
    assert_eq!(band(2.5, RatingCategory::Effort), ("Durchschnittlich", "yellow"));
    assert_eq!(band(3.5, RatingCategory::Effort), ("Eher hoch", "orange"));
    assert_eq!(band(4.5, RatingCategory::Effort), ("Sehr hoch", "red"));
    assert_eq!(band(5.0, RatingCategory::Effort), ("Sehr hoch", "red"));
}

#[test]
fn band_texts_per_category() {
    assert_eq!(band(1.0, RatingCategory::Difficulty).0, "Gut verständlich");
    assert_eq!(band(5.0, RatingCategory::Difficulty).0, "Extrem anspruchsvoll");
    assert_eq!(band(3.0, RatingCategory::Total).0, "Ausgewogen");
    assert_eq!(band(4.0, RatingCategory::Total).0, "Fordernd");
}

// =============================================================================
// RatingSummary
// =============================================================================

#[test]
fn no_ratings_is_all_null() {
    let summary = RatingSummary::from_aggregates(0, None, None);
    assert_eq!(summary, RatingSummary::empty());
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["rating_count"], 0);
    assert!(json["avg_total"].is_null());
    assert!(json["total_color"].is_null());
}

#[test]
fn averages_round_to_two_decimals() {
    let summary = RatingSummary::from_aggregates(3, Some(7.0 / 3.0), Some(4.0));
    assert_eq!(summary.avg_effort, Some(2.33));
    assert_eq!(summary.avg_difficulty, Some(4.0));
    assert_eq!(summary.avg_total, Some(3.17));
    assert_eq!(summary.effort_text, Some("Eher niedrig"));
    assert_eq!(summary.difficulty_text, Some("Sehr anspruchsvoll"));
    assert_eq!(summary.total_text, Some("Ausgewogen"));
}

#[test]
fn lva_json_flattens_ratings() {
    let json = serde_json::to_value(lva(4, 2, 1.0, 2.0)).unwrap();
    assert_eq!(json["id"], 4);
    assert_eq!(json["rating_count"], 2);
    assert_eq!(json["avg_total"], 1.5);
    assert_eq!(json["total_color"], "lime");
}

// =============================================================================
// rank_top
// =============================================================================

#[test]
fn top_skips_unrated_and_sorts_by_total_then_count() {
    let ranked = rank_top(
        vec![
            lva(1, 0, 0.0, 0.0),
            lva(2, 1, 3.0, 3.0),
            lva(3, 5, 2.0, 2.0),
            lva(4, 9, 2.0, 2.0),
            lva(5, 2, 1.0, 1.0),
        ],
        10,
    );
    let ids: Vec<i64> = ranked.iter().map(|l| l.id).collect();
    assert_eq!(ids, [5, 4, 3, 2]);
}

#[test]
fn top_respects_limit() {
    let ranked = rank_top(vec![lva(1, 1, 1.0, 1.0), lva(2, 1, 2.0, 2.0), lva(3, 1, 3.0, 3.0)], 2);
    assert_eq!(ranked.len(), 2);
}

#[test]
fn input_defaults_to_active() {
    let input: LvaInput = serde_json::from_value(serde_json::json!({ "name": "KS Steuern" })).unwrap();
    assert!(input.is_active);
}

// =============================================================================
// Live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn import_is_idempotent_and_names_unique() {
    use crate::db::test_support;

    let pool = test_support::integration_pool().await;
    let actor = test_support::profile(&pool, "lva_admin", "admin").await;

    let first = import_catalogue(&pool, &actor).await.expect("first import");
    assert_eq!(first.imported, LVA_NAMES.len() as u64);
    let second = import_catalogue(&pool, &actor).await.expect("second import");
    assert_eq!(second.imported, 0);
    assert_eq!(second.skipped, LVA_NAMES.len() as u64);

    let duplicate = create_lva(
        &pool,
        &actor,
        LvaInput { name: LVA_NAMES[0].into(), description: None, is_active: true },
    )
    .await;
    assert!(matches!(duplicate, Err(ContentError::Invalid(ref m)) if m == DUPLICATE_NAME));

    let stats = stats(&pool).await.expect("stats");
    assert_eq!(stats.total, LVA_NAMES.len() as i64);
    assert_eq!(stats.rated, 0);
}
