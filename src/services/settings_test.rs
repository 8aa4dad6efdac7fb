use super::*;
use crate::services::admin::AdminRole;
use crate::state::test_helpers;

fn actor(role: AdminRole) -> AdminProfile {
    AdminProfile {
        id: 3,
        username: "settings".into(),
        email: "settings@oeh.jku.at".into(),
        display_name: "Settings".into(),
        role,
        is_master: role == AdminRole::Master,
        is_active: true,
    }
}

#[test]
fn recipients_are_trimmed_and_blanks_dropped() {
    assert_eq!(
        split_recipients(" a@oeh.jku.at, ,b@oeh.jku.at,"),
        ["a@oeh.jku.at".to_owned(), "b@oeh.jku.at".to_owned()]
    );
    assert!(split_recipients("  ").is_empty());
}

#[test]
fn update_body_value_is_optional() {
    let update: SettingUpdate = serde_json::from_value(serde_json::json!({})).unwrap();
    assert!(update.value.is_none());
}

#[tokio::test]
async fn only_master_may_write() {
    let pool = test_helpers::lazy_pool();
    let err = set(&pool, &actor(AdminRole::Admin), CONTACT_EMAILS_KEY, Some("x@y.at".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Forbidden(m) if m == MASTER_ONLY));
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn set_then_get_round_trips_and_overwrites() {
    let pool = crate::db::test_support::integration_pool().await;
    let master = actor(AdminRole::Master);
    let master = AdminProfile { id: crate::db::test_support::insert_admin(&pool, "settings_master", "master").await, ..master };

    assert_eq!(get(&pool, CONTACT_EMAILS_KEY).await.unwrap().value, None);

    set(&pool, &master, CONTACT_EMAILS_KEY, Some("a@oeh.jku.at".into())).await.unwrap();
    set(&pool, &master, CONTACT_EMAILS_KEY, Some("a@oeh.jku.at, b@oeh.jku.at".into())).await.unwrap();

    assert_eq!(contact_recipients(&pool).await.unwrap().len(), 2);
}
