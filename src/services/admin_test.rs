use super::*;
use crate::state::test_helpers;

fn profile(role: AdminRole, is_master: bool) -> AdminProfile {
    AdminProfile {
        id: 7,
        username: "tester".into(),
        email: "tester@oeh.jku.at".into(),
        display_name: "Tester".into(),
        role,
        is_master,
        is_active: true,
    }
}

// =============================================================================
// AdminRole
// =============================================================================

#[test]
fn role_parse_round_trips_known_values() {
    for role in [AdminRole::Master, AdminRole::Admin, AdminRole::Editor] {
        assert_eq!(AdminRole::parse(role.as_str()), Some(role));
    }
}

#[test]
fn role_parse_rejects_unknown() {
    assert_eq!(AdminRole::parse("superuser"), None);
    assert_eq!(AdminRole::parse("Admin"), None);
}

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_value(AdminRole::Editor).unwrap(), serde_json::json!("editor"));
}

#[test]
fn new_admin_defaults_to_admin_role() {
    let input: NewAdmin = serde_json::from_value(serde_json::json!({
        "username": "anna",
        "email": "anna@oeh.jku.at",
        "password": "longenough",
        "display_name": "Anna"
    }))
    .unwrap();
    assert_eq!(input.role, AdminRole::Admin);
}

// =============================================================================
// AdminProfile
// =============================================================================

#[test]
fn profile_permissions_by_role() {
    assert!(profile(AdminRole::Master, true).can_manage_admins());
    assert!(profile(AdminRole::Admin, false).can_manage_admins());
    assert!(!profile(AdminRole::Editor, false).can_manage_admins());
    assert!(profile(AdminRole::Master, true).is_master_role());
    assert!(!profile(AdminRole::Admin, false).is_master_role());
}

#[test]
fn profile_json_shape_matches_me_endpoint() {
    let json = serde_json::to_value(profile(AdminRole::Admin, false)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": 7,
            "username": "tester",
            "email": "tester@oeh.jku.at",
            "display_name": "Tester",
            "role": "admin",
            "is_master": false
        })
    );
}

// =============================================================================
// Validation and permission checks that reject before touching the database
// =============================================================================

#[test]
fn validate_password_enforces_minimum_length() {
    assert!(matches!(validate_password("short"), Err(AdminError::Invalid(_))));
    assert!(validate_password("12345678").is_ok());
    // Counted in characters, not bytes.
    assert!(matches!(validate_password("äöüäöü"), Err(AdminError::Invalid(_))));
}

#[tokio::test]
async fn master_cannot_change_password() {
    let pool = test_helpers::lazy_pool();
    let err = change_password(&pool, &profile(AdminRole::Master, true), "old", "newpassword")
        .await
        .unwrap_err();
    match err {
        AdminError::Forbidden(msg) => assert!(msg.contains("Astra Capital")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn editor_cannot_list_admins() {
    let pool = test_helpers::lazy_pool();
    let err = list_admins(&pool, &profile(AdminRole::Editor, false)).await.unwrap_err();
    assert!(matches!(err, AdminError::Forbidden("Keine Berechtigung")));
}

#[tokio::test]
async fn non_master_cannot_create_admin() {
    let pool = test_helpers::lazy_pool();
    let input = NewAdmin {
        username: "bob".into(),
        email: "bob@oeh.jku.at".into(),
        password: "longenough".into(),
        display_name: "Bob".into(),
        role: AdminRole::Editor,
    };
    let err = create_admin(&pool, &profile(AdminRole::Admin, false), input).await.unwrap_err();
    assert!(matches!(err, AdminError::Forbidden("Nur Master-Admin kann Admins erstellen")));
}

#[tokio::test]
async fn master_cannot_create_second_master() {
    let pool = test_helpers::lazy_pool();
    let input = NewAdmin {
        username: "boss2".into(),
        email: "boss2@oeh.jku.at".into(),
        password: "longenough".into(),
        display_name: "Boss".into(),
        role: AdminRole::Master,
    };
    let err = create_admin(&pool, &profile(AdminRole::Master, true), input).await.unwrap_err();
    assert!(matches!(err, AdminError::Invalid(_)));
}

#[tokio::test]
async fn create_admin_rejects_malformed_email() {
    let pool = test_helpers::lazy_pool();
    let input = NewAdmin {
        username: "carl".into(),
        email: "not-an-email".into(),
        password: "longenough".into(),
        display_name: "Carl".into(),
        role: AdminRole::Admin,
    };
    let err = create_admin(&pool, &profile(AdminRole::Master, true), input).await.unwrap_err();
    assert!(matches!(err, AdminError::Invalid(ref m) if m == "Ungültige E-Mail-Adresse"));
}

#[tokio::test]
async fn non_master_cannot_delete_admin() {
    let pool = test_helpers::lazy_pool();
    let err = delete_admin(&pool, &profile(AdminRole::Admin, false), 3).await.unwrap_err();
    assert!(matches!(err, AdminError::Forbidden("Nur Master-Admin kann Admins löschen")));
}

// =============================================================================
// Live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn master_admin_is_created_then_resynced() {
    let pool = crate::db::test_support::integration_pool().await;
    let mut config = AppConfig::for_tests();
    config.master_password = Some("first-password".into());
    ensure_master_admin(&pool, &config).await.expect("create master");

    let (_, admin) = login(&pool, "masteradmin", "first-password", 5).await.expect("login should work");
    assert!(admin.is_master);

    config.master_password = Some("second-password".into());
    config.master_username = "renamed".into();
    ensure_master_admin(&pool, &config).await.expect("resync master");

    assert!(matches!(
        login(&pool, "renamed", "first-password", 5).await,
        Err(AdminError::InvalidCredentials)
    ));
    let (_, admin) = login(&pool, "master@oeh.jku.at", "second-password", 5)
        .await
        .expect("login by email should work");
    assert_eq!(admin.username, "renamed");
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn deactivated_admin_cannot_log_in() {
    let pool = crate::db::test_support::integration_pool().await;
    let id = crate::db::test_support::insert_admin(&pool, "sleepy", "admin").await;
    sqlx::query("UPDATE admins SET is_active = FALSE WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let err = login(&pool, "sleepy", crate::db::test_support::TEST_PASSWORD, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Deactivated));
}
