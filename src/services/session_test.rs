use super::*;

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a]), "0a");
}

#[test]
fn bytes_to_hex_multi_byte() {
    assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
}

// =============================================================================
// generate_token
// =============================================================================

#[test]
fn generate_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_token_two_calls_differ() {
    assert_ne!(generate_token(), generate_token());
}

// =============================================================================
// hash_token
// =============================================================================

#[test]
fn hash_token_known_vector() {
    assert_eq!(
        hash_token("abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn hash_token_differs_from_token() {
    let token = generate_token();
    let hashed = hash_token(&token);
    assert_eq!(hashed.len(), 64);
    assert_ne!(hashed, token);
}

// =============================================================================
// Live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn session_round_trip_against_live_db() {
    let pool = crate::db::test_support::integration_pool().await;
    let admin_id = crate::db::test_support::insert_admin(&pool, "session_user", "admin").await;

    let token = create_session(&pool, admin_id, 5).await.expect("create_session should succeed");
    let admin = validate_session(&pool, &token)
        .await
        .expect("validate_session should succeed")
        .expect("session should be valid");
    assert_eq!(admin.id, admin_id);
    assert_eq!(admin.role, AdminRole::Admin);

    delete_session(&pool, &token).await.expect("delete_session should succeed");
    assert!(validate_session(&pool, &token).await.expect("query should succeed").is_none());
}
