use super::*;

// =============================================================================
// env_bool: unique env var names avoid races with parallel tests.
// =============================================================================

#[test]
fn env_bool_true_variants() {
    for (i, val) in ["1", "true", "yes", "on"].iter().enumerate() {
        let key = format!("__TEST_OEH_EB_TRUE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(true), "expected true for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_false_variants() {
    for (i, val) in ["0", "false", "no", "off"].iter().enumerate() {
        let key = format!("__TEST_OEH_EB_FALSE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(false), "expected false for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_case_insensitive_and_trimmed() {
    let key = "__TEST_OEH_EB_CI_301__";
    unsafe { std::env::set_var(key, "  YES ") };
    assert_eq!(env_bool(key), Some(true));
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_bool_invalid_returns_none() {
    let key = "__TEST_OEH_EB_INVALID_302__";
    unsafe { std::env::set_var(key, "maybe") };
    assert_eq!(env_bool(key), None);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_bool_unset_returns_none() {
    assert_eq!(env_bool("__TEST_OEH_EB_SURELY_UNSET_303__"), None);
}

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_reads_valid_number() {
    let key = "__TEST_OEH_EP_VALID_401__";
    unsafe { std::env::set_var(key, "42") };
    assert_eq!(env_parse::<u32>(key, 7), 42);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_falls_back_on_garbage() {
    let key = "__TEST_OEH_EP_BAD_402__";
    unsafe { std::env::set_var(key, "lots") };
    assert_eq!(env_parse::<u32>(key, 7), 7);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_falls_back_when_unset() {
    assert_eq!(env_parse::<i64>("__TEST_OEH_EP_UNSET_403__", 480), 480);
}

// =============================================================================
// parse_domains
// =============================================================================

#[test]
fn parse_domains_splits_and_trims() {
    assert_eq!(
        parse_domains(" @students.jku.at , @jku.at,,"),
        vec!["@students.jku.at".to_owned(), "@jku.at".to_owned()]
    );
}

#[test]
fn parse_domains_lowercases() {
    assert_eq!(parse_domains("@Students.JKU.at"), vec!["@students.jku.at".to_owned()]);
}

#[test]
fn parse_domains_empty_input_is_empty() {
    assert!(parse_domains("  ").is_empty());
}

// =============================================================================
// MailConfig
// =============================================================================

#[test]
fn mail_sender_includes_display_name() {
    let mail = MailConfig {
        api_key: "re_test".into(),
        from_address: "noreply@oehwirtschaft.at".into(),
        from_name: "ÖH Wirtschaft".into(),
    };
    assert_eq!(mail.sender(), "ÖH Wirtschaft <noreply@oehwirtschaft.at>");
}

#[test]
fn mail_sender_without_name_is_bare_address() {
    let mail = MailConfig {
        api_key: "re_test".into(),
        from_address: "noreply@oehwirtschaft.at".into(),
        from_name: String::new(),
    };
    assert_eq!(mail.sender(), "noreply@oehwirtschaft.at");
}

#[test]
fn test_config_has_default_domain() {
    let config = AppConfig::for_tests();
    assert_eq!(config.allowed_email_domains, vec!["@students.jku.at".to_owned()]);
    assert_eq!(config.code_ttl_minutes, 30);
    assert!(config.mail.is_none());
}
