use super::*;

fn limiter(per_key_limit: usize, global_limit: usize) -> RateLimiter {
    RateLimiter::with_config(RateLimitConfig {
        per_key_limit,
        per_key_window: Duration::from_secs(600),
        global_limit,
        global_window: Duration::from_secs(60),
    })
}

// =============================================================================
// Per-key limit
// =============================================================================

#[test]
fn per_key_allows_up_to_limit() {
    let rl = limiter(3, 100);
    let now = Instant::now();
    for _ in 0..3 {
        assert!(rl.check_and_record_at("k12345678@students.jku.at", now).is_ok());
    }
}

#[test]
fn per_key_blocks_over_limit() {
    let rl = limiter(3, 100);
    let now = Instant::now();
    for _ in 0..3 {
        rl.check_and_record_at("a@students.jku.at", now).unwrap();
    }
    let err = rl.check_and_record_at("a@students.jku.at", now).unwrap_err();
    assert!(matches!(err, RateLimitError::PerKeyExceeded { limit: 3, window_secs: 600 }));
}

#[test]
fn per_key_independent_keys() {
    let rl = limiter(1, 100);
    let now = Instant::now();
    rl.check_and_record_at("a@students.jku.at", now).unwrap();
    assert!(rl.check_and_record_at("b@students.jku.at", now).is_ok());
}

#[test]
fn per_key_window_expires() {
    let rl = limiter(1, 100);
    let start = Instant::now();
    rl.check_and_record_at("a@students.jku.at", start).unwrap();
    assert!(rl.check_and_record_at("a@students.jku.at", start).is_err());

    let later = start + Duration::from_secs(601);
    assert!(rl.check_and_record_at("a@students.jku.at", later).is_ok());
}

// =============================================================================
// Global limit
// =============================================================================

#[test]
fn global_blocks_over_limit() {
    let rl = limiter(10, 2);
    let now = Instant::now();
    rl.check_and_record_at("a@x", now).unwrap();
    rl.check_and_record_at("b@x", now).unwrap();
    let err = rl.check_and_record_at("c@x", now).unwrap_err();
    assert!(matches!(err, RateLimitError::GlobalExceeded { limit: 2, window_secs: 60 }));
}

#[test]
fn global_rejection_does_not_record_key() {
    let rl = limiter(1, 1);
    let now = Instant::now();
    rl.check_and_record_at("a@x", now).unwrap();
    assert!(rl.check_and_record_at("b@x", now).is_err());

    // After the global window passes, "b" still has its full per-key budget.
    let later = now + Duration::from_secs(61);
    assert!(rl.check_and_record_at("b@x", later).is_ok());
}

// =============================================================================
// Housekeeping
// =============================================================================

#[test]
fn idle_keys_are_pruned_past_threshold() {
    let rl = limiter(1, usize::MAX);
    let start = Instant::now();
    for i in 0..=PRUNE_THRESHOLD {
        rl.check_and_record_at(&format!("user{i}@x"), start).unwrap();
    }
    assert_eq!(rl.tracked_keys(), PRUNE_THRESHOLD + 1);

    let later = start + Duration::from_secs(601);
    rl.check_and_record_at("fresh@x", later).unwrap();
    assert_eq!(rl.tracked_keys(), 1);
}

#[test]
fn default_config_matches_constants() {
    let cfg = RateLimitConfig::default();
    assert_eq!(cfg.per_key_limit, DEFAULT_PER_KEY_LIMIT);
    assert_eq!(cfg.global_limit, DEFAULT_GLOBAL_LIMIT);
    assert_eq!(cfg.per_key_window, Duration::from_secs(DEFAULT_PER_KEY_WINDOW_SECS));
}
