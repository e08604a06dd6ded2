use chrono::{Duration, Utc};
use reflections_core::ports::PortError;
use reflections_core::AdminSessionManager;

#[test]
fn correct_password_yields_valid_token() {
    let sessions = AdminSessionManager::new("hunter2");

    let session = sessions.authenticate("hunter2").unwrap();
    assert!(sessions.is_valid(&session.token));
}

#[test]
fn wrong_password_is_unauthorized() {
    let sessions = AdminSessionManager::new("hunter2");

    let err = sessions.authenticate("letmein").unwrap_err();
    assert!(matches!(err, PortError::Unauthorized));
}

#[test]
fn unknown_token_is_invalid() {
    let sessions = AdminSessionManager::new("hunter2");

    sessions.authenticate("hunter2").unwrap();
    assert!(!sessions.is_valid("deadbeef"));
}

#[test]
fn token_expires_after_ttl() {
    let sessions = AdminSessionManager::new("hunter2");
    let issued_at = Utc::now();

    let session = sessions.authenticate_at("hunter2", issued_at).unwrap();
    assert_eq!(session.expires_at, issued_at + Duration::hours(24));

    // Just under the TTL the token still authorizes.
    let almost = issued_at + Duration::hours(24) - Duration::seconds(1);
    assert!(sessions.is_valid_at(&session.token, almost));

    // At the expiry instant and beyond it does not.
    assert!(!sessions.is_valid_at(&session.token, session.expires_at));
    assert!(!sessions.is_valid_at(&session.token, session.expires_at + Duration::hours(1)));
}

#[test]
fn expired_tokens_are_purged_on_lookup() {
    let sessions = AdminSessionManager::new("hunter2");
    let issued_at = Utc::now();

    let session = sessions.authenticate_at("hunter2", issued_at).unwrap();
    let later = issued_at + Duration::hours(25);

    assert!(!sessions.is_valid_at(&session.token, later));
    // A second lookup with the original clock must not resurrect it.
    assert!(!sessions.is_valid_at(&session.token, issued_at));
}

#[test]
fn tokens_are_unique_and_long() {
    let sessions = AdminSessionManager::new("hunter2");

    let a = sessions.authenticate("hunter2").unwrap();
    let b = sessions.authenticate("hunter2").unwrap();
    assert_ne!(a.token, b.token);
    // 32 random bytes, hex-encoded.
    assert_eq!(a.token.len(), 64);
    assert!(a.token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn sessions_are_independent_per_manager() {
    let first = AdminSessionManager::new("hunter2");
    let second = AdminSessionManager::new("hunter2");

    let session = first.authenticate("hunter2").unwrap();
    assert!(!second.is_valid(&session.token));
}
