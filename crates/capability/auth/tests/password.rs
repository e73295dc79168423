use uadm_auth::{AuthError, hash_password, validate_password, verify_password};

#[test]
fn argon2_hash_verifies() {
    let hash = hash_password("admin123").expect("hash");
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password(&hash, "admin123").expect("check"));
}

#[test]
fn wrong_password_rejected() {
    let hash = hash_password("admin123").expect("hash");
    assert!(!verify_password(&hash, "bad-password").expect("check"));
}

#[test]
fn short_password_rejected() {
    let err = hash_password("abc").expect_err("too short");
    assert!(matches!(err, AuthError::InvalidPassword { min: 6, .. }));
    assert!(validate_password(&"x".repeat(256)).is_err());
    assert!(validate_password("secret").is_ok());
}

#[test]
fn malformed_hash_is_internal_error() {
    let err = verify_password("plaintext", "admin123").expect_err("not a phc string");
    assert!(matches!(err, AuthError::Internal(_)));
}
