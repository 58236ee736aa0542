use jsonwebtoken::{EncodingKey, Header, encode};
use portal_gate::session::{Claims, decode_claims, is_authenticated_at};
use serde_json::json;

// --- Helper Functions ---

const TEST_SECRET: &str = "test-secret-value-1234567890";
const NOW: i64 = 1_750_000_000;

fn sign<T: serde::Serialize>(claims: &T, secret: &str) -> String {
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &key).unwrap()
}

fn token_expiring_at(exp: i64) -> String {
    sign(&Claims { exp: Some(exp as f64) }, TEST_SECRET)
}

// --- Tests ---

#[test]
fn test_missing_or_empty_cookie_is_anonymous() {
    assert!(!is_authenticated_at(None, NOW));
    assert!(!is_authenticated_at(Some(""), NOW));
}

#[test]
fn test_unexpired_token_is_authenticated() {
    let token = token_expiring_at(NOW + 3600);
    assert!(is_authenticated_at(Some(&token), NOW));
}

#[test]
fn test_expired_token_is_anonymous() {
    let token = token_expiring_at(NOW - 1);
    assert!(!is_authenticated_at(Some(&token), NOW));
}

#[test]
fn test_token_expiring_this_second_is_expired() {
    let token = token_expiring_at(NOW);
    assert!(!is_authenticated_at(Some(&token), NOW));
    assert!(is_authenticated_at(Some(&token), NOW - 1));
}

#[test]
fn test_token_without_exp_is_anonymous() {
    let token = sign(&json!({ "sub": "user-1", "role": "student" }), TEST_SECRET);

    let claims = decode_claims(&token).unwrap();
    assert_eq!(claims.exp, None);
    assert!(!is_authenticated_at(Some(&token), NOW));
}

#[test]
fn test_extra_claims_are_ignored() {
    let token = sign(
        &json!({ "sub": "user-1", "iat": NOW - 10, "exp": NOW + 60, "aud": "portal" }),
        TEST_SECRET,
    );

    assert_eq!(decode_claims(&token).unwrap().exp, Some((NOW + 60) as f64));
    assert!(is_authenticated_at(Some(&token), NOW));
}

#[test]
fn test_signature_is_not_verified() {
    // Signed with a key the gate has never seen.
    let token = sign(&Claims { exp: Some((NOW + 60) as f64) }, "some-other-issuer-secret");
    assert!(is_authenticated_at(Some(&token), NOW));

    // Signature bytes replaced outright.
    let (unsigned, _) = token.rsplit_once('.').unwrap();
    let tampered = format!("{unsigned}.AAAA");
    assert!(is_authenticated_at(Some(&tampered), NOW));
}

#[test]
fn test_garbage_tokens_are_anonymous() {
    for garbage in [
        "not-a-token",
        "a.b.c",
        "....",
        "eyJhbGciOiJIUzI1NiJ9",
        "eyJhbGciOiJIUzI1NiJ9.bm90IGpzb24.c2ln",
    ] {
        assert!(decode_claims(garbage).is_err(), "{garbage} should not decode");
        assert!(!is_authenticated_at(Some(garbage), NOW));
    }
}

#[test]
fn test_non_numeric_exp_is_anonymous() {
    let token = sign(&json!({ "exp": "tomorrow" }), TEST_SECRET);
    assert!(!is_authenticated_at(Some(&token), NOW));
}

#[test]
fn test_fractional_exp_is_accepted() {
    let token = sign(&json!({ "exp": 4102444800.0 }), TEST_SECRET);
    assert_eq!(decode_claims(&token).unwrap().exp, Some(4102444800.0));
    assert!(is_authenticated_at(Some(&token), NOW));

    // Same strict comparison: half a second left is still a session.
    let token = sign(&json!({ "exp": NOW as f64 + 0.5 }), TEST_SECRET);
    assert!(is_authenticated_at(Some(&token), NOW));
    assert!(!is_authenticated_at(Some(&token), NOW + 1));

    let token = sign(&json!({ "exp": NOW as f64 - 0.5 }), TEST_SECRET);
    assert!(!is_authenticated_at(Some(&token), NOW));
}

// --- Algorithm Families ---

/// Reuses the payload of an HS256 token under a foreign header. The signature
/// is never checked, so any bytes will do.
fn with_header(encoded_header: &str, signature: &str) -> String {
    let token = sign(&json!({ "exp": NOW + 60 }), TEST_SECRET);
    let payload = token.split('.').nth(1).unwrap();
    format!("{encoded_header}.{payload}.{signature}")
}

#[test]
fn test_rsa_token_is_decoded() {
    // {"alg":"RS256","typ":"JWT"}
    let token = with_header("eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9", "c2ln");
    assert_eq!(decode_claims(&token).unwrap().exp, Some((NOW + 60) as f64));
    assert!(is_authenticated_at(Some(&token), NOW));
}

#[test]
fn test_rsa_pss_token_is_decoded() {
    // {"alg":"PS256","typ":"JWT"}
    let token = with_header("eyJhbGciOiJQUzI1NiIsInR5cCI6IkpXVCJ9", "c2ln");
    assert!(is_authenticated_at(Some(&token), NOW));
}

#[test]
fn test_ecdsa_tokens_are_decoded() {
    // {"alg":"ES256","typ":"JWT"} and {"alg":"ES384","typ":"JWT"}
    for header in [
        "eyJhbGciOiJFUzI1NiIsInR5cCI6IkpXVCJ9",
        "eyJhbGciOiJFUzM4NCIsInR5cCI6IkpXVCJ9",
    ] {
        let token = with_header(header, "c2ln");
        assert!(is_authenticated_at(Some(&token), NOW), "{header}");
    }
}

#[test]
fn test_eddsa_token_is_decoded() {
    // {"alg":"EdDSA","typ":"JWT"}
    let token = with_header("eyJhbGciOiJFZERTQSIsInR5cCI6IkpXVCJ9", "c2ln");
    assert!(is_authenticated_at(Some(&token), NOW));
}

#[test]
fn test_unsigned_none_token_is_anonymous() {
    // {"alg":"none","typ":"JWT"} with an empty signature segment.
    let token = with_header("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0", "");
    assert!(decode_claims(&token).is_err());
    assert!(!is_authenticated_at(Some(&token), NOW));
}
