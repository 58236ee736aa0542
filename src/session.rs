use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header, errors::Result};
use serde::{Deserialize, Serialize};

/// Claims
///
/// The only part of the session token payload the gate reads. Any other
/// claims the issuer puts in the token are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Expiration Time (exp): seconds since the Unix epoch. A NumericDate may
    /// carry a fraction, so any JSON number is accepted. A token without it
    /// never counts as a session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<f64>,
}

/// decode_claims
///
/// Decodes the token payload **without verifying its signature**. The issuer's
/// key is not available at this layer; the backend that owns the session is
/// responsible for real verification.
///
/// Only structure is checked here: three segments, a parseable header naming
/// a known algorithm, and a JSON object payload.
pub fn decode_claims(token: &str) -> Result<Claims> {
    // 1. The header names the algorithm, which fixes the key family the
    //    decoder expects. The key material itself is never used.
    let header = decode_header(token)?;
    let key = placeholder_key(header.alg)?;

    // 2. Structural decoding only: no signature, no registered-claim checks.
    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    Ok(decode::<Claims>(token, &key, &validation)?.claims)
}

/// A key of the family `alg` belongs to, with throwaway material.
fn placeholder_key(alg: Algorithm) -> Result<DecodingKey> {
    match alg {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            Ok(DecodingKey::from_secret(&[]))
        }
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_components("AA", "AA"),
        Algorithm::EdDSA => DecodingKey::from_ed_components("AA"),
        // RS* and PS*
        _ => DecodingKey::from_rsa_components("AQAB", "AQAB"),
    }
}

/// is_authenticated_at
///
/// Session validity check against an explicit clock reading.
///
/// *Fail-closed*: a missing cookie, an undecodable token, or a payload without
/// `exp` all mean "not authenticated". A token expiring exactly at `now` is
/// already expired.
pub fn is_authenticated_at(token: Option<&str>, now: i64) -> bool {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return false;
    };

    match decode_claims(token) {
        Ok(Claims { exp: Some(exp) }) => exp > now as f64,
        Ok(Claims { exp: None }) => {
            tracing::debug!("session token has no exp claim");
            false
        }
        Err(e) => {
            tracing::debug!(error = %e, "session token could not be decoded");
            false
        }
    }
}
