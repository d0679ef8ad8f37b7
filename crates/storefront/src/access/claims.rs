//! Session token claims decoding.
//!
//! The access token is a JWT issued by the backend auth service. The guard
//! only reads the payload to route the request; the signature is NOT
//! verified here. Every API call made with the token is verified by the
//! backend, so a forged role claim can at most reveal an empty page shell.

use base64::{
    Engine,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use bazaar_core::Role;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// URL-safe base64 engine that accepts payloads with or without padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors that can occur when decoding a session token.
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// Token does not have the `header.payload.signature` shape.
    #[error("Malformed token: expected 3 segments, found {0}")]
    Malformed(usize),

    /// Payload segment is not valid base64url.
    #[error("Invalid token encoding: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// Payload is not a JSON claims object.
    #[error("Invalid token payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Claims read from the access token payload.
///
/// Only the fields the guard needs are modelled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    #[serde(default)]
    pub sub: Option<String>,
    /// Role claim as issued by the auth service.
    #[serde(default)]
    pub role: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Claims {
    /// Parsed role claim. Unknown or missing roles yield `None`.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|role| role.parse().ok())
    }

    /// Expiry instant, if the token carries a valid `exp` claim.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Returns `true` if the token carries an expiry that is before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}

/// Decode the payload of a JWT without verifying its signature.
///
/// # Errors
///
/// Returns `ClaimsError` if the token is not three dot-separated segments,
/// the payload is not base64url, or the payload is not a JSON object.
pub fn decode_claims(token: &str) -> Result<Claims, ClaimsError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    let [_header, payload, _signature] = segments.as_slice() else {
        return Err(ClaimsError::Malformed(segments.len()));
    };

    let bytes = URL_SAFE_LENIENT.decode(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    /// Build an unsigned token around `payload`.
    pub(crate) fn token_with_payload(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.c2lnbmF0dXJl")
    }

    #[test]
    fn test_decode_claims_reads_role_and_subject() {
        let token = token_with_payload(&serde_json::json!({
            "sub": "user-7",
            "role": "CUSTOMER",
            "exp": 1_900_000_000,
            "iat": 1_800_000_000,
        }));

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("user-7"));
        assert_eq!(claims.role(), Some(Role::Customer));
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_900_000_000);
    }

    #[test]
    fn test_decode_claims_accepts_padded_payload() {
        let header = URL_SAFE_NO_PAD.encode(b"{}");
        let body = base64::engine::general_purpose::URL_SAFE.encode(br#"{"role":"SELLER"}"#);
        let claims = decode_claims(&format!("{header}.{body}.sig")).unwrap();
        assert_eq!(claims.role(), Some(Role::Seller));
    }

    #[test]
    fn test_decode_claims_unknown_role_is_none() {
        let token = token_with_payload(&serde_json::json!({ "role": "ROOT" }));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.role(), None);
    }

    #[test]
    fn test_decode_claims_rejects_wrong_segment_count() {
        let err = decode_claims("not-a-jwt").unwrap_err();
        assert!(matches!(err, ClaimsError::Malformed(1)));

        let err = decode_claims("a.b.c.d").unwrap_err();
        assert!(matches!(err, ClaimsError::Malformed(4)));
    }

    #[test]
    fn test_decode_claims_rejects_bad_base64() {
        let err = decode_claims("aaa.@@@.ccc").unwrap_err();
        assert!(matches!(err, ClaimsError::Encoding(_)));
    }

    #[test]
    fn test_decode_claims_rejects_non_object_payload() {
        let body = URL_SAFE_NO_PAD.encode(b"[1,2,3]");
        let err = decode_claims(&format!("h.{body}.s")).unwrap_err();
        assert!(matches!(err, ClaimsError::Json(_)));
    }

    #[test]
    fn test_is_expired_at() {
        let claims = Claims {
            sub: None,
            role: None,
            exp: Some(1_000),
        };
        let later = DateTime::from_timestamp(2_000, 0).unwrap();
        let earlier = DateTime::from_timestamp(500, 0).unwrap();
        assert!(claims.is_expired_at(later));
        assert!(!claims.is_expired_at(earlier));
    }
}
