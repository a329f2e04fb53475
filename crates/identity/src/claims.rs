//! Unverified JWT claims decoding.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use cr_domain::error::{Error, Result};

/// base64url, accepting segments with or without `=` padding.
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Claims
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The subset of identity-token claims this service reads.
///
/// Every field is optional at the decoding stage; presence rules are
/// enforced by [`crate::extract_identity`]. Unknown claims are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default, rename = "cognito:username")]
    pub cognito_username: Option<String>,
    /// Expiry as seconds since the Unix epoch. Issuers may send a
    /// fractional NumericDate, so both integers and floats are accepted.
    #[serde(default)]
    pub exp: Option<f64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Decoding
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Decode `token` against the current clock. See [`decode_at`].
pub fn decode(token: &str) -> Result<Claims> {
    decode_at(token, Utc::now())
}

/// Decode the claims of a JWT without verifying its signature.
///
/// Fails with [`Error::InvalidToken`] when the token does not have three
/// base64url segments, when the header or payload is not a JSON object of
/// the expected shape, or when an `exp` claim is at or before `now`.
pub fn decode_at(token: &str, now: DateTime<Utc>) -> Result<Claims> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = segments.as_slice() else {
        return Err(malformed(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    };

    let _header: serde_json::Map<String, serde_json::Value> = decode_json(header, "header")?;
    let claims: Claims = decode_json(payload, "payload")?;
    SEGMENT_ENGINE
        .decode(signature)
        .map_err(|e| malformed(format!("signature segment: {e}")))?;

    if let Some(exp) = claims.exp {
        // Whole seconds, fraction dropped.
        if exp.trunc() as i64 <= now.timestamp() {
            tracing::debug!(exp, now = now.timestamp(), "rejecting expired id_token");
            return Err(Error::InvalidToken("id_token has expired".into()));
        }
    }

    Ok(claims)
}

fn decode_json<T: DeserializeOwned>(segment: &str, what: &str) -> Result<T> {
    let bytes = SEGMENT_ENGINE
        .decode(segment)
        .map_err(|e| malformed(format!("{what} segment: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| malformed(format!("{what} segment: {e}")))
}

fn malformed(detail: String) -> Error {
    Error::InvalidToken(format!("Invalid id_token: {detail}"))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::TimeZone;

    const SAMPLE_TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
        eyJzdWIiOiJ0ZXN0LXVzZXItaWQiLCJlbWFpbCI6InRlc3RAZXhhbXBsZS5jb20iLCJuYW1lIjoidGVzdC11c2VyIn0.\
        sample-signature";

    fn token_with(payload: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.c2lnbmF0dXJl")
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn decodes_sample_token_without_verifying_signature() {
        let claims = decode(SAMPLE_TOKEN).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("test-user-id"));
        assert_eq!(claims.email.as_deref(), Some("test@example.com"));
        assert_eq!(claims.name.as_deref(), Some("test-user"));
        assert!(claims.exp.is_none());
    }

    #[test]
    fn reads_cognito_username_claim() {
        let token = token_with(serde_json::json!({
            "sub": "u-1",
            "email": "a@b.c",
            "cognito:username": "cog",
            "token_use": "id"
        }));
        let claims = decode(&token).unwrap();
        assert_eq!(claims.cognito_username.as_deref(), Some("cog"));
    }

    #[test]
    fn single_segment_is_invalid() {
        let err = decode("invalid-token").unwrap_err();
        assert!(matches!(err, Error::InvalidToken(_)));
        assert!(err.to_string().starts_with("Invalid id_token: "));
    }

    #[test]
    fn too_many_segments_is_invalid() {
        let err = decode("a.b.c.d").unwrap_err();
        assert!(matches!(err, Error::InvalidToken(_)));
    }

    #[test]
    fn non_base64_payload_is_invalid() {
        let err = decode("eyJhbGciOiJIUzI1NiJ9.!!!.sig").unwrap_err();
        assert!(err.to_string().contains("payload segment"));
    }

    #[test]
    fn non_object_payload_is_invalid() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let body = URL_SAFE_NO_PAD.encode(br#""just a string""#);
        let err = decode(&format!("{header}.{body}.")).unwrap_err();
        assert!(matches!(err, Error::InvalidToken(_)));
    }

    #[test]
    fn wrongly_typed_claim_is_invalid() {
        let token = token_with(serde_json::json!({ "sub": "u", "email": 42 }));
        assert!(matches!(decode(&token), Err(Error::InvalidToken(_))));
    }

    #[test]
    fn elapsed_expiry_is_rejected() {
        let token = token_with(serde_json::json!({ "sub": "u", "exp": 1_000 }));
        let err = decode_at(&token, at(2_000)).unwrap_err();
        assert_eq!(err.to_string(), "id_token has expired");
    }

    #[test]
    fn expiry_equal_to_now_is_rejected() {
        let token = token_with(serde_json::json!({ "sub": "u", "exp": 1_000 }));
        assert!(decode_at(&token, at(1_000)).is_err());
    }

    #[test]
    fn future_expiry_is_accepted() {
        let token = token_with(serde_json::json!({ "sub": "u", "exp": 5_000 }));
        let claims = decode_at(&token, at(2_000)).unwrap();
        assert_eq!(claims.exp, Some(5_000.0));
    }

    #[test]
    fn fractional_expiry_in_the_future_is_accepted() {
        let token = token_with(serde_json::json!({ "sub": "u", "exp": 9_999_999_999.5 }));
        let claims = decode_at(&token, at(2_000_000_000)).unwrap();
        assert_eq!(claims.exp, Some(9_999_999_999.5));
    }

    #[test]
    fn fractional_expiry_in_the_past_is_rejected() {
        let token = token_with(serde_json::json!({ "sub": "u", "exp": 1_000.9 }));
        let err = decode_at(&token, at(1_000)).unwrap_err();
        assert_eq!(err.to_string(), "id_token has expired");
    }

    #[test]
    fn string_expiry_is_invalid() {
        let token = token_with(serde_json::json!({ "sub": "u", "exp": "soon" }));
        let err = decode_at(&token, at(1_000)).unwrap_err();
        assert!(err.to_string().starts_with("Invalid id_token: "));
    }
}
