//! Claim extraction from the backend-issued session token.
//!
//! The token is a signed JWT, but the signature is the backend's business:
//! the client only splits out the payload segment, checks that the claims it
//! needs are present, and compares the expiry against the current time.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use crate::de_opt_string_or_number;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Malformed,
    #[error("token payload is not valid base64url")]
    Encoding,
    #[error("token payload is not valid JSON")]
    Payload,
    #[error("token is missing required claim `{0}`")]
    MissingClaim(&'static str),
    #[error("token expired")]
    Expired,
}

/// Role carried in the `level` claim. Anything other than the literal
/// `"ADMIN"` grants no administrative capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Admin,
    Staff,
}

impl AccessLevel {
    pub fn from_claim(claim: &str) -> Self {
        if claim == "ADMIN" {
            AccessLevel::Admin
        } else {
            AccessLevel::Staff
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, AccessLevel::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::Admin => "ADMIN",
            AccessLevel::Staff => "STAFF",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: String,
    pub level: AccessLevel,
    /// Seconds since the Unix epoch.
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(rename = "userId", default, deserialize_with = "de_opt_string_or_number")]
    user_id: Option<String>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Decode the payload segment and check the required claims are present.
/// Does not look at the expiry; see [`validate`].
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(TokenError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::Encoding)?;
    let raw: RawClaims = serde_json::from_slice(&bytes).map_err(|_| TokenError::Payload)?;

    let user_id = raw.user_id.ok_or(TokenError::MissingClaim("userId"))?;
    let level = raw.level.ok_or(TokenError::MissingClaim("level"))?;
    let exp = raw.exp.ok_or(TokenError::MissingClaim("exp"))?;

    Ok(TokenClaims {
        user_id,
        level: AccessLevel::from_claim(&level),
        exp,
    })
}

/// Decode and additionally require the expiry to be in the future.
pub fn validate(token: &str, now_secs: i64) -> Result<TokenClaims, TokenError> {
    let claims = decode_claims(token)?;
    if claims.exp <= now_secs {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(payload: serde_json::Value) -> String {
        format!("header.{}.signature", URL_SAFE_NO_PAD.encode(payload.to_string()))
    }

    #[test]
    fn test_valid_token() {
        let token = token_with(serde_json::json!({
            "userId": "42",
            "level": "ADMIN",
            "exp": 2_000_000_000i64,
        }));

        let claims = validate(&token, 1_000_000_000).unwrap();
        assert_eq!(claims.user_id, "42");
        assert_eq!(claims.level, AccessLevel::Admin);
        assert_eq!(claims.exp, 2_000_000_000);
    }

    #[test]
    fn test_numeric_user_id_claim() {
        let token = token_with(serde_json::json!({
            "userId": 42,
            "level": "ADMIN",
            "exp": 2_000_000_000i64,
        }));

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.user_id, "42");
    }

    #[test]
    fn test_non_admin_level_maps_to_staff() {
        for level in ["STAFF", "TEACHER", "admin", ""] {
            let token = token_with(serde_json::json!({
                "userId": "7",
                "level": level,
                "exp": 2_000_000_000i64,
            }));
            let claims = decode_claims(&token).unwrap();
            assert_eq!(claims.level, AccessLevel::Staff, "level {level:?}");
            assert!(!claims.level.is_admin());
        }
    }

    #[test]
    fn test_expired_token() {
        let token = token_with(serde_json::json!({
            "userId": "7",
            "level": "STAFF",
            "exp": 1_000i64,
        }));

        assert_eq!(validate(&token, 2_000), Err(TokenError::Expired));
        // Boundary: exp equal to now also counts as expired.
        assert_eq!(validate(&token, 1_000), Err(TokenError::Expired));
        assert!(validate(&token, 999).is_ok());
    }

    #[test]
    fn test_missing_claims() {
        let missing_user = token_with(serde_json::json!({"level": "ADMIN", "exp": 2_000_000_000i64}));
        assert_eq!(
            decode_claims(&missing_user),
            Err(TokenError::MissingClaim("userId"))
        );

        let missing_level = token_with(serde_json::json!({"userId": "1", "exp": 2_000_000_000i64}));
        assert_eq!(
            decode_claims(&missing_level),
            Err(TokenError::MissingClaim("level"))
        );

        let missing_exp = token_with(serde_json::json!({"userId": "1", "level": "STAFF"}));
        assert_eq!(decode_claims(&missing_exp), Err(TokenError::MissingClaim("exp")));
    }

    #[test]
    fn test_malformed_tokens() {
        assert_eq!(decode_claims(""), Err(TokenError::Malformed));
        assert_eq!(decode_claims("only.two"), Err(TokenError::Malformed));
        assert_eq!(decode_claims("a.b.c.d"), Err(TokenError::Malformed));
        assert_eq!(decode_claims("a.%%%.c"), Err(TokenError::Encoding));

        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode("not json"));
        assert_eq!(decode_claims(&not_json), Err(TokenError::Payload));
    }

    #[test]
    fn test_access_level_display() {
        assert_eq!(AccessLevel::Admin.to_string(), "ADMIN");
        assert_eq!(AccessLevel::Staff.to_string(), "STAFF");
        assert!(AccessLevel::Admin.is_admin());
    }
}
