//! Access-token inspection.
//!
//! Tokens are JWTs. Only the payload segment is read; the signature is the
//! server's business. A token that cannot be read counts as expired.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by a StaffDesk access token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the account email).
    #[serde(default)]
    pub sub: Option<String>,
    /// Account id.
    #[serde(default)]
    pub id: Option<String>,
    /// Account role.
    #[serde(default)]
    pub role: Option<String>,
    /// Expiry, seconds since the Unix epoch. Some issuers send fractions.
    #[serde(default)]
    pub exp: Option<f64>,
}

/// Why a token could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Malformed,
    #[error("token payload is not base64url: {0}")]
    Encoding(String),
    #[error("token payload is not a JSON claims object: {0}")]
    Claims(String),
}

/// Decode the payload segment of a JWT.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut parts = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };

    // Some issuers pad the segment anyway.
    let payload = payload.trim_end_matches('=');
    let decoded = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| TokenError::Encoding(e.to_string()))?;

    serde_json::from_slice(&decoded).map_err(|e| TokenError::Claims(e.to_string()))
}

/// True when the token must not be sent.
///
/// Expired means `exp < now`. A token without `exp`, or one that does not
/// decode, is treated as expired.
#[must_use]
pub fn is_expired(token: &str, now_unix: i64) -> bool {
    match decode_claims(token) {
        Ok(Claims { exp: Some(exp), .. }) => exp < now_unix as f64,
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(error = %e, "Unreadable token treated as expired");
            true
        }
    }
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}
