use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a token could not be read as claims. Callers treat every variant as
/// "logged out".
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClaimsError {
    #[error("token has no payload segment")]
    MissingPayload,
    #[error("token payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not a claims object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identity attributes carried by a bearer token.
///
/// Decoded without signature verification; only ever used to toggle UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub", default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    #[must_use]
    pub fn new(subject: impl Into<String>, is_admin: bool) -> Self {
        Self {
            subject: Some(subject.into()),
            is_admin,
            exp: None,
        }
    }

    /// A token without `exp` never expires on the client side.
    #[must_use]
    pub fn is_expired(&self, now_unix: i64) -> bool {
        self.exp.is_some_and(|exp| exp <= now_unix)
    }
}

/// Read the claims of a `header.payload.signature` token.
///
/// # Errors
///
/// Returns `ClaimsError` when the payload segment is missing or does not
/// decode to a JSON claims object.
pub fn decode_claims(token: &str) -> Result<Claims, ClaimsError> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or(ClaimsError::MissingPayload)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}
