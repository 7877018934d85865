//! Admin token verification
//!
//! Tokens are compact HS256 JWTs issued by the auth service. Only the
//! signature, `exp` and `role` claims are checked; anything that goes wrong
//! while decoding is a rejection, never an error for the caller.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Role required to use the upload gateway
pub const ADMIN_ROLE: &str = "admin";

/// base64url, padding optional on decode
const BASE64_URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims the gateway cares about
#[derive(Debug, Deserialize)]
pub struct Claims {
    /// Role granted to the bearer
    pub role: Option<String>,
    /// Expiration time (unix seconds)
    pub exp: Option<f64>,
    /// Subject (user ID)
    pub sub: Option<String>,
}

/// Why a token was rejected
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingHeader,
    #[error("Authorization header is not a bearer token")]
    NotBearer,
    #[error("token must have three non-empty segments")]
    Malformed,
    #[error("invalid base64url segment")]
    Encoding(#[from] base64::DecodeError),
    #[error("signature mismatch")]
    BadSignature,
    #[error("invalid claims: {0}")]
    Claims(#[from] serde_json::Error),
    #[error("token expired")]
    Expired,
    #[error("role {0:?} is not admin")]
    NotAdmin(Option<String>),
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Check that the header carries a valid, unexpired admin token
pub fn verify_admin_token(auth_header: Option<&str>, secret: &str) -> bool {
    verify_admin_token_at(auth_header, secret, chrono::Utc::now().timestamp())
}

/// Same as [`verify_admin_token`] with an explicit clock
pub fn verify_admin_token_at(auth_header: Option<&str>, secret: &str, now: i64) -> bool {
    match decode_admin_claims(auth_header, secret, now) {
        Ok(claims) => {
            tracing::debug!(sub = ?claims.sub, "Admin token accepted");
            true
        }
        Err(e) => {
            tracing::debug!("Token validation failed: {}", e);
            false
        }
    }
}

/// Validate an admin token and return its claims
pub fn decode_admin_claims(
    auth_header: Option<&str>,
    secret: &str,
    now: i64,
) -> Result<Claims, AuthError> {
    let header = auth_header.ok_or(AuthError::MissingHeader)?;
    let token = extract_bearer_token(header).ok_or(AuthError::NotBearer)?;

    let mut segments = token.split('.');
    let (header_b64, payload_b64, signature_b64) =
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(h), Some(p), Some(s), None) if !h.is_empty() && !p.is_empty() && !s.is_empty() => {
                (h, p, s)
            }
            _ => return Err(AuthError::Malformed),
        };

    let signature = BASE64_URL.decode(signature_b64)?;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| AuthError::BadSignature)?;
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(payload_b64.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| AuthError::BadSignature)?;

    let payload = BASE64_URL.decode(payload_b64)?;
    let claims: Claims = serde_json::from_slice(&payload)?;

    if let Some(exp) = claims.exp {
        if exp < now as f64 {
            return Err(AuthError::Expired);
        }
    }

    if claims.role.as_deref() != Some(ADMIN_ROLE) {
        return Err(AuthError::NotAdmin(claims.role));
    }

    Ok(claims)
}
