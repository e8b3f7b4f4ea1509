//! Admin token verification
//!
//! Admin requests carry `Authorization: Bearer <token>`. The configured token
//! is kept only as its SHA-256 digest and compared digest to digest, so the
//! comparison time does not depend on how many leading bytes match.
//!
//! No HTTP framework dependencies here; the axum middleware lives in the
//! service crate.

use sha2::{Digest, Sha256};
use std::fmt;

/// Why an admin request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No Authorization header, or not a Bearer credential
    MissingToken,
    /// Bearer token does not match the configured token
    InvalidToken,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFailure::MissingToken => write!(f, "Missing bearer token"),
            AuthFailure::InvalidToken => write!(f, "Invalid admin token"),
        }
    }
}

impl std::error::Error for AuthFailure {}

/// Configured admin credential
#[derive(Clone)]
pub struct AdminToken {
    digest: [u8; 32],
}

impl AdminToken {
    pub fn new(token: &str) -> Self {
        Self {
            digest: Sha256::digest(token.as_bytes()).into(),
        }
    }

    /// Check a presented token against the configured one
    pub fn verify(&self, presented: &str) -> Result<(), AuthFailure> {
        let presented: [u8; 32] = Sha256::digest(presented.as_bytes()).into();
        let diff = self
            .digest
            .iter()
            .zip(presented.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        if diff == 0 {
            Ok(())
        } else {
            Err(AuthFailure::InvalidToken)
        }
    }
}

impl fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminToken(..)")
    }
}

/// Extract the token from an `Authorization` header value
pub fn bearer_token(header_value: Option<&str>) -> Result<&str, AuthFailure> {
    let value = header_value.ok_or(AuthFailure::MissingToken)?;
    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthFailure::MissingToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthFailure::MissingToken);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthFailure::MissingToken);
    }
    Ok(token)
}
