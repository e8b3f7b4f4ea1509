//! Admin authentication middleware
//!
//! Applied to the listing and editing methods of the record routes. Public
//! registration (POST) and location lookups do not pass through here.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use kura_common::api::{bearer_token, AuthFailure};
use tracing::warn;

use crate::{ApiError, AppState};

/// Verified admin context, inserted into the request by [`auth_middleware`]
///
/// Protected handlers take this as an `Extension`, so a handler mounted
/// without the middleware fails loudly instead of running unauthenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    /// True when a token was presented and verified; false when the gate is disabled
    pub verified: bool,
}

/// Authentication middleware
///
/// With no admin token configured every request passes as an unverified
/// session. Otherwise the request needs `Authorization: Bearer <token>`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = match &state.admin_token {
        None => AdminSession { verified: false },
        Some(expected) => {
            let header = request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            bearer_token(header)
                .and_then(|token| expected.verify(token))
                .map_err(|e| {
                    if e == AuthFailure::InvalidToken {
                        warn!("Rejected admin request to {}: {}", request.uri().path(), e);
                    }
                    ApiError::Unauthorized(e.to_string())
                })?;

            AdminSession { verified: true }
        }
    };

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
