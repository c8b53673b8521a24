//! Bearer token gate for the resource routes.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::JwtKeys;
use crate::error::{ApiError, AuthError};

/// Rejects the request with 401 unless it carries a valid bearer token.
///
/// On success the verified [`Claims`](crate::auth::Claims) are stored in the
/// request extensions.
pub async fn require_bearer(
    State(keys): State<JwtKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = bearer_token(request.headers())
        .and_then(|token| keys.verify(token))
        .map_err(|err| {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                error = %err,
                "Rejected request"
            );
            ApiError::from(err)
        })?;

    debug!(subject = %claims.sub, "Bearer token accepted");
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MalformedHeader)
}
