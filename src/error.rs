//! Error types for the inventory service
//!
//! Provides unified error handling using thiserror. Each layer has its own
//! error enum; `ApiError` is the only one that reaches the client.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Message returned to clients for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

// == Cache Error Enum ==
/// Failures raised by the cache adapter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Key or value rejected by the backend
    #[error("Invalid cache request: {0}")]
    InvalidRequest(String),

    /// Backend could not be reached or refused the operation
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

// == Store Error Enum ==
/// Failures raised by the record store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No record with the requested id
    #[error("{resource} with id {id} not found")]
    NotFound { resource: &'static str, id: u64 },

    /// Payload rejected by a store-level constraint (e.g. dangling reference)
    #[error("{field}: {message}")]
    Invalid { field: &'static str, message: String },

    /// Backend failure unrelated to the request data
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Builds the error used when a referenced record does not exist.
    pub fn dangling_reference(field: &'static str, id: u64) -> Self {
        Self::Invalid {
            field,
            message: format!("Invalid pk \"{}\" - object does not exist.", id),
        }
    }
}

// == Auth Error Enum ==
/// Failures raised by the bearer-token gate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// No Authorization header on the request
    #[error("Authentication credentials were not provided")]
    MissingCredentials,

    /// Header present but not a usable bearer token
    #[error("Malformed Authorization header")]
    MalformedHeader,

    /// Token failed signature or claim validation
    #[error("Given token not valid: {0}")]
    InvalidToken(String),

    /// Token past its `exp` claim
    #[error("Token is expired")]
    Expired,

    /// Token could not be minted
    #[error("Failed to issue token: {0}")]
    Issue(String),
}

// == Api Error Enum ==
/// Error type surfaced by HTTP handlers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request payload failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Missing or rejected bearer credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other store or cache failure; detail is logged, never returned
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StoreError::Invalid { .. } => ApiError::Validation(err.to_string()),
            StoreError::Unavailable(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Issue(_) => ApiError::Internal(err.to_string()),
            _ => ApiError::Unauthorized(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            ),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for handlers and controllers.
pub type Result<T> = std::result::Result<T, ApiError>;
