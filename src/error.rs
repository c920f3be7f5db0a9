// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::session::{CredentialError, RegisterError, SessionError, StoreError};

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Session is still initializing")]
    SessionPending,

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Profile store error: {0}")]
    Store(#[from] StoreError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<RegisterError> for AppError {
    fn from(error: RegisterError) -> Self {
        match error {
            RegisterError::Credential(e) => AppError::Credential(e),
            RegisterError::ProfileWrite(e) => AppError::Store(e),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::SessionPending => {
                (StatusCode::SERVICE_UNAVAILABLE, "session_pending", None)
            }
            AppError::Credential(e) => credential_response(e),
            AppError::Session(SessionError::Unconfirmed(msg)) => (
                StatusCode::BAD_GATEWAY,
                "signout_unconfirmed",
                Some(msg.clone()),
            ),
            AppError::Store(e) => {
                tracing::error!(error = %e, "Profile store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "store_error", None)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        let mut response = (status, Json(body)).into_response();
        if matches!(self, AppError::SessionPending) {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}

/// Status and body for credential failures. Reset for an unknown email
/// reports not-found, matching what the provider tells the user.
fn credential_response(error: &CredentialError) -> (StatusCode, &'static str, Option<String>) {
    match error {
        CredentialError::EmailInUse => (StatusCode::CONFLICT, "email_in_use", None),
        CredentialError::InvalidEmail => (StatusCode::BAD_REQUEST, "invalid_email", None),
        CredentialError::WeakPassword(reason) => (
            StatusCode::BAD_REQUEST,
            "weak_password",
            Some(reason.clone()),
        ),
        CredentialError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "invalid_credentials", None)
        }
        CredentialError::UnknownEmail => (StatusCode::NOT_FOUND, "unknown_email", None),
        CredentialError::Disabled => (StatusCode::UNAUTHORIZED, "account_disabled", None),
        CredentialError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "rate_limited", None),
        CredentialError::Provider(msg) => {
            tracing::error!(error = %msg, "Identity provider error");
            (StatusCode::BAD_GATEWAY, "identity_provider_error", None)
        }
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
