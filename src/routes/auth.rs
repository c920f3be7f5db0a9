// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account and session routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::UserProfile;
use crate::services::password;
use crate::session::{Identity, ProfileState, Session};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/session", get(get_session))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/reset", post(request_reset))
        .route("/auth/password-check", post(password_check))
}

/// Identity as exposed over the API.
#[derive(Serialize)]
pub struct IdentityResponse {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl From<Identity> for IdentityResponse {
    fn from(identity: Identity) -> Self {
        Self {
            uid: identity.uid,
            email: identity.email,
            display_name: identity.display_name,
        }
    }
}

// ─── Session Snapshot ────────────────────────────────────────

/// Session snapshot returned by `GET /session`.
#[derive(Serialize)]
pub struct SessionResponse {
    pub loading: bool,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<IdentityResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_state: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        match session {
            Session::Initializing => Self {
                loading: true,
                authenticated: false,
                identity: None,
                profile_state: None,
                profile: None,
            },
            Session::Anonymous => Self {
                loading: false,
                authenticated: false,
                identity: None,
                profile_state: None,
                profile: None,
            },
            Session::Authenticated { identity, profile } => {
                let (profile_state, profile) = match profile {
                    ProfileState::Loading => ("loading", None),
                    ProfileState::Ready(profile) => ("ready", Some(profile)),
                    ProfileState::Unavailable => ("unavailable", None),
                };
                Self {
                    loading: false,
                    authenticated: true,
                    identity: Some(identity.into()),
                    profile_state: Some(profile_state),
                    profile,
                }
            }
        }
    }
}

/// Current session snapshot. Public: the UI polls this while anonymous
/// and during startup.
async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    Json(state.session.snapshot().into())
}

// ─── Account Operations ──────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
}

/// Create an account and sign it in.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<IdentityResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let display_name = payload.display_name.trim();
    if display_name.is_empty() {
        return Err(AppError::BadRequest(
            "display_name must not be blank".to_string(),
        ));
    }

    let identity = state
        .session
        .register(&payload.email, &payload.password, display_name)
        .await?;
    Ok((StatusCode::CREATED, Json(identity.into())))
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Sign in with email and password.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<IdentityResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let identity = state
        .session
        .authenticate(&payload.email, &payload.password)
        .await?;
    Ok(Json(identity.into()))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub signed_out: bool,
}

/// Sign out. Local state is cleared only once the provider confirms.
async fn logout(State(state): State<Arc<AppState>>) -> Result<Json<LogoutResponse>> {
    state.session.terminate().await?;
    Ok(Json(LogoutResponse { signed_out: true }))
}

#[derive(Deserialize, Validate)]
pub struct ResetRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub sent: bool,
}

/// Ask the provider to send a password-reset message.
async fn request_reset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetRequest>,
) -> Result<Json<ResetResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    state.session.request_password_reset(&payload.email).await?;
    Ok(Json(ResetResponse { sent: true }))
}

#[derive(Deserialize)]
pub struct PasswordCheckRequest {
    pub password: String,
}

/// Advisory strength report for the registration form's meter.
async fn password_check(
    Json(payload): Json<PasswordCheckRequest>,
) -> Json<password::StrengthReport> {
    Json(password::evaluate(&payload.password))
}
