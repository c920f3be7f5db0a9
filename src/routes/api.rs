// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the signed-in user's own profile.

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Theme, UserProfile};
use crate::session::{ProfileState, Session};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Profile routes (require an authenticated session).
/// The session guard is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/me/preferences", put(update_preferences))
}

// ─── Current User ────────────────────────────────────────────

/// Current user response. `profile` is present only once the record
/// has loaded; `profile_state` says where the load stands.
#[derive(Serialize)]
pub struct MeResponse {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub profile_state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

/// Get the signed-in user. Answers 200 even while the profile record
/// is still loading or unavailable; the identity alone is enough to
/// render the account menu.
async fn get_me(State(state): State<Arc<AppState>>) -> Result<Json<MeResponse>> {
    match state.session.snapshot() {
        Session::Authenticated { identity, profile } => {
            let (profile_state, profile) = match profile {
                ProfileState::Loading => ("loading", None),
                ProfileState::Ready(profile) => ("ready", Some(profile)),
                ProfileState::Unavailable => ("unavailable", None),
            };
            Ok(Json(MeResponse {
                uid: identity.uid,
                email: identity.email,
                display_name: identity.display_name,
                profile_state,
                profile,
            }))
        }
        // The guard admitted the request, but the session can sign out
        // underneath it.
        _ => Err(AppError::Unauthorized),
    }
}

// ─── Preferences ─────────────────────────────────────────────

/// Partial preferences update. Absent fields keep their stored value.
#[derive(Deserialize, Validate)]
pub struct UpdatePreferencesRequest {
    pub notifications: Option<bool>,
    pub theme: Option<Theme>,
    #[validate(length(min = 2, max = 16))]
    pub language: Option<String>,
}

/// Update the user's preferences.
/// We fetch-modify-write to preserve the rest of the record.
async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UpdatePreferencesRequest>,
) -> Result<Json<UserProfile>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let uid = &user.identity.uid;
    let mut profile = state
        .store
        .read_profile(uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {uid} not found")))?;

    if let Some(notifications) = payload.notifications {
        profile.preferences.notifications = notifications;
    }
    if let Some(theme) = payload.theme {
        profile.preferences.theme = theme;
    }
    if let Some(language) = payload.language {
        profile.preferences.language = language;
    }

    state.store.write_profile(&profile).await?;
    // Refresh the published snapshot with the stored copy.
    if let Err(error) = state.session.load_profile(uid).await {
        tracing::warn!(uid = %uid, error = %error, "snapshot refresh after preferences update failed");
    }

    tracing::info!(uid = %uid, "preferences updated");
    Ok(Json(profile))
}
