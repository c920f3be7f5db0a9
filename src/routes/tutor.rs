// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI tutor chat route.

use crate::error::{AppError, Result};
use crate::services::TutorService;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Tutor routes (require an authenticated session).
/// The session guard is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/tutor", get(greeting).post(chat))
}

#[derive(Deserialize, Validate)]
pub struct TutorRequest {
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    /// Optional course context; the reply weaves the title in.
    #[serde(default)]
    pub course_id: Option<u32>,
}

#[derive(Serialize)]
pub struct TutorResponse {
    pub reply: String,
}

/// Opening message for a fresh chat panel.
async fn greeting() -> Json<TutorResponse> {
    Json(TutorResponse {
        reply: TutorService::GREETING.to_string(),
    })
}

/// Answer a tutor message. An unknown `course_id` is treated as no
/// context rather than an error; the context is advisory only.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TutorRequest>,
) -> Result<Json<TutorResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let course_title = payload
        .course_id
        .and_then(|id| state.catalog.get(id))
        .map(|course| course.title.clone());

    Ok(Json(TutorResponse {
        reply: state.tutor.reply(&payload.message, course_title.as_deref()),
    }))
}
