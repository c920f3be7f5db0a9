// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session route guard.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::session::{Identity, Session};
use crate::AppState;

/// Identity behind the guarded request, taken from the session
/// snapshot and inserted into request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub identity: Identity,
}

/// Middleware guarding identity-scoped routes.
///
/// While the session is still initializing the answer is pending (503
/// with a Retry-After header) rather than a denial; once the first
/// notification has been reconciled, anonymous callers get 401 and
/// authenticated ones pass through with their identity attached.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match state.session.snapshot() {
        Session::Initializing => Err(AppError::SessionPending),
        Session::Anonymous => Err(AppError::Unauthorized),
        Session::Authenticated { identity, .. } => {
            request.extensions_mut().insert(CurrentUser { identity });
            Ok(next.run(request).await)
        }
    }
}
