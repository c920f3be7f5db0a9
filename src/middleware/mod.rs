// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (session guard, security headers).

pub mod guard;
pub mod security;

pub use guard::{require_session, CurrentUser};
