// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! LearnSphere companion service
//!
//! This crate provides the local backend for the LearnSphere learning
//! app: it owns the device's session state machine and serves the
//! course catalog, user profile, and tutor endpoints over HTTP.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

use std::sync::Arc;

use config::Config;
use services::{CatalogService, TutorService};
use session::{ProfileStore, SessionManager};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub session: SessionManager,
    pub store: Arc<dyn ProfileStore>,
    pub catalog: CatalogService,
    pub tutor: TutorService,
}
