// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LearnSphere API Server
//!
//! Local companion service for the LearnSphere learning app. Owns the
//! device's session state machine and serves the course catalog, user
//! profile, and AI tutor endpoints.

use learnsphere::{
    config::Config,
    db::FirestoreProfiles,
    services::{CatalogService, FirebaseAuthClient, TutorService},
    session::{IdentityProvider, ProfileStore, SessionManager},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting LearnSphere API");

    // Initialize the Firestore-backed profile store
    let profiles = FirestoreProfiles::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");
    let store: Arc<dyn ProfileStore> = Arc::new(profiles);

    // Load the course catalog
    tracing::info!(path = %config.catalog_path.display(), "Loading course catalog");
    let catalog =
        CatalogService::load_from_file(&config.catalog_path).expect("Failed to load catalog");

    // Initialize the Firebase Auth provider
    let provider = Arc::new(FirebaseAuthClient::new(
        config.firebase_api_key.clone(),
        config.session_file.clone(),
    ));

    // The session manager subscribes before restore runs, so the
    // restore outcome is its first notification.
    let session = SessionManager::spawn(
        provider.clone() as Arc<dyn IdentityProvider>,
        store.clone(),
    );

    {
        let provider = provider.clone();
        tokio::spawn(async move {
            provider.restore_session().await;
        });
    }

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        session,
        store,
        catalog,
        tutor: TutorService::new(),
    });

    // Build router
    let app = learnsphere::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("learnsphere=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
