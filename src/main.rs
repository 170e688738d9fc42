// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Minwon-Relay API Server
//!
//! Reacts to complaint-store mutations: pushes status-change and reply
//! notifications to complaint owners and keeps administrator authorization
//! claims in sync with the admin role records.

use minwon_relay::{
    config::Config,
    db::FirestoreDb,
    services::{claims, messaging, ClaimsService, FcmClient, GoogleAuthenticator},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Minwon-Relay API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Service-account credentials back both outbound Google APIs
    let key_path = config
        .service_account_path
        .as_deref()
        .expect("GOOGLE_APPLICATION_CREDENTIALS must be set");

    let fcm = FcmClient::new(
        &config.gcp_project_id,
        GoogleAuthenticator::from_file(key_path, messaging::FCM_SCOPE)
            .expect("Failed to load service account key for FCM"),
    );
    tracing::info!("FCM client initialized");

    let claims_service = ClaimsService::new(
        &config.gcp_project_id,
        GoogleAuthenticator::from_file(key_path, claims::IDENTITY_TOOLKIT_SCOPE)
            .expect("Failed to load service account key for Identity Toolkit"),
    );
    tracing::info!("Claims service initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        fcm,
        claims: claims_service,
    });

    // Build router
    let app = minwon_relay::routes::create_router(state);

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
                .add_directive("minwon_relay=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
