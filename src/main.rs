// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nearby-Connect API Server
//!
//! Lets users report where they are, flag themselves as available and find
//! other available users close by.

use nearby_connect::{
    config::{Config, StoreBackend},
    db::{FirestoreStore, JsonFileStore, MemoryStore, UserStore},
    services::ProximityDirectory,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Nearby-Connect API");

    let store: Arc<dyn UserStore> = match config.store_backend {
        StoreBackend::File => {
            tracing::info!(path = %config.db_file.display(), "Using JSON file store");
            Arc::new(JsonFileStore::open(&config.db_file).await?)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; users are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Firestore => Arc::new(FirestoreStore::new(&config.gcp_project_id).await?),
    };

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        directory: ProximityDirectory::new(store),
    });

    // Build router
    let app = nearby_connect::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nearby_connect=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
