//! # Bookshelf API
//!
//! REST backend for the online bookstore.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export ACCESS_TOKEN_SECRET=...
//! export STRIPE_SECRET_KEY=sk_test_...
//! export MONGODB_URI=mongodb://localhost:27017
//!
//! # Run the server
//! bookshelf
//! ```

use anyhow::Context;
use shelf_api::{routes, AppConfig, AppState};
use shelf_mongo::MongoStore;
use shelf_stripe::StripeIntentClient;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = AppConfig::from_env()?;
    let addr = config.socket_addr()?;

    // Process-scoped store connection: opened once here, injected into the
    // handlers through AppState, released after the server drains.
    let store = MongoStore::connect(&config.mongodb_uri, &config.db_name, config.store_timeout)
        .await
        .context("failed to set up the document store")?;
    let store_handle = store.clone();

    let intents = StripeIntentClient::from_env()?;
    let state = AppState::new(Arc::new(store), Arc::new(intents), config);

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.intents.provider_name());
    info!(
        "Allowed origins: {}",
        state.config.allowed_origins.join(", ")
    );

    let app = routes::create_router(state);

    info!("Bookshelf API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store_handle.shutdown().await;
    info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
