//! Main Entrypoint for the Tutor API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Loading the problem data and constructing shared state.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server, and cleaning up all sessions on shutdown.

use anyhow::Context;
use axum::http::HeaderValue;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;
use tutor_api::{config::Config, router::create_router, state::AppState};
use tutor_core::{backend::ScriptedBackend, manager::SessionManager, problem::ProblemData};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Load Problem Data and Build State ---
    let problem = Arc::new(ProblemData::from_file(&config.problem_path));
    info!(topic = %problem.topic, title = %problem.title, "Problem data loaded");

    let manager = Arc::new(SessionManager::new());
    let app_state = Arc::new(AppState {
        manager: manager.clone(),
        problem,
        backend: Arc::new(ScriptedBackend),
        config: Arc::new(config.clone()),
    });

    // --- 4. Create Router and Apply Middleware ---
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(bind_address = %config.bind_address, "Service configured. Starting server...");
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Sessions are torn down before the process exits.
    manager.cleanup_all().await;
    info!("Server has shut down.");
    Ok(())
}
