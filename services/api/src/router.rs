//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API, WebSocket endpoint, and OpenAPI documentation.

use crate::{
    handlers,
    models::{CreateSessionResponse, DeleteSessionResponse, ErrorResponse, HealthResponse},
    state::AppState,
    ws::ws_handler,
};

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check,
        handlers::create_session,
        handlers::delete_session,
    ),
    components(
        schemas(CreateSessionResponse, DeleteSessionResponse, HealthResponse, ErrorResponse)
    ),
    tags(
        (name = "Tutor API", description = "Session lifecycle for the scripted tutoring server")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Group all routes that require AppState into their own router.
    let api_router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/session", post(handlers::create_session))
        .route("/api/session/{id}", delete(handlers::delete_session))
        .route("/ws/{session_id}", get(ws_handler))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
