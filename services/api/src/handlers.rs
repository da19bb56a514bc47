//! Axum Handlers for the REST API
//!
//! This module contains the logic for handling HTTP requests for session
//! lifecycle management. It uses `utoipa` doc comments to generate OpenAPI
//! documentation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::error;
use tutor_core::{agent::AgentRegistry, handoff::HandoffPolicy, session::TutorSession};
use uuid::Uuid;

use crate::{
    models::{CreateSessionResponse, DeleteSessionResponse, ErrorResponse, HealthResponse},
    state::AppState,
};

pub enum ApiError {
    NotFound(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is running", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Tutoring server is running".to_string(),
    })
}

/// Create a new tutoring session.
#[utoipa::path(
    post,
    path = "/api/session",
    responses(
        (status = 201, description = "Session created successfully", body = CreateSessionResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = Uuid::new_v4();

    // Each session gets a fresh registry instance built from the shared,
    // immutable problem data.
    let registry = AgentRegistry::tutoring(&state.problem);
    let available_agents = registry.agent_names();

    let session = TutorSession::new(
        session_id,
        registry,
        HandoffPolicy::tutoring(),
        state.backend.clone(),
        state.config.session_config(),
    );

    if !state.manager.create_session(session).await {
        return Err(ApiError::InternalServerError(anyhow::anyhow!(
            "Failed to create session {session_id}"
        )));
    }

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            status: "created".to_string(),
            available_agents,
        }),
    ))
}

/// Delete a tutoring session.
#[utoipa::path(
    delete,
    path = "/api/session/{id}",
    responses(
        (status = 200, description = "Session deleted successfully", body = DeleteSessionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.manager.cleanup_session(&id).await {
        return Err(ApiError::NotFound(format!(
            "Session with id '{}' not found",
            id
        )));
    }

    Ok((
        StatusCode::OK,
        Json(DeleteSessionResponse {
            status: "deleted".to_string(),
            session_id: id,
        }),
    ))
}
