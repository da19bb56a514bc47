//! REST API Models
//!
//! Payloads for the session-lifecycle endpoints, annotated with `utoipa`
//! schemas for the generated OpenAPI documentation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct CreateSessionResponse {
    #[schema(value_type = String, format = Uuid)]
    pub session_id: Uuid,
    #[schema(example = "created")]
    pub status: String,
    #[schema(example = json!(["brainStormer", "closer", "greeter"]))]
    pub available_agents: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct DeleteSessionResponse {
    #[schema(example = "deleted")]
    pub status: String,
    #[schema(value_type = String, format = Uuid)]
    pub session_id: Uuid,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_session_response_serialization() {
        let response = CreateSessionResponse {
            session_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            status: "created".to_string(),
            available_agents: vec!["greeter".to_string(), "closer".to_string()],
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("550e8400-e29b-41d4-a716-446655440000"));
        assert!(json.contains("\"status\":\"created\""));
        assert!(json.contains("greeter"));

        let deserialized: CreateSessionResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.session_id, response.session_id);
        assert_eq!(deserialized.available_agents, response.available_agents);
    }

    #[test]
    fn test_delete_session_response_serialization() {
        let response = DeleteSessionResponse {
            status: "deleted".to_string(),
            session_id: Uuid::new_v4(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"deleted\""));
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            message: "Tutoring server is running".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(
            json,
            r#"{"status":"healthy","message":"Tutoring server is running"}"#
        );
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse {
            message: "Session not found".to_string(),
        };

        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, r#"{"message":"Session not found"}"#);
    }
}
