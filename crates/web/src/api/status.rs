//! Health endpoint and the shared API error type.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::error;

use contactscout_core::errors::ResolutionError;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    version: String,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/status/health", get(health_check))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ---------------------------------------------------------------------------
// Shared error type for API handlers
// ---------------------------------------------------------------------------

/// API error type that converts to an Axum response with a body of
/// `{"error": {"message": ...}}`.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    /// A failure reported by the profile directory, relayed with its status.
    Upstream(StatusCode, String),
    Internal(String),
}

impl From<ResolutionError> for AppError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::NotFound { .. } => AppError::NotFound(err.to_string()),
            ResolutionError::Upstream { status, .. } => {
                let code = status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .filter(|c| c.is_client_error() || c.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                AppError::Upstream(code, err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Upstream(code, msg) => (code, msg),
            AppError::Internal(msg) => {
                error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": { "message": message } });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{get_json, test_app};

    #[tokio::test]
    async fn test_health_check() {
        let (status, json) = get_json(test_app(), "/api/status/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_resolution_error_status_mapping() {
        let not_found: AppError = ResolutionError::NotFound {
            login: "ghost".into(),
        }
        .into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let relayed: AppError = ResolutionError::Upstream {
            status: Some(503),
            detail: "unavailable".into(),
        }
        .into();
        assert_eq!(
            relayed.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );

        let transport: AppError = ResolutionError::Upstream {
            status: None,
            detail: "connection reset".into(),
        }
        .into();
        assert_eq!(transport.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
