//! Profile email resolution endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use contactscout_core::models::Profile;

use crate::api::status::AppError;
use crate::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    #[serde(default)]
    pub user_name: Option<String>,
}

/// The profile with resolution output merged in.
#[derive(Serialize)]
struct ResolvedUser {
    #[serde(flatten)]
    profile: Profile,
    #[serde(rename = "isUSAName")]
    is_usa_name: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    emails: Vec<String>,
}

#[derive(Serialize)]
struct ResolveResponse {
    user: ResolvedUser,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/github", get(liveness).post(resolve_user))
}

async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": { "message": "ok" } }))
}

async fn resolve_user(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<Json<ResolveResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let login = req
        .user_name
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| AppError::BadRequest("userName is required".into()))?;

    let result = state.pipeline.resolve(login).await?;
    info!(
        login,
        is_usa_name = result.is_name_in_locale,
        emails = result.emails.len(),
        "resolved user"
    );

    Ok(Json(ResolveResponse {
        user: ResolvedUser {
            profile: result.profile,
            is_usa_name: result.is_name_in_locale,
            emails: result.emails,
        },
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::testing::{get_json, send_json, test_app};

    #[tokio::test]
    async fn test_liveness() {
        let (status, json) = get_json(test_app(), "/api/github").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"]["message"], "ok");
    }

    #[tokio::test]
    async fn test_resolve_returns_profile_with_emails() {
        let (status, json) =
            send_json(test_app(), "POST", "/api/github", json!({ "userName": "jdoe" })).await;
        assert_eq!(status, StatusCode::OK);
        let user = &json["user"];
        assert_eq!(user["login"], "jdoe");
        assert_eq!(user["displayName"], "Jane Doe");
        assert_eq!(user["htmlUrl"], "https://github.com/jdoe");
        assert_eq!(user["isUSAName"], true);
        assert_eq!(user["emails"], json!(["jane@example.com"]));
    }

    #[tokio::test]
    async fn test_resolve_omits_empty_emails() {
        let (status, json) =
            send_json(test_app(), "POST", "/api/github", json!({ "userName": "octocat" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user"]["isUSAName"], false);
        assert!(json["user"].get("emails").is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_is_404() {
        let (status, json) =
            send_json(test_app(), "POST", "/api/github", json!({ "userName": "ghost" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"]["message"].as_str().unwrap().contains("ghost"));
    }

    #[tokio::test]
    async fn test_upstream_status_is_relayed() {
        let (status, json) =
            send_json(test_app(), "POST", "/api/github", json!({ "userName": "flaky" })).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(json["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn test_missing_user_name_is_400() {
        let (status, json) = send_json(test_app(), "POST", "/api/github", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "userName is required");
    }
}
