//! Saved-user list endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use contactscout_core::models::SavedUser;

use crate::api::status::AppError;
use crate::AppState;

#[derive(Deserialize)]
pub struct SaveRequest {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Deserialize)]
pub struct RemoveRequest {
    pub login: String,
}

#[derive(Serialize)]
struct SavedUsersResponse {
    users: Vec<SavedUser>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/save",
        get(list_saved).post(save_user).delete(remove_user),
    )
}

fn required_login(login: &str) -> Result<&str, AppError> {
    let login = login.trim();
    if login.is_empty() {
        return Err(AppError::BadRequest("login is required".into()));
    }
    Ok(login)
}

async fn list_saved(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SavedUsersResponse>, AppError> {
    let db = state
        .db
        .lock()
        .map_err(|e| AppError::Internal(format!("db lock: {}", e)))?;
    let users = db
        .list_saved_users()
        .map_err(|e| AppError::Internal(format!("database error: {}", e)))?;
    Ok(Json(SavedUsersResponse { users }))
}

async fn save_user(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let login = required_login(&req.login)?;

    let db = state
        .db
        .lock()
        .map_err(|e| AppError::Internal(format!("db lock: {}", e)))?;
    let outcome = db
        .save_user(login, &req.avatar_url, &req.html_url)
        .map_err(|e| AppError::Internal(format!("database error: {}", e)))?;

    if outcome.already_exists {
        return Ok((
            StatusCode::OK,
            Json(json!({ "success": false, "message": "User already saved" })),
        ));
    }

    info!(login, "user saved");
    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}

async fn remove_user(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RemoveRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let login = required_login(&req.login)?;

    let db = state
        .db
        .lock()
        .map_err(|e| AppError::Internal(format!("db lock: {}", e)))?;
    let removed = db
        .remove_saved_user(login)
        .map_err(|e| AppError::Internal(format!("database error: {}", e)))?;

    info!(login, removed, "user removed");
    Ok(Json(json!({ "success": true })))
}
