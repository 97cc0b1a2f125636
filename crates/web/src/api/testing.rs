//! Shared fixtures for handler tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use contactscout_core::config::AppConfig;
use contactscout_core::db::Database;
use contactscout_core::directory::{ProfileDirectory, Scraper};
use contactscout_core::errors::GitHubError;
use contactscout_core::models::{Profile, RepositoryCommits};
use contactscout_core::pipeline::EmailResolutionPipeline;

use crate::WebServer;

/// Serves a fixed set of profiles; any other login is unknown.
pub(crate) struct StubDirectory {
    profiles: HashMap<String, Profile>,
}

#[async_trait]
impl ProfileDirectory for StubDirectory {
    async fn fetch_profile(&self, login: &str) -> Result<Profile, GitHubError> {
        match login {
            "flaky" => Err(GitHubError::ApiError {
                status: 503,
                body: "unavailable".into(),
            }),
            _ => self
                .profiles
                .get(login)
                .cloned()
                .ok_or_else(|| GitHubError::UserNotFound(login.to_string())),
        }
    }

    async fn fetch_recent_commits(
        &self,
        _login: &str,
        _repo_limit: u32,
        _commit_limit: u32,
    ) -> Result<Vec<RepositoryCommits>, GitHubError> {
        Ok(Vec::new())
    }
}

pub(crate) struct EmptyScraper;

#[async_trait]
impl Scraper for EmptyScraper {
    async fn scrape(&self, _url: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Router over an in-memory database with two known users: `jdoe`
/// (public email set) and `octocat` (name outside the locale).
pub(crate) fn test_app() -> Router {
    let mut jdoe = Profile::new("jdoe");
    jdoe.display_name = Some("Jane Doe".into());
    jdoe.public_email = Some("Jane@Example.com".into());
    jdoe.html_url = Some("https://github.com/jdoe".into());

    let mut octocat = Profile::new("octocat");
    octocat.display_name = Some("The Octocat".into());

    let directory = StubDirectory {
        profiles: HashMap::from([("jdoe".to_string(), jdoe), ("octocat".to_string(), octocat)]),
    };

    let config = AppConfig::default();
    let pipeline = EmailResolutionPipeline::new(&config, Arc::new(directory), Arc::new(EmptyScraper));

    let db = Database::in_memory().unwrap();
    db.initialize().unwrap();

    WebServer::new(db, Arc::new(pipeline)).router()
}

pub(crate) async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    read_json(app, request).await
}

pub(crate) async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    read_json(app, request).await
}

async fn read_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
