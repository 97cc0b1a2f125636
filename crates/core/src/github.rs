//! GitHub GraphQL API client.
//!
//! Implements [`ProfileDirectory`] with two queries: one for the profile
//! (including social accounts) and one for the recent default-branch history
//! of the user's most recently pushed repositories.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::GitHubConfig;
use crate::directory::ProfileDirectory;
use crate::errors::GitHubError;
use crate::models::{CommitRecord, Profile, RepositoryCommits, SocialLink};

const PROFILE_QUERY: &str = r#"
query($login: String!) {
  user(login: $login) {
    login
    name
    avatarUrl
    url
    email
    websiteUrl
    createdAt
    repositories(privacy: PUBLIC) {
      totalCount
    }
    socialAccounts(first: 10) {
      nodes {
        displayName
        provider
        url
      }
    }
  }
}
"#;

const COMMITS_QUERY: &str = r#"
query($login: String!, $repoLimit: Int!, $commitLimit: Int!) {
  user(login: $login) {
    repositories(first: $repoLimit, privacy: PUBLIC, isFork: false, orderBy: {field: PUSHED_AT, direction: DESC}) {
      nodes {
        name
        defaultBranchRef {
          target {
            ... on Commit {
              history(first: $commitLimit) {
                edges {
                  node {
                    author {
                      email
                    }
                    committedDate
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}
"#;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope<T> {
    user: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    login: String,
    name: Option<String>,
    avatar_url: Option<String>,
    url: Option<String>,
    email: Option<String>,
    website_url: Option<String>,
    created_at: Option<DateTime<Utc>>,
    repositories: Option<TotalCount>,
    social_accounts: Option<Nodes<SocialAccountNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct Nodes<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<Option<T>>,
}

#[derive(Debug, Deserialize)]
struct SocialAccountNode {
    provider: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitsUserNode {
    repositories: Option<Nodes<RepositoryNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    name: String,
    default_branch_ref: Option<BranchRefNode>,
}

#[derive(Debug, Deserialize)]
struct BranchRefNode {
    target: Option<TargetNode>,
}

#[derive(Debug, Deserialize)]
struct TargetNode {
    history: Option<HistoryNode>,
}

#[derive(Debug, Deserialize)]
struct HistoryNode {
    #[serde(default)]
    edges: Vec<Option<EdgeNode>>,
}

#[derive(Debug, Deserialize)]
struct EdgeNode {
    node: Option<CommitNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitNode {
    author: Option<AuthorNode>,
    committed_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct AuthorNode {
    email: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Asynchronous GitHub GraphQL client.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    graphql_url: String,
    token: String,
    timeout_secs: u64,
    max_retries: u32,
}

impl GitHubClient {
    pub fn new(
        graphql_url: impl Into<String>,
        token: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, GitHubError> {
        let graphql_url = graphql_url.into();
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("contactscout/", env!("CARGO_PKG_VERSION"))),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        info!(graphql_url = %graphql_url, "created GitHubClient");
        Ok(Self {
            http,
            graphql_url,
            token: token.into(),
            timeout_secs,
            max_retries: 0,
        })
    }

    /// Build a client from configuration. Requires a resolved token.
    pub fn from_config(config: &GitHubConfig, token: &str) -> Result<Self, GitHubError> {
        Ok(Self::new(config.graphql_url(), token, config.timeout_secs)?
            .with_max_retries(config.max_retries))
    }

    /// Extra attempts for transient profile-fetch failures.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<GraphQlResponse<T>, GitHubError> {
        let body = serde_json::json!({ "query": query, "variables": variables });
        let resp = self
            .http
            .post(&self.graphql_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.check_response(&resp)?;
        let text = resp.text().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&text).map_err(|e| GitHubError::ParseError(e.to_string()))
    }

    async fn fetch_profile_once(&self, login: &str) -> Result<Profile, GitHubError> {
        let resp: GraphQlResponse<UserEnvelope<UserNode>> = self
            .graphql(PROFILE_QUERY, serde_json::json!({ "login": login }))
            .await?;
        let user = unwrap_user(resp, login)?;
        Ok(profile_from_node(user))
    }

    fn transport_error(&self, err: reqwest::Error) -> GitHubError {
        if err.is_timeout() {
            GitHubError::Timeout {
                secs: self.timeout_secs,
            }
        } else {
            GitHubError::HttpError(err)
        }
    }

    fn check_response(&self, resp: &reqwest::Response) -> Result<(), GitHubError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        if status.as_u16() == 401 {
            return Err(GitHubError::AuthenticationFailed(format!("HTTP {}", status)));
        }
        let remaining = resp
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok());
        if status.as_u16() == 429 || (status.as_u16() == 403 && remaining == Some("0")) {
            let reset = resp
                .headers()
                .get("x-ratelimit-reset")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            return Err(GitHubError::RateLimited { reset_at: reset });
        }
        Err(GitHubError::ApiError {
            status: status.as_u16(),
            body: format!("HTTP {}", status),
        })
    }
}

#[async_trait]
impl ProfileDirectory for GitHubClient {
    #[instrument(skip(self))]
    async fn fetch_profile(&self, login: &str) -> Result<Profile, GitHubError> {
        let profile =
            with_retries(self.max_retries, move || self.fetch_profile_once(login)).await?;
        debug!(login = %profile.login, "fetched profile");
        Ok(profile)
    }

    #[instrument(skip(self))]
    async fn fetch_recent_commits(
        &self,
        login: &str,
        repo_limit: u32,
        commit_limit: u32,
    ) -> Result<Vec<RepositoryCommits>, GitHubError> {
        let resp: GraphQlResponse<UserEnvelope<CommitsUserNode>> = self
            .graphql(
                COMMITS_QUERY,
                serde_json::json!({
                    "login": login,
                    "repoLimit": repo_limit,
                    "commitLimit": commit_limit,
                }),
            )
            .await?;
        let user = unwrap_user(resp, login)?;
        let repos = repositories_from_node(user);
        debug!(
            repos = repos.len(),
            commits = repos.iter().map(|r| r.commits.len()).sum::<usize>(),
            "fetched recent commits"
        );
        Ok(repos)
    }
}

/// Run `op`, retrying up to `max_retries` extra times while the failure is
/// transient. Backoff grows linearly from 250ms.
async fn with_retries<T, F, Fut>(max_retries: u32, mut op: F) -> Result<T, GitHubError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, GitHubError>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_retries => {
                attempt += 1;
                warn!(error = %e, attempt, "transient GitHub failure, retrying");
                tokio::time::sleep(Duration::from_millis(250 * u64::from(attempt))).await;
            }
            Err(e) => return Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding helpers
// ---------------------------------------------------------------------------

fn unwrap_user<T>(resp: GraphQlResponse<UserEnvelope<T>>, login: &str) -> Result<T, GitHubError> {
    if resp
        .errors
        .iter()
        .any(|e| e.kind.as_deref() == Some("NOT_FOUND"))
    {
        return Err(GitHubError::UserNotFound(login.to_string()));
    }
    match resp.data.and_then(|d| d.user) {
        Some(user) => Ok(user),
        None if resp.errors.is_empty() => Err(GitHubError::UserNotFound(login.to_string())),
        None => Err(GitHubError::GraphQl(
            resp.errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )),
    }
}

/// GitHub reports unset strings as `""`.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn profile_from_node(user: UserNode) -> Profile {
    let social_links = user
        .social_accounts
        .map(|s| s.nodes)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter_map(|node| match (node.provider, non_empty(node.url)) {
            (Some(provider), Some(url)) => Some(SocialLink::new(provider, url)),
            _ => None,
        })
        .collect();

    Profile {
        login: user.login,
        display_name: non_empty(user.name),
        public_email: non_empty(user.email),
        homepage_url: non_empty(user.website_url),
        avatar_url: non_empty(user.avatar_url),
        html_url: non_empty(user.url),
        created_at: user.created_at,
        repository_count: user.repositories.map(|r| r.total_count).unwrap_or(0),
        social_links,
    }
}

fn repositories_from_node(user: CommitsUserNode) -> Vec<RepositoryCommits> {
    user.repositories
        .map(|r| r.nodes)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(|repo| {
            let commits = repo
                .default_branch_ref
                .and_then(|b| b.target)
                .and_then(|t| t.history)
                .map(|h| h.edges)
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .filter_map(|edge| edge.node)
                .map(|node| CommitRecord {
                    author_email: non_empty(node.author.and_then(|a| a.email)),
                    committed_at: node.committed_date,
                })
                .collect();
            RepositoryCommits {
                name: repo.name,
                commits,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn decode<T: DeserializeOwned>(json: &str) -> GraphQlResponse<UserEnvelope<T>> {
        serde_json::from_str(json).expect("fixture should decode")
    }

    #[test]
    fn test_profile_decoding() {
        let resp = decode::<UserNode>(
            r#"{"data":{"user":{
                "login":"octocat","name":"The Octocat",
                "avatarUrl":"https://avatars.example/u/583231","url":"https://github.com/octocat",
                "email":"","websiteUrl":"https://github.blog",
                "createdAt":"2011-01-25T18:44:36Z",
                "repositories":{"totalCount":8},
                "socialAccounts":{"nodes":[
                    {"displayName":"@octo","provider":"TWITTER","url":"https://twitter.com/octo"},
                    {"displayName":"blog","provider":"GENERIC","url":"https://octo.example"}
                ]}
            }}}"#,
        );
        let profile = profile_from_node(unwrap_user(resp, "octocat").unwrap());
        assert_eq!(profile.login, "octocat");
        assert_eq!(profile.display_name.as_deref(), Some("The Octocat"));
        assert_eq!(profile.public_email, None);
        assert_eq!(profile.homepage_url.as_deref(), Some("https://github.blog"));
        assert_eq!(profile.html_url.as_deref(), Some("https://github.com/octocat"));
        assert_eq!(profile.repository_count, 8);
        assert_eq!(
            profile.social_links,
            vec![
                SocialLink::new("TWITTER", "https://twitter.com/octo"),
                SocialLink::new("GENERIC", "https://octo.example"),
            ]
        );
        assert!(profile.created_at.is_some());
    }

    #[test]
    fn test_null_user_is_not_found() {
        let resp = decode::<UserNode>(r#"{"data":{"user":null}}"#);
        assert!(matches!(
            unwrap_user(resp, "ghost"),
            Err(GitHubError::UserNotFound(ref l)) if l == "ghost"
        ));

        let resp = decode::<UserNode>(
            r#"{"data":{"user":null},"errors":[{"type":"NOT_FOUND","message":"Could not resolve to a User with the login of 'ghost'."}]}"#,
        );
        assert!(matches!(
            unwrap_user(resp, "ghost"),
            Err(GitHubError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_other_graphql_errors_surface() {
        let resp = decode::<UserNode>(
            r#"{"data":null,"errors":[{"message":"Something went wrong"}]}"#,
        );
        assert!(matches!(
            unwrap_user(resp, "octocat"),
            Err(GitHubError::GraphQl(ref m)) if m == "Something went wrong"
        ));
    }

    #[test]
    fn test_commit_history_decoding() {
        let resp = decode::<CommitsUserNode>(
            r#"{"data":{"user":{"repositories":{"nodes":[
                {"name":"hello-world","defaultBranchRef":{"target":{"history":{"edges":[
                    {"node":{"author":{"email":"Octocat@GitHub.com"},"committedDate":"2024-05-01T10:00:00Z"}},
                    {"node":{"author":{"email":null},"committedDate":"2024-04-01T10:00:00Z"}},
                    {"node":{"author":null,"committedDate":null}}
                ]}}}},
                {"name":"empty-repo","defaultBranchRef":null}
            ]}}}}"#,
        );
        let repos = repositories_from_node(unwrap_user(resp, "octocat").unwrap());
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].name, "hello-world");
        assert_eq!(repos[0].commits.len(), 3);
        assert_eq!(
            repos[0].commits[0].author_email.as_deref(),
            Some("Octocat@GitHub.com")
        );
        assert_eq!(repos[0].commits[1].author_email, None);
        assert!(repos[1].commits.is_empty());
    }

    #[test]
    fn test_client_construction() {
        let config = GitHubConfig::default();
        let client = GitHubClient::from_config(&config, "ghp_test").unwrap();
        assert_eq!(client.graphql_url, "https://api.github.com/graphql");
        assert_eq!(client.max_retries, 0);
    }

    fn unavailable() -> GitHubError {
        GitHubError::ApiError {
            status: 503,
            body: "HTTP 503".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_from_transient_failure() {
        let calls = AtomicU32::new(0);
        let result = with_retries(2, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(unavailable())
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<(), GitHubError> = with_retries(2, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(unavailable()) }
        })
        .await;
        assert!(matches!(result, Err(GitHubError::ApiError { status: 503, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retry_by_default_or_for_permanent_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<(), GitHubError> = with_retries(0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(unavailable()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        calls.store(0, Ordering::SeqCst);
        let result: Result<(), GitHubError> = with_retries(3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(GitHubError::UserNotFound("ghost".into())) }
        })
        .await;
        assert!(matches!(result, Err(GitHubError::UserNotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
