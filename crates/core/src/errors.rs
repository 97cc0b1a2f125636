//! Error types for the contactscout core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

// ---------------------------------------------------------------------------
// Resolution errors
// ---------------------------------------------------------------------------

/// Fatal outcomes of a single resolution request.
///
/// Only the profile fetch can produce these. Scrape and commit-mining
/// failures degrade to an empty stage result instead.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The login does not resolve to a profile.
    #[error("user not found: {login}")]
    NotFound { login: String },

    /// The profile directory was unreachable or answered with a failure.
    #[error("profile lookup failed{}: {detail}", status_suffix(.status))]
    Upstream { status: Option<u16>, detail: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(s) => format!(" (HTTP {s})"),
        None => String::new(),
    }
}

impl ResolutionError {
    /// Upstream HTTP status, if the failure carried one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => *status,
            Self::NotFound { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// GitHub API errors
// ---------------------------------------------------------------------------

/// Errors from GitHub GraphQL API interactions.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// HTTP-level transport error (network, TLS, etc.).
    #[error("GitHub HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("GitHub request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The API returned a non-success status code.
    #[error("GitHub API error (HTTP {status}): {body}")]
    ApiError { status: u16, body: String },

    /// Authentication token is missing or invalid.
    #[error("GitHub authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Rate limit exceeded.
    #[error("GitHub rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    /// The GraphQL layer reported `NOT_FOUND` or a null user.
    #[error("GitHub user not found: {0}")]
    UserNotFound(String),

    /// The GraphQL response carried errors.
    #[error("GitHub GraphQL error: {0}")]
    GraphQl(String),

    /// JSON deserialization failure.
    #[error("GitHub response parse error: {0}")]
    ParseError(String),
}

impl GitHubError {
    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::AuthenticationFailed(_) => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::ApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<GitHubError> for ResolutionError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::UserNotFound(login) => ResolutionError::NotFound { login },
            other => ResolutionError::Upstream {
                status: other.status(),
                detail: other.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Scrape errors
// ---------------------------------------------------------------------------

/// Errors from fetching an external page. Never fatal to a resolution.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The URL is not an absolute http(s) URL.
    #[error("unsupported URL: {0}")]
    UnsupportedUrl(String),

    /// HTTP-level transport error.
    #[error("scrape HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The page answered with a non-success status.
    #[error("scrape of '{url}' returned HTTP {status}")]
    BadStatus { url: String, status: u16 },

    /// The page did not answer in time.
    #[error("scrape of '{url}' timed out after {secs}s")]
    Timeout { url: String, secs: u64 },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A required environment variable is not set.
    #[error("required environment variable '{var}' is not set (referenced by config field '{field}')")]
    EnvVarMissing { var: String, field: String },

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Database errors
// ---------------------------------------------------------------------------

/// Errors from the SQLite persistence layer.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Underlying rusqlite error.
    #[error("database error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// A migration failed.
    #[error("database migration failed (version {version}): {detail}")]
    MigrationFailed { version: u32, detail: String },

    /// Generic I/O error (e.g. file permissions).
    #[error("database I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = ResolutionError::NotFound {
            login: "ghost".into(),
        };
        assert_eq!(err.to_string(), "user not found: ghost");

        let err = ResolutionError::Upstream {
            status: Some(502),
            detail: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "profile lookup failed (HTTP 502): bad gateway");

        let err = ResolutionError::Upstream {
            status: None,
            detail: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "profile lookup failed: connection refused");

        let err = GitHubError::RateLimited {
            reset_at: "1735689600".into(),
        };
        assert!(err.to_string().contains("rate limit"));

        let err = ConfigError::EnvVarMissing {
            var: "GITHUB_TOKEN".into(),
            field: "github.token_env".into(),
        };
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[test]
    fn test_github_error_maps_to_resolution_error() {
        let err: ResolutionError = GitHubError::UserNotFound("ghost".into()).into();
        assert!(matches!(err, ResolutionError::NotFound { ref login } if login == "ghost"));

        let err: ResolutionError = GitHubError::ApiError {
            status: 503,
            body: "HTTP 503".into(),
        }
        .into();
        assert_eq!(err.upstream_status(), Some(503));

        let err: ResolutionError = GitHubError::Timeout { secs: 15 }.into();
        assert!(matches!(err, ResolutionError::Upstream { status: None, .. }));
    }

    #[test]
    fn test_transient_classification() {
        assert!(GitHubError::Timeout { secs: 1 }.is_transient());
        assert!(GitHubError::ApiError {
            status: 502,
            body: String::new()
        }
        .is_transient());
        assert!(!GitHubError::ApiError {
            status: 404,
            body: String::new()
        }
        .is_transient());
        assert!(!GitHubError::UserNotFound("x".into()).is_transient());
    }

    #[test]
    fn test_core_error_from_subsystem() {
        let err = ResolutionError::NotFound { login: "x".into() };
        let core_err: CoreError = err.into();
        assert!(matches!(core_err, CoreError::Resolution(_)));

        let db_err = DatabaseError::MigrationFailed {
            version: 1,
            detail: "syntax error".into(),
        };
        let core_err: CoreError = db_err.into();
        assert!(matches!(core_err, CoreError::Database(_)));
    }
}
