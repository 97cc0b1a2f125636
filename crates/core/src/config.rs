//! TOML-based configuration system for contactscout.
//!
//! Sensitive values (the GitHub token) are stored as `_env` fields that
//! reference environment variable names. The actual secrets are resolved at
//! runtime via [`AppConfig::resolve_env_vars`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::ConfigError;
use crate::similarity::DEFAULT_SIMILARITY_THRESHOLD;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level application configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Process-level settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// GitHub API settings.
    #[serde(default)]
    pub github: GitHubConfig,

    /// Cascade tuning knobs.
    #[serde(default)]
    pub resolution: ResolutionConfig,

    /// Website scraping settings.
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Name classifier dictionary extensions.
    #[serde(default)]
    pub locale: LocaleConfig,

    /// HTTP API settings.
    #[serde(default)]
    pub web: WebConfig,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// Process-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory for persistent data (saved-user database).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_log_level() -> String {
    "info".into()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("/var/lib/contactscout")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
        }
    }
}

impl ServerConfig {
    /// Location of the saved-user database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("contactscout.db")
    }
}

// ---------------------------------------------------------------------------
// GitHub
// ---------------------------------------------------------------------------

/// GitHub API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API base URL (default `https://api.github.com`). The GraphQL
    /// endpoint is `{api_url}/graphql`.
    #[serde(default = "default_github_api_url")]
    pub api_url: String,

    /// Environment variable holding the GitHub personal access token.
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Per-request timeout.
    #[serde(default = "default_github_timeout")]
    pub timeout_secs: u64,

    /// Extra attempts for transient profile-fetch failures.
    #[serde(default)]
    pub max_retries: u32,

    /// Resolved token (populated by `resolve_env_vars`).
    #[serde(skip)]
    pub token: Option<String>,
}

fn default_github_api_url() -> String {
    "https://api.github.com".into()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".into()
}
fn default_github_timeout() -> u64 {
    15
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api_url(),
            token_env: default_token_env(),
            timeout_secs: default_github_timeout(),
            max_retries: 0,
            token: None,
        }
    }
}

impl GitHubConfig {
    /// The GraphQL endpoint derived from `api_url`.
    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.api_url.trim_end_matches('/'))
    }

    /// The resolved token, or an error naming the variable that should hold it.
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.token
            .as_deref()
            .ok_or_else(|| ConfigError::EnvVarMissing {
                var: self.token_env.clone(),
                field: "github.token_env".into(),
            })
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Tunable constants of the resolution cascade. Defaults match the historic
/// behaviour and should be kept for compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Commit emails must score strictly above this against the display name
    /// or the login.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Maximum number of addresses the commit stage may return.
    #[serde(default = "default_max_commit_emails")]
    pub max_commit_emails: usize,

    /// Most-recently-pushed repositories scanned by the commit stage.
    #[serde(default = "default_history_limit")]
    pub repo_limit: u32,

    /// Most recent default-branch commits scanned per repository.
    #[serde(default = "default_history_limit")]
    pub commit_limit: u32,

    /// Social providers whose links are never scraped (case-insensitive
    /// substring match).
    #[serde(default = "default_disallowed_providers")]
    pub disallowed_providers: Vec<String>,
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}
fn default_max_commit_emails() -> usize {
    3
}
fn default_history_limit() -> u32 {
    20
}
fn default_disallowed_providers() -> Vec<String> {
    ["twitter", "youtube", "instagram", "linkedin", "facebook"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            max_commit_emails: default_max_commit_emails(),
            repo_limit: default_history_limit(),
            commit_limit: default_history_limit(),
            disallowed_providers: default_disallowed_providers(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scraper
// ---------------------------------------------------------------------------

/// Website scraping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Per-page timeout.
    #[serde(default = "default_scrape_timeout")]
    pub timeout_secs: u64,

    /// Bodies larger than this are truncated before extraction.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// User-Agent header sent with page requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_scrape_timeout() -> u64 {
    10
}
fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}
fn default_user_agent() -> String {
    concat!("contactscout/", env!("CARGO_PKG_VERSION")).into()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_scrape_timeout(),
            max_body_bytes: default_max_body_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// Additions to the embedded name dictionaries.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocaleConfig {
    #[serde(default)]
    pub extra_given_names: Vec<String>,

    #[serde(default)]
    pub extra_surnames: Vec<String>,
}

// ---------------------------------------------------------------------------
// Web
// ---------------------------------------------------------------------------

/// HTTP API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Listen address (default `127.0.0.1:3000`).
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "127.0.0.1:3000".into()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & resolving
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file at the given path.
    ///
    /// This does **not** resolve environment variables -- call
    /// [`resolve_env_vars`](Self::resolve_env_vars) afterwards.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Resolve all `*_env` fields from environment variables.
    ///
    /// A missing variable logs a warning but does **not** fail; callers that
    /// need the token use [`GitHubConfig::require_token`].
    pub fn resolve_env_vars(&mut self) -> Result<(), ConfigError> {
        info!("resolving environment variable references in config");
        self.github.token = resolve_optional_env(&self.github.token_env, "github.token_env");
        debug!("environment variable resolution complete");
        Ok(())
    }

    /// Validate that all values are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.github.api_url.trim().is_empty() {
            return Err(invalid("github.api_url", "GitHub API URL must not be empty"));
        }
        if self.github.timeout_secs == 0 {
            return Err(invalid("github.timeout_secs", "timeout must be > 0"));
        }
        let threshold = self.resolution.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(invalid(
                "resolution.similarity_threshold",
                "threshold must be within [0, 1]",
            ));
        }
        if self.resolution.max_commit_emails == 0 {
            return Err(invalid("resolution.max_commit_emails", "cap must be > 0"));
        }
        if self.resolution.repo_limit == 0 || self.resolution.repo_limit > 100 {
            return Err(invalid("resolution.repo_limit", "limit must be within 1..=100"));
        }
        if self.resolution.commit_limit == 0 || self.resolution.commit_limit > 100 {
            return Err(invalid("resolution.commit_limit", "limit must be within 1..=100"));
        }
        if self.scraper.timeout_secs == 0 {
            return Err(invalid("scraper.timeout_secs", "timeout must be > 0"));
        }
        if self.web.listen.trim().is_empty() {
            return Err(invalid("web.listen", "listen address must not be empty"));
        }
        Ok(())
    }

    /// Convenience: load, resolve, and validate in one call.
    pub fn load_and_resolve<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file(path)?;
        config.resolve_env_vars()?;
        config.validate()?;
        Ok(config)
    }
}

fn invalid(field: &str, detail: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        detail: detail.into(),
    }
}

/// Try to read an environment variable by name. Returns `Some(value)` on
/// success; logs a warning and returns `None` if the variable is unset.
fn resolve_optional_env(env_name: &str, field: &str) -> Option<String> {
    match std::env::var(env_name) {
        Ok(val) if !val.is_empty() => {
            debug!(field, env_name, "resolved env var");
            Some(val)
        }
        Ok(_) => {
            warn!(field, env_name, "env var is set but empty");
            None
        }
        Err(_) => {
            warn!(field, env_name, "env var not set");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_toml() -> &'static str {
        r#"
[server]
log_level = "debug"
data_dir = "/tmp/contactscout"

[github]
api_url = "https://github.example.com/api/"
token_env = "CS_TEST_TOKEN"
timeout_secs = 5
max_retries = 2

[resolution]
similarity_threshold = 0.5
max_commit_emails = 5
repo_limit = 10
commit_limit = 30
disallowed_providers = ["mastodon"]

[scraper]
timeout_secs = 3
max_body_bytes = 1024

[locale]
extra_given_names = ["Octo"]

[web]
listen = "0.0.0.0:8080"
"#
    }

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str(sample_toml()).expect("failed to parse toml");
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.github.max_retries, 2);
        assert_eq!(config.github.graphql_url(), "https://github.example.com/api/graphql");
        assert_eq!(config.resolution.similarity_threshold, 0.5);
        assert_eq!(config.resolution.disallowed_providers, vec!["mastodon"]);
        assert_eq!(config.scraper.max_body_bytes, 1024);
        assert_eq!(config.locale.extra_given_names, vec!["Octo"]);
        assert_eq!(config.web.listen, "0.0.0.0:8080");
        assert_eq!(
            config.server.database_path(),
            PathBuf::from("/tmp/contactscout/contactscout.db")
        );
    }

    #[test]
    fn test_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.token_env, "GITHUB_TOKEN");
        assert_eq!(config.github.max_retries, 0);
        assert_eq!(config.resolution.similarity_threshold, 0.4);
        assert_eq!(config.resolution.max_commit_emails, 3);
        assert_eq!(config.resolution.repo_limit, 20);
        assert_eq!(config.resolution.commit_limit, 20);
        assert_eq!(
            config.resolution.disallowed_providers,
            vec!["twitter", "youtube", "instagram", "linkedin", "facebook"]
        );
        assert_eq!(config.web.listen, "127.0.0.1:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(sample_toml().as_bytes()).unwrap();

        let config = AppConfig::load_from_file(&path).expect("load_from_file failed");
        assert_eq!(config.scraper.timeout_secs, 3);
    }

    #[test]
    fn test_file_not_found() {
        let result = AppConfig::load_from_file("/nonexistent/contactscout.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_validate_rejects_threshold_out_of_range() {
        let mut config = AppConfig::default();
        config.resolution.similarity_threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "resolution.similarity_threshold"
        ));
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let mut config = AppConfig::default();
        config.resolution.max_commit_emails = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "resolution.max_commit_emails"
        ));
    }

    #[test]
    fn test_resolve_env_vars() {
        std::env::set_var("CS_TEST_TOKEN", "ghp_abc");
        let mut config: AppConfig = toml::from_str(sample_toml()).unwrap();
        config.resolve_env_vars().unwrap();
        assert_eq!(config.github.require_token().unwrap(), "ghp_abc");
        std::env::remove_var("CS_TEST_TOKEN");
    }

    #[test]
    fn test_missing_token_is_reported() {
        let mut config = AppConfig::default();
        config.github.token_env = "CS_TEST_TOKEN_UNSET".into();
        config.resolve_env_vars().unwrap();
        assert!(matches!(
            config.github.require_token(),
            Err(ConfigError::EnvVarMissing { ref var, .. }) if var == "CS_TEST_TOKEN_UNSET"
        ));
    }
}
