//! contactscout command-line tool.
//!
//! Provides subcommands for resolving a profile's contact emails, managing
//! the saved-user list, and generating / validating configuration files.

mod resolve;
mod saved;
mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use contactscout_core::config::AppConfig;
use contactscout_core::db::Database;

const DEFAULT_CONFIG_PATH: &str = "~/.config/contactscout/config.toml";

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// contactscout command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "contactscout",
    version,
    about = "Find likely contact emails for public code-hosting profiles"
)]
struct Cli {
    /// Path to the TOML configuration file. Defaults are used when the
    /// default path does not exist.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Show debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve contact emails for a login.
    Resolve {
        /// The account login to resolve.
        login: String,

        /// Print the full result as JSON.
        #[arg(long)]
        json: bool,

        /// Add the user to the saved list after resolving.
        #[arg(long)]
        save: bool,
    },

    /// Manage the saved-user list.
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./contactscout.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file.
    Validate,
}

#[derive(Subcommand, Debug)]
enum SavedAction {
    /// List saved users.
    List,
    /// Save a user.
    Add {
        login: String,

        #[arg(long, default_value = "")]
        avatar_url: String,

        /// Profile page; defaults to `https://github.com/<login>`.
        #[arg(long)]
        html_url: Option<String>,
    },
    /// Remove a saved user.
    Remove { login: String },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = config_path(cli.config.as_deref());
    match cli.command {
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate => cmd_validate(&config_path),
        Commands::Resolve { login, json, save } => {
            let config = load_config(&config_path, cli.config.is_some())?;
            let db = if save {
                Some(open_database(&config)?)
            } else {
                None
            };
            resolve::cmd_resolve(&config, &login, json, db.as_ref()).await
        }
        Commands::Saved { action } => {
            let config = load_config(&config_path, cli.config.is_some())?;
            let db = open_database(&config)?;
            match action {
                SavedAction::List => saved::cmd_list(&db),
                SavedAction::Add {
                    login,
                    avatar_url,
                    html_url,
                } => {
                    let html_url =
                        html_url.unwrap_or_else(|| format!("https://github.com/{}", login));
                    saved::cmd_add(&db, &login, &avatar_url, &html_url)
                }
                SavedAction::Remove { login } => saved::cmd_remove(&db, &login),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

fn config_path(explicit: Option<&str>) -> PathBuf {
    PathBuf::from(expand_tilde(explicit.unwrap_or(DEFAULT_CONFIG_PATH)))
}

/// Expand `~` to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}

/// Load the config file. A missing file at the default location falls back
/// to built-in defaults; an explicitly named file must exist.
fn load_config(path: &Path, explicit: bool) -> Result<AppConfig> {
    if !explicit && !path.exists() {
        let mut config = AppConfig::default();
        config
            .resolve_env_vars()
            .context("failed to resolve environment variables")?;
        return Ok(config);
    }
    AppConfig::load_and_resolve(path).context("failed to load configuration file")
}

fn open_database(config: &AppConfig) -> Result<Database> {
    let db = Database::new(config.server.database_path()).context("failed to open database")?;
    db.initialize().context("failed to initialize database")?;
    Ok(db)
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"# contactscout configuration

[server]
log_level = "info"
data_dir = "/var/lib/contactscout"

[github]
api_url = "https://api.github.com"
token_env = "GITHUB_TOKEN"
timeout_secs = 15
max_retries = 0

[resolution]
similarity_threshold = 0.4
max_commit_emails = 3
repo_limit = 20
commit_limit = 20
disallowed_providers = ["twitter", "youtube", "instagram", "linkedin", "facebook"]

[scraper]
timeout_secs = 10
max_body_bytes = 2097152

[locale]
extra_given_names = []
extra_surnames = []

[web]
listen = "127.0.0.1:3000"
"#;

fn cmd_init(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, DEFAULT_CONFIG).context("failed to write config file")?;

    println!(
        "{}",
        style::success(&format!("Default configuration written to {}", output.display()))
    );
    println!();
    println!("Next steps:");
    println!("  1. Set GITHUB_TOKEN to a personal access token");
    println!(
        "  2. Validate with: contactscout validate --config {}",
        output.display()
    );
    println!(
        "  3. Start the API: contactscout-daemon --config {}",
        output.display()
    );

    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    let mut config =
        AppConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  [OK] TOML structure is valid");

    config
        .resolve_env_vars()
        .context("failed to resolve environment variables")?;
    println!("  [OK] Environment variable references processed");

    if let Err(e) = config.validate() {
        println!("  [FAIL] Validation error: {}", e);
        anyhow::bail!("configuration validation failed");
    }
    println!("  [OK] All values are valid");

    println!();
    println!("Configuration summary:");
    println!("  GitHub API    : {}", config.github.api_url);
    println!(
        "  GitHub token  : {}",
        if config.github.token.is_some() {
            "set"
        } else {
            "NOT SET"
        }
    );
    println!("  Threshold     : {}", config.resolution.similarity_threshold);
    println!("  Commit cap    : {}", config.resolution.max_commit_emails);
    println!(
        "  History window: {} repos x {} commits",
        config.resolution.repo_limit, config.resolution.commit_limit
    );
    println!("  Web listen    : {}", config.web.listen);
    println!("  Data directory: {}", config.server.data_dir.display());
    println!();

    if config.github.token.is_none() {
        println!(
            "{}",
            style::warn(&format!(
                "{} is not set; resolution will fail until it is",
                config.github.token_env
            ))
        );
    }
    println!("Configuration is valid.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_template_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contactscout.toml");
        cmd_init(&path).unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        config.validate().unwrap();
        assert_eq!(config.resolution.max_commit_emails, 3);
        assert_eq!(config.web.listen, "127.0.0.1:3000");
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contactscout.toml");
        std::fs::write(&path, "").unwrap();
        assert!(cmd_init(&path).is_err());
    }

    #[test]
    fn test_missing_default_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml"), false).unwrap();
        assert_eq!(config.resolution.repo_limit, 20);
        assert!(load_config(&dir.path().join("absent.toml"), true).is_err());
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/etc/contactscout.toml"), "/etc/contactscout.toml");
        assert_eq!(expand_tilde("relative.toml"), "relative.toml");
    }

    #[test]
    fn test_parse_resolve_command() {
        let cli = Cli::try_parse_from(["contactscout", "resolve", "octocat", "--json"]).unwrap();
        match cli.command {
            Commands::Resolve { login, json, save } => {
                assert_eq!(login, "octocat");
                assert!(json);
                assert!(!save);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
