//! contactscout daemon entry point.
//!
//! Loads configuration, builds the GitHub client, scraper, and resolution
//! pipeline, opens the saved-user database, and serves the HTTP API until a
//! shutdown signal arrives.

mod signals;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use contactscout_core::config::AppConfig;
use contactscout_core::db::Database;
use contactscout_core::github::GitHubClient;
use contactscout_core::pipeline::EmailResolutionPipeline;
use contactscout_core::scrape::HttpScraper;
use contactscout_web::WebServer;

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// contactscout resolution API daemon.
#[derive(Parser, Debug)]
#[command(
    name = "contactscout-daemon",
    version,
    about = "Serves contact email resolution for code-hosting profiles"
)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Override the log level from the config file (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Override the listen address from the config file.
    #[arg(long)]
    listen: Option<String>,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        AppConfig::load_and_resolve(&args.config).context("failed to load configuration")?;
    if let Some(listen) = &args.listen {
        config.web.listen = listen.clone();
    }

    // Initialize tracing
    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.server.log_level.clone());
    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .init();

    let token = config
        .github
        .require_token()
        .context("GitHub token is missing")?
        .to_string();

    // Startup banner
    info!("========================================");
    info!("  contactscout daemon v{}", env!("CARGO_PKG_VERSION"));
    info!("========================================");
    info!("Config file   : {}", args.config.display());
    info!("GitHub API    : {}", config.github.api_url);
    info!("Web listen    : {}", config.web.listen);
    info!("Data dir      : {}", config.server.data_dir.display());
    info!("Log level     : {}", log_level);
    info!("========================================");

    let db_path = config.server.database_path();
    let db = Database::new(&db_path).context("failed to open database")?;
    db.initialize()
        .context("failed to initialize database schema")?;
    info!("Database initialized at {}", db_path.display());

    let github = GitHubClient::from_config(&config.github, &token)
        .context("failed to build GitHub client")?;
    let scraper = HttpScraper::new(&config.scraper).context("failed to build scraper")?;
    let pipeline = Arc::new(EmailResolutionPipeline::new(
        &config,
        Arc::new(github),
        Arc::new(scraper),
    ));
    info!("Resolution pipeline initialized");

    let web_server = WebServer::new(db, pipeline);
    web_server
        .start(&config.web.listen, signals::wait_for_shutdown())
        .await
        .context("web server failed")?;

    info!("contactscout daemon stopped.");
    Ok(())
}
