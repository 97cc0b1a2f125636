//! `contactscout resolve` subcommand.

use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use tracing::debug;

use contactscout_core::config::AppConfig;
use contactscout_core::db::Database;
use contactscout_core::github::GitHubClient;
use contactscout_core::models::ResolutionResult;
use contactscout_core::pipeline::EmailResolutionPipeline;
use contactscout_core::scrape::HttpScraper;

use crate::style;

pub async fn cmd_resolve(
    config: &AppConfig,
    login: &str,
    json: bool,
    save_to: Option<&Database>,
) -> Result<()> {
    let token = config
        .github
        .require_token()
        .context("GitHub token is missing")?;

    let github =
        GitHubClient::from_config(&config.github, token).context("failed to build GitHub client")?;
    let scraper = HttpScraper::new(&config.scraper).context("failed to build scraper")?;
    let pipeline = EmailResolutionPipeline::new(config, Arc::new(github), Arc::new(scraper));
    debug!(login, api_url = %config.github.api_url, "resolving");

    let result = pipeline
        .resolve(login)
        .await
        .with_context(|| format!("failed to resolve {}", login))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    if let Some(db) = save_to {
        let profile = &result.profile;
        let html_url = profile
            .html_url
            .clone()
            .unwrap_or_else(|| format!("https://github.com/{}", profile.login));
        crate::saved::cmd_add(
            db,
            &profile.login,
            profile.avatar_url.as_deref().unwrap_or_default(),
            &html_url,
        )?;
    }

    Ok(())
}

fn print_result(result: &ResolutionResult) {
    let profile = &result.profile;

    println!();
    println!("{}", style::header(&format!("Profile: {}", profile.login)));
    println!();
    println!(
        "  Name         : {}",
        profile.display_name.as_deref().unwrap_or("-")
    );
    println!("  In locale    : {}", style::in_locale(result.is_name_in_locale));
    println!(
        "  Homepage     : {}",
        profile.homepage_url.as_deref().unwrap_or("-")
    );
    println!("  Repositories : {}", profile.repository_count);
    println!();

    for warning in &result.warnings {
        println!(
            "{}",
            style::warn(&format!("{} stage failed: {}", warning.stage, warning.detail))
        );
    }

    if result.emails.is_empty() {
        println!("{}", style::dim("No contact emails found."));
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Email", "Source", "Score"]);

    for email in &result.emails {
        let candidate = result.candidates.iter().find(|c| &c.address == email);
        let source = result
            .source_stage
            .map(style::stage)
            .unwrap_or_else(|| "-".to_string());
        let score = candidate
            .and_then(|c| c.score)
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![Cell::new(email), Cell::new(source), Cell::new(score)]);
    }

    println!("{}", table);
    println!();
}
