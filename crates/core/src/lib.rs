//! contactscout core library.
//!
//! This crate resolves likely contact email addresses for a public code-hosting
//! profile: configuration, the profile directory client, page scraping,
//! commit-author mining, locale name classification, the resolution pipeline,
//! and SQLite persistence for the saved-user list.

pub mod config;
pub mod db;
pub mod directory;
pub mod email;
pub mod errors;
pub mod github;
pub mod links;
pub mod locale;
pub mod miner;
pub mod models;
pub mod pipeline;
pub mod scrape;
pub mod similarity;

// Re-exports for convenience.
pub use config::AppConfig;
pub use db::Database;
pub use directory::{ProfileDirectory, Scraper};
pub use github::GitHubClient;
pub use locale::{DictionaryNameClassifier, NameClassifier};
pub use pipeline::EmailResolutionPipeline;
pub use scrape::HttpScraper;
