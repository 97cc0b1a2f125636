//! Collaborator contracts the resolution pipeline depends on.
//!
//! The pipeline only sees these traits. [`GitHubClient`](crate::github::GitHubClient)
//! and [`HttpScraper`](crate::scrape::HttpScraper) are the production
//! implementations; tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::errors::{GitHubError, ScrapeError};
use crate::models::{Profile, RepositoryCommits};

/// Lookup of public profiles and their recent commit history.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// One combined query for the profile. A missing user is
    /// [`GitHubError::UserNotFound`].
    async fn fetch_profile(&self, login: &str) -> Result<Profile, GitHubError>;

    /// Non-fork public repositories, most recently pushed first, each with its
    /// most recent default-branch commits. One call for all repositories.
    async fn fetch_recent_commits(
        &self,
        login: &str,
        repo_limit: u32,
        commit_limit: u32,
    ) -> Result<Vec<RepositoryCommits>, GitHubError>;
}

/// Best-effort extraction of email-like strings from a page.
///
/// `scrape` must not fail: an empty vector means "try the next candidate
/// URL". `try_scrape` additionally reports why a page yielded nothing, so the
/// pipeline can record it as a stage warning.
#[async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Vec<String>;

    async fn try_scrape(&self, url: &str) -> Result<Vec<String>, ScrapeError> {
        Ok(self.scrape(url).await)
    }
}
