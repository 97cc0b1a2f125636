//! Commit-author email mining.
//!
//! Scans a bounded window of a user's recent repositories and their
//! default-branch history for author addresses that resemble the user's
//! display name or login.

use tracing::{debug, instrument};

use crate::config::ResolutionConfig;
use crate::directory::ProfileDirectory;
use crate::email::{is_valid_email, local_part};
use crate::errors::GitHubError;
use crate::models::{CandidateEmail, Profile, RepositoryCommits, SourceStage};
use crate::similarity;

/// Selects up to `max_emails` plausible addresses from commit history.
#[derive(Debug, Clone)]
pub struct CommitEmailMiner {
    threshold: f64,
    max_emails: usize,
    repo_limit: u32,
    commit_limit: u32,
}

impl Default for CommitEmailMiner {
    fn default() -> Self {
        Self::new(&ResolutionConfig::default())
    }
}

impl CommitEmailMiner {
    pub fn new(config: &ResolutionConfig) -> Self {
        Self {
            threshold: config.similarity_threshold,
            max_emails: config.max_commit_emails,
            repo_limit: config.repo_limit,
            commit_limit: config.commit_limit,
        }
    }

    /// Fetch recent history in a single directory call and select from it.
    #[instrument(skip(self, directory, profile), fields(login = %profile.login))]
    pub async fn mine(
        &self,
        directory: &dyn ProfileDirectory,
        profile: &Profile,
    ) -> Result<Vec<CandidateEmail>, GitHubError> {
        let repos = directory
            .fetch_recent_commits(&profile.login, self.repo_limit, self.commit_limit)
            .await?;
        Ok(self.select(profile, &repos))
    }

    /// Walk repositories and commits in the given order, accepting an address
    /// when it is valid, resembles the display name or login, and is new.
    /// Stops as soon as the cap is reached.
    pub fn select(&self, profile: &Profile, repos: &[RepositoryCommits]) -> Vec<CandidateEmail> {
        let mut accepted: Vec<CandidateEmail> = Vec::new();
        if self.max_emails == 0 {
            return accepted;
        }

        'repos: for repo in repos.iter().take(self.repo_limit as usize) {
            for commit in repo.commits.iter().take(self.commit_limit as usize) {
                let Some(raw) = commit.author_email.as_deref() else {
                    continue;
                };
                let address = raw.trim().to_lowercase();
                if !is_valid_email(&address) || accepted.iter().any(|c| c.address == address) {
                    continue;
                }

                let Some(score) = self.match_score(profile, local_part(&address)) else {
                    continue;
                };
                debug!(repo = %repo.name, address = %address, score, "accepted commit email");
                accepted.push(CandidateEmail::new(&address, SourceStage::Commit, Some(score)));

                if accepted.len() >= self.max_emails {
                    break 'repos;
                }
            }
        }
        accepted
    }

    /// Best score above the threshold against the display name or the login.
    fn match_score(&self, profile: &Profile, local: &str) -> Option<f64> {
        let by_name = profile
            .display_name
            .as_deref()
            .map(|name| similarity::score(name, local))
            .unwrap_or(0.0);
        let by_login = similarity::score(&profile.login, local);
        let best = by_name.max(by_login);
        (by_name > self.threshold || by_login > self.threshold).then_some(best)
    }
}
