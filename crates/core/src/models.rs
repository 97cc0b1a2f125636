//! Domain model types used throughout contactscout.
//!
//! These types bridge the profile directory, the resolution pipeline, the
//! saved-user store, and the web API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Immutable snapshot of a public user profile, fetched once per resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub login: String,
    pub display_name: Option<String>,
    pub public_email: Option<String>,
    pub homepage_url: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub repository_count: u64,
    pub social_links: Vec<SocialLink>,
}

impl Profile {
    /// A bare profile with only a login set.
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            display_name: None,
            public_email: None,
            homepage_url: None,
            avatar_url: None,
            html_url: None,
            created_at: None,
            repository_count: 0,
            social_links: Vec::new(),
        }
    }
}

/// A social account attached to a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocialLink {
    pub provider: String,
    pub url: String,
}

impl SocialLink {
    pub fn new(provider: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            url: url.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Commit history
// ---------------------------------------------------------------------------

/// A single commit on a repository's default branch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitRecord {
    pub author_email: Option<String>,
    pub committed_at: Option<DateTime<Utc>>,
}

impl CommitRecord {
    pub fn by(email: impl Into<String>) -> Self {
        Self {
            author_email: Some(email.into()),
            committed_at: None,
        }
    }
}

/// Recent default-branch commits of one repository, most recent first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryCommits {
    pub name: String,
    pub commits: Vec<CommitRecord>,
}

// ---------------------------------------------------------------------------
// Candidates and results
// ---------------------------------------------------------------------------

/// The cascade stage that produced a candidate address.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceStage {
    Public,
    Scraped,
    Commit,
}

impl SourceStage {
    /// Fixed cascade order.
    pub const ORDER: [SourceStage; 3] = [Self::Public, Self::Scraped, Self::Commit];
}

impl std::fmt::Display for SourceStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Scraped => write!(f, "scraped"),
            Self::Commit => write!(f, "commit"),
        }
    }
}

/// An address produced by a stage before final deduplication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateEmail {
    /// Always lowercased.
    pub address: String,
    pub source_stage: SourceStage,
    pub score: Option<f64>,
}

impl CandidateEmail {
    pub fn new(address: &str, source_stage: SourceStage, score: Option<f64>) -> Self {
        Self {
            address: address.trim().to_lowercase(),
            source_stage,
            score,
        }
    }
}

/// A non-fatal stage failure observed during resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageWarning {
    pub stage: SourceStage,
    pub detail: String,
}

/// Outcome of a single resolution request. Never persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    pub profile: Profile,
    pub is_name_in_locale: bool,
    /// Distinct lowercased addresses in first-seen order.
    pub emails: Vec<String>,
    /// The stage that produced `emails`, if any did.
    pub source_stage: Option<SourceStage>,
    pub candidates: Vec<CandidateEmail>,
    pub warnings: Vec<StageWarning>,
}

// ---------------------------------------------------------------------------
// Saved users
// ---------------------------------------------------------------------------

/// The reduced projection of a profile kept in the saved-user store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedUser {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    pub saved_at: String,
}

/// Result of saving a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveOutcome {
    pub already_exists: bool,
}
