//! Email resolution pipeline.
//!
//! Runs a fixed cascade of stages against a freshly fetched profile:
//!
//! 1. [`SourceStage::Public`]: the profile's public email field.
//! 2. [`SourceStage::Scraped`]: the first candidate URL whose page yields any
//!    address; its full result set is taken, nothing is merged across URLs.
//! 3. [`SourceStage::Commit`]: commit-author mining, capped independently.
//!
//! The driver stops at the first stage that produces an address. The whole
//! cascade is skipped when the display name is not in the target locale.
//! Only the profile fetch is fatal; a failed scrape or commit fetch is
//! recorded as a [`StageWarning`] and the cascade continues.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::AppConfig;
use crate::directory::{ProfileDirectory, Scraper};
use crate::email::is_valid_email;
use crate::errors::ResolutionError;
use crate::links::ProfileLinkCollector;
use crate::locale::{DictionaryNameClassifier, NameClassifier};
use crate::miner::CommitEmailMiner;
use crate::models::{CandidateEmail, Profile, ResolutionResult, SourceStage, StageWarning};

/// Output of one stage: `None` means "nothing found, try the next stage".
type StageOutput = Option<Vec<CandidateEmail>>;

/// Orchestrates the resolution cascade for a single login at a time.
///
/// Holds no per-request state; one instance can serve concurrent requests.
pub struct EmailResolutionPipeline {
    directory: Arc<dyn ProfileDirectory>,
    scraper: Arc<dyn Scraper>,
    classifier: Arc<dyn NameClassifier>,
    links: ProfileLinkCollector,
    miner: CommitEmailMiner,
}

impl EmailResolutionPipeline {
    /// Build with the dictionary classifier and the tuning from `config`.
    pub fn new(
        config: &AppConfig,
        directory: Arc<dyn ProfileDirectory>,
        scraper: Arc<dyn Scraper>,
    ) -> Self {
        Self {
            directory,
            scraper,
            classifier: Arc::new(DictionaryNameClassifier::new(&config.locale)),
            links: ProfileLinkCollector::new(&config.resolution.disallowed_providers),
            miner: CommitEmailMiner::new(&config.resolution),
        }
    }

    /// Swap in a different name classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn NameClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Resolve candidate contact emails for `login`.
    ///
    /// Completing with zero emails is a success. Errors are limited to
    /// [`ResolutionError::NotFound`] and [`ResolutionError::Upstream`].
    #[instrument(skip(self))]
    pub async fn resolve(&self, login: &str) -> Result<ResolutionResult, ResolutionError> {
        let login = login.trim();
        if login.is_empty() {
            return Err(ResolutionError::NotFound {
                login: login.to_string(),
            });
        }

        let profile = self.directory.fetch_profile(login).await.map_err(|e| {
            warn!(error = %e, "profile fetch failed");
            ResolutionError::from(e)
        })?;

        let is_name_in_locale = self.classifier.classify(profile.display_name.as_deref());
        let mut result = ResolutionResult {
            profile,
            is_name_in_locale,
            emails: Vec::new(),
            source_stage: None,
            candidates: Vec::new(),
            warnings: Vec::new(),
        };

        if !is_name_in_locale {
            info!(login, "display name outside target locale, skipping cascade");
            return Ok(result);
        }

        for stage in SourceStage::ORDER {
            let output = match stage {
                SourceStage::Public => self.public_stage(&result.profile),
                SourceStage::Scraped => {
                    self.scrape_stage(&result.profile, &mut result.warnings)
                        .await
                }
                SourceStage::Commit => {
                    self.commit_stage(&result.profile, &mut result.warnings)
                        .await
                }
            };
            if let Some(candidates) = output.filter(|c| !c.is_empty()) {
                debug!(stage = %stage, count = candidates.len(), "stage produced candidates");
                result.emails = dedupe(&candidates);
                result.candidates = candidates;
                result.source_stage = Some(stage);
                break;
            }
        }

        info!(
            login,
            stage = ?result.source_stage,
            emails = result.emails.len(),
            "resolution complete"
        );
        Ok(result)
    }

    fn public_stage(&self, profile: &Profile) -> StageOutput {
        let email = profile.public_email.as_deref()?.trim();
        if email.is_empty() {
            return None;
        }
        Some(vec![CandidateEmail::new(email, SourceStage::Public, None)])
    }

    async fn scrape_stage(
        &self,
        profile: &Profile,
        warnings: &mut Vec<StageWarning>,
    ) -> StageOutput {
        for url in self.links.collect(profile) {
            debug!(url = %url, "scraping candidate URL");
            let raw = match self.scraper.try_scrape(&url).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(url = %url, error = %e, "scrape failed, trying next URL");
                    warnings.push(StageWarning {
                        stage: SourceStage::Scraped,
                        detail: e.to_string(),
                    });
                    continue;
                }
            };
            let found: Vec<CandidateEmail> = raw
                .iter()
                .map(|raw| CandidateEmail::new(raw, SourceStage::Scraped, None))
                .filter(|c| is_valid_email(&c.address))
                .collect();
            if !found.is_empty() {
                info!(url = %url, count = found.len(), "scraped emails");
                return Some(found);
            }
        }
        None
    }

    async fn commit_stage(
        &self,
        profile: &Profile,
        warnings: &mut Vec<StageWarning>,
    ) -> StageOutput {
        match self.miner.mine(self.directory.as_ref(), profile).await {
            Ok(found) => Some(found),
            Err(e) => {
                warn!(error = %e, "commit mining failed, continuing without it");
                warnings.push(StageWarning {
                    stage: SourceStage::Commit,
                    detail: e.to_string(),
                });
                None
            }
        }
    }
}

/// Case-insensitive dedupe preserving first-seen order.
fn dedupe(candidates: &[CandidateEmail]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for c in candidates {
        let address = c.address.to_lowercase();
        if !out.contains(&address) {
            out.push(address);
        }
    }
    out
}
