//! Candidate URL collection from a profile's homepage and social links.

use tracing::debug;

use crate::models::Profile;

/// Builds the ordered list of external URLs worth scraping for a profile.
#[derive(Debug, Clone)]
pub struct ProfileLinkCollector {
    /// Lowercased provider fragments; a link is dropped when its provider
    /// contains any of them.
    disallowed: Vec<String>,
}

impl ProfileLinkCollector {
    pub fn new<I, S>(disallowed_providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            disallowed: disallowed_providers
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    fn is_disallowed(&self, provider: &str) -> bool {
        let provider = provider.to_lowercase();
        self.disallowed.iter().any(|d| provider.contains(d.as_str()))
    }

    /// Surviving social URLs in listing order; they replace the homepage
    /// entirely. The homepage is used only when no social URL survives.
    pub fn collect(&self, profile: &Profile) -> Vec<String> {
        let social: Vec<String> = profile
            .social_links
            .iter()
            .filter(|link| !self.is_disallowed(&link.provider))
            .map(|link| link.url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();

        if !social.is_empty() {
            debug!(login = %profile.login, count = social.len(), "using social links");
            return social;
        }

        match profile
            .homepage_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
        {
            Some(homepage) => vec![homepage.to_string()],
            None => Vec::new(),
        }
    }
}
