//! HTTP page scraper for contact addresses.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::{debug, instrument, warn};

use crate::config::ScraperConfig;
use crate::directory::Scraper;
use crate::email::extract_emails;
use crate::errors::ScrapeError;

/// Fetches a page over HTTP(S) and extracts addresses from its body.
#[derive(Clone)]
pub struct HttpScraper {
    http: reqwest::Client,
    timeout_secs: u64,
    max_body_bytes: usize,
}

impl HttpScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,text/plain;q=0.9,*/*;q=0.5"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self {
            http,
            timeout_secs: config.timeout_secs,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Fetch `url` and return its (possibly truncated) body text.
    pub async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let url = normalize_url(url)?;
        let mut resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::BadStatus {
                url,
                status: status.as_u16(),
            });
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| self.transport_error(&url, e))?
        {
            let room = self.max_body_bytes.saturating_sub(body.len());
            body.extend_from_slice(&chunk[..chunk.len().min(room)]);
            if body.len() >= self.max_body_bytes {
                debug!(url = %url, limit = self.max_body_bytes, "body truncated");
                break;
            }
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> ScrapeError {
        if err.is_timeout() {
            ScrapeError::Timeout {
                url: url.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            ScrapeError::HttpError(err)
        }
    }
}

#[async_trait]
impl Scraper for HttpScraper {
    async fn scrape(&self, url: &str) -> Vec<String> {
        match self.try_scrape(url).await {
            Ok(emails) => emails,
            Err(e) => {
                warn!(url, error = %e, "scrape failed, treating as empty");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self))]
    async fn try_scrape(&self, url: &str) -> Result<Vec<String>, ScrapeError> {
        let body = self.fetch(url).await?;
        let emails = extract_emails(&body);
        debug!(count = emails.len(), "scraped page");
        Ok(emails)
    }
}

/// Profiles often list bare hosts such as `example.com`; assume https.
fn normalize_url(url: &str) -> Result<String, ScrapeError> {
    let trimmed = url.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(ScrapeError::UnsupportedUrl(url.to_string()));
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Ok(trimmed.to_string());
    }
    if trimmed.contains("://") || lower.starts_with("mailto:") || lower.starts_with("javascript:") {
        return Err(ScrapeError::UnsupportedUrl(url.to_string()));
    }
    Ok(format!("https://{}", trimmed))
}
