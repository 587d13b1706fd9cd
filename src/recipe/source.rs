//! Where recipe text comes from: typed text, a speech transcript, or a URL.

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::FetchConfig;

/// Text served by [`StaticRecipeFetcher`]
pub const SAMPLE_RECIPE: &str = "Delicious Pasta Recipe

Ingredients:
- 2 cups pasta
- 1 tbsp olive oil
- 2 cloves garlic
- 1 cup tomatoes
- Salt and pepper to taste

Instructions:
1. Boil water and cook pasta for 8-10 minutes
2. Heat olive oil in a pan
3. Add garlic and cook for 1 minute
4. Add tomatoes and simmer for 5 minutes
5. Mix with pasta and season with salt and pepper";

/// Errors from fetching a recipe page
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid recipe URL '{0}'")]
    InvalidUrl(String),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{0} returned no readable text")]
    Empty(String),
}

impl FetchError {
    /// Timeouts, connection drops and 5xx/429 responses are worth retrying
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Request { source, .. } => source.is_timeout() || source.is_connect(),
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::InvalidUrl(_) | FetchError::Empty(_) => false,
        }
    }
}

/// Speech-to-text output, accumulated fragment by fragment.
///
/// Only final fragments count as recipe text; interim fragments are shown to
/// the user while they are still speaking and replaced on every update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    finals: Vec<String>,
    interim: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_final(&mut self, fragment: impl Into<String>) {
        self.finals.push(fragment.into());
        self.interim.clear();
    }

    pub fn set_interim(&mut self, fragment: impl Into<String>) {
        self.interim = fragment.into();
    }

    pub fn final_text(&self) -> String {
        self.finals.concat()
    }

    pub fn interim_text(&self) -> &str {
        &self.interim
    }

    pub fn is_empty(&self) -> bool {
        self.finals.iter().all(|f| f.trim().is_empty())
    }

    /// Status line shown while recording
    pub fn status_line(&self) -> String {
        if self.interim.is_empty() {
            format!("Recorded: {}", self.final_text())
        } else {
            format!("Recorded: {} ({})", self.final_text(), self.interim)
        }
    }
}

/// Recipe text as supplied by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeInput {
    Text(String),
    Transcript(Transcript),
    Url(String),
}

/// Turns a URL into raw recipe text
#[async_trait]
pub trait RecipeFetcher: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Always returns [`SAMPLE_RECIPE`]; for demo mode and tests
#[derive(Debug, Clone, Default)]
pub struct StaticRecipeFetcher;

#[async_trait]
impl RecipeFetcher for StaticRecipeFetcher {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
        Ok(SAMPLE_RECIPE.to_string())
    }
}

/// Fetches a page over HTTP and reduces it to plain text lines
pub struct HttpRecipeFetcher {
    client: reqwest::Client,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl HttpRecipeFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("sous/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        })
    }

    fn retry_strategy(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries)
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        let text = html_to_text(&body);
        if text.trim().is_empty() {
            return Err(FetchError::Empty(url.to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl RecipeFetcher for HttpRecipeFetcher {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let op = || async { self.fetch_once(url).await };
        let text = op
            .retry(self.retry_strategy())
            .when(FetchError::is_transient)
            .notify(|err, dur| {
                warn!("Retrying recipe fetch after {:?}: {}", dur, err);
            })
            .await?;

        debug!(bytes = text.len(), "Fetched recipe page");
        Ok(text)
    }
}

static SCRIPT_OR_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").expect("valid script regex")
});
static BLOCK_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<\s*(br|/p|/li|/h[1-6]|/div|/tr)[^>]*>").expect("valid break regex")
});
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Strip markup so the line-based parser sees one instruction per line.
/// Plain text passes through untouched apart from blank-line cleanup.
pub fn html_to_text(body: &str) -> String {
    let without_scripts = SCRIPT_OR_STYLE.replace_all(body, "");
    let with_breaks = BLOCK_BREAK.replace_all(&without_scripts, "\n");
    let stripped = TAG.replace_all(&with_breaks, "");

    stripped
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
