use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

use crate::config::EmojiConfig;
use crate::GroveError;

/// Why a single combination attempt produced no image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error("rate limited")]
    RateLimited,
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    /// The service does not know this combination
    #[error("combination not available")]
    Unavailable,
}

impl AttemptError {
    /// Transient failures are worth retrying against the same service.
    pub fn is_transient(&self) -> bool {
        match self {
            AttemptError::RateLimited | AttemptError::Timeout | AttemptError::Transport(_) => true,
            AttemptError::Status(code) => *code >= 500,
            AttemptError::Unavailable => false,
        }
    }
}

impl From<reqwest::Error> for AttemptError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AttemptError::Timeout
        } else {
            AttemptError::Transport(e.to_string())
        }
    }
}

/// A source of emoji combination images.
#[async_trait]
pub trait CombinationService: Send + Sync {
    /// Get the service name (e.g., "emoji-kitchen")
    fn service_name(&self) -> &str;

    /// Produce the image bytes for `emoji1` combined with `emoji2`.
    ///
    /// A successful return is not trusted by the resolver; the bytes are
    /// validated again before use.
    async fn attempt_combination(
        &self,
        emoji1: &str,
        emoji2: &str,
        size: u32,
    ) -> Result<Vec<u8>, AttemptError>;
}

/// HTTP client for an Emoji Kitchen mirror serving `/s/{emoji1}_{emoji2}?size=N`.
pub struct EmojiKitchenClient {
    client: Client,
    base_url: String,
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl EmojiKitchenClient {
    /// Create a new client from configuration
    pub fn new(config: &EmojiConfig) -> Result<Self, GroveError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent("Mozilla/5.0 (compatible; RecipeGrove/0.1)")
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_attempts: config.retry_attempts.max(1),
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String, retry_attempts: u32, retry_delay_ms: u64) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_attempts: retry_attempts.max(1),
            retry_delay_ms,
        }
    }

    fn url_for(&self, emoji1: &str, emoji2: &str) -> String {
        format!("{}/s/{}_{}", self.base_url, emoji1.trim(), emoji2.trim())
    }

    async fn fetch_once(&self, url: &str, size: u32) -> Result<Vec<u8>, AttemptError> {
        let response = self
            .client
            .get(url)
            .query(&[("size", size)])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptError::RateLimited);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(AttemptError::Unavailable);
        }
        if !status.is_success() {
            return Err(AttemptError::Status(status.as_u16()));
        }

        let is_image = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("image/"))
            .unwrap_or(true);
        if !is_image {
            return Err(AttemptError::Unavailable);
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl CombinationService for EmojiKitchenClient {
    fn service_name(&self) -> &str {
        "emoji-kitchen"
    }

    async fn attempt_combination(
        &self,
        emoji1: &str,
        emoji2: &str,
        size: u32,
    ) -> Result<Vec<u8>, AttemptError> {
        let url = self.url_for(emoji1, emoji2);
        let mut attempt = 1;

        loop {
            debug!(
                "Requesting {}+{} (attempt {}/{})",
                emoji1, emoji2, attempt, self.retry_attempts
            );

            match self.fetch_once(&url, size).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if e.is_transient() && attempt < self.retry_attempts => {
                    // Exponential backoff: 1x, 2x, 4x ...
                    let delay =
                        Duration::from_millis(self.retry_delay_ms << (attempt - 1).min(16));
                    warn!(
                        "{}+{} failed (attempt {}/{}): {}, retrying in {:?}",
                        emoji1, emoji2, attempt, self.retry_attempts, e, delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
