use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use super::fallback::{fallback_combinations_with, UNIVERSAL_BASES};
use super::{is_valid_emoji, CombinationService, EmojiCache, EmojiKitchenClient};
use crate::config::EmojiConfig;
use crate::model::{EmojiPlacement, ResolvedCombinations};
use crate::GroveError;

/// Resolves emoji pairs to cached combination images, falling back to
/// alternative pairs when the requested one is not available.
pub struct EmojiGenerator {
    service: Arc<dyn CombinationService>,
    cache: EmojiCache,
    size: u32,
    max_fallbacks: usize,
    max_concurrent: usize,
}

impl EmojiGenerator {
    pub fn new(service: Arc<dyn CombinationService>, cache: EmojiCache) -> Self {
        Self {
            service,
            cache,
            size: 512,
            max_fallbacks: super::fallback::DEFAULT_MAX_FALLBACKS,
            max_concurrent: 4,
        }
    }

    /// Create a generator backed by the HTTP Emoji Kitchen client
    pub fn from_config(config: &EmojiConfig) -> Result<Self, GroveError> {
        let service = Arc::new(EmojiKitchenClient::new(config)?);
        let cache = EmojiCache::new(config.cache_dir.clone())
            .with_min_bytes(config.min_bytes)
            .with_placeholder_digests(config.placeholder_sha256.clone());

        Ok(Self::new(service, cache)
            .with_size(config.size)
            .with_max_fallbacks(config.max_fallbacks)
            .with_max_concurrent(config.max_concurrent))
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_max_fallbacks(mut self, max_fallbacks: usize) -> Self {
        self.max_fallbacks = max_fallbacks;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn cache(&self) -> &EmojiCache {
        &self.cache
    }

    pub fn fallback_combinations(&self, emoji1: &str, emoji2: &str) -> Vec<(String, String)> {
        fallback_combinations_with(emoji1, emoji2, UNIVERSAL_BASES, self.max_fallbacks)
    }

    /// Resolve a pair to an image on disk.
    ///
    /// Returns `Ok(None)` when the primary pair and every fallback failed;
    /// only invalid emoji input is an error, raised before any I/O.
    pub async fn generate_combination(
        &self,
        emoji1: &str,
        emoji2: &str,
        fallback: bool,
    ) -> Result<Option<PathBuf>, GroveError> {
        if !is_valid_emoji(emoji1) || !is_valid_emoji(emoji2) {
            return Err(GroveError::InvalidEmoji(
                emoji1.to_string(),
                emoji2.to_string(),
            ));
        }

        if let Some(path) = self.try_pair(emoji1, emoji2).await {
            return Ok(Some(path));
        }

        if fallback {
            info!("{}+{} unavailable, trying alternatives", emoji1, emoji2);
            for (alt1, alt2) in self.fallback_combinations(emoji1, emoji2) {
                if let Some(path) = self.try_pair(&alt1, &alt2).await {
                    info!("Using fallback {}+{} for {}+{}", alt1, alt2, emoji1, emoji2);
                    return Ok(Some(path));
                }
            }
        }

        warn!("Failed to generate emoji {}+{}", emoji1, emoji2);
        Ok(None)
    }

    /// Cache lookup, then one service attempt, then validation of its output.
    async fn try_pair(&self, emoji1: &str, emoji2: &str) -> Option<PathBuf> {
        if let Some(path) = self.cache.lookup(emoji1, emoji2).await {
            debug!("Using cached emoji {}+{}", emoji1, emoji2);
            return Some(path);
        }

        let bytes = match self
            .service
            .attempt_combination(emoji1, emoji2, self.size)
            .await
        {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(
                    "{} failed for {}+{}: {}",
                    self.service.service_name(),
                    emoji1,
                    emoji2,
                    e
                );
                return None;
            }
        };

        if !self.cache.is_valid_bytes(&bytes) {
            debug!(
                "Rejected {}+{}: {} bytes, placeholder or too small",
                emoji1,
                emoji2,
                bytes.len()
            );
            return None;
        }

        match self.cache.store(emoji1, emoji2, &bytes).await {
            Ok(path) => {
                info!("Generated emoji {}+{}", emoji1, emoji2);
                Some(path)
            }
            Err(e) => {
                warn!("Could not cache {}+{}: {}", emoji1, emoji2, e);
                None
            }
        }
    }

    /// Resolve every placement concurrently, at most `max_concurrent` in flight.
    ///
    /// The map holds an entry per distinct location; failures are `None`.
    pub async fn resolve_all(&self, placements: &[EmojiPlacement]) -> ResolvedCombinations {
        let results: Vec<(String, Option<PathBuf>)> = stream::iter(placements.iter().map(
            |placement| async move {
                let resolved = match self
                    .generate_combination(&placement.emoji_base_1, &placement.emoji_base_2, true)
                    .await
                {
                    Ok(path) => path,
                    Err(e) => {
                        warn!("Skipping {}: {}", placement.location, e);
                        None
                    }
                };
                (placement.location.clone(), resolved)
            },
        ))
        .buffered(self.max_concurrent)
        .collect()
        .await;

        let mut resolved = ResolvedCombinations::new();
        for (location, path) in results {
            let entry = resolved.entry(location).or_insert(None);
            if entry.is_none() {
                *entry = path;
            }
        }
        resolved
    }
}
