use config::{Config, ConfigError, Environment, File, FileFormat, FileSourceFile};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::model::{Density, EmbeddingMode};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct GroveConfig {
    /// Provider used for analysis when fallback is disabled
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderConfig>,
    /// Fallback configuration for automatic provider switching
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Emoji Kitchen client and cache settings
    #[serde(default)]
    pub emoji: EmojiConfig,
    /// How the enhanced recipe is written
    #[serde(default)]
    pub output: OutputConfig,
    /// LLM request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Configuration for a specific LLM provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    pub enabled: bool,
    /// Model identifier (e.g., "anthropic/claude-3.5-sonnet")
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

/// Configuration for provider fallback and retry behavior
#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    /// Whether fallback is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Order of providers to try (first to last)
    #[serde(default)]
    pub order: Vec<String>,
    /// Number of retry attempts per provider before fallback
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Initial delay between retries in milliseconds (uses exponential backoff)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            order: Vec::new(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Emoji Kitchen client and cache settings
#[derive(Debug, Deserialize, Clone)]
pub struct EmojiConfig {
    /// Directory holding generated combinations
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Base URL of the combination service
    #[serde(default = "default_kitchen_url")]
    pub base_url: String,
    /// Requested image size in pixels
    #[serde(default = "default_size")]
    pub size: u32,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_emoji")]
    pub timeout: u64,
    /// Maximum number of combination requests in flight
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Attempts per request when rate limited or the network fails
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Initial backoff delay in milliseconds, doubled per attempt
    #[serde(default = "default_emoji_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Artifacts smaller than this are treated as broken
    #[serde(default = "default_min_bytes")]
    pub min_bytes: u64,
    /// SHA-256 digests (hex) of the service's "no such combination" image
    #[serde(default)]
    pub placeholder_sha256: Vec<String>,
    /// Upper bound on fallback pairs tried after the primary fails
    #[serde(default = "default_max_fallbacks")]
    pub max_fallbacks: usize,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            base_url: default_kitchen_url(),
            size: default_size(),
            timeout: default_timeout_emoji(),
            max_concurrent: default_max_concurrent(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_emoji_retry_delay_ms(),
            min_bytes: default_min_bytes(),
            placeholder_sha256: Vec::new(),
            max_fallbacks: default_max_fallbacks(),
        }
    }
}

/// How the enhanced recipe is written
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default)]
    pub embedding_mode: EmbeddingMode,
    #[serde(default)]
    pub density: Density,
    /// Inserted between the input file stem and extension
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Sidecar directory name used by relative embedding
    #[serde(default = "default_sidecar_dir")]
    pub sidecar_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            embedding_mode: EmbeddingMode::default(),
            density: Density::default(),
            suffix: default_suffix(),
            sidecar_dir: default_sidecar_dir(),
        }
    }
}

impl Default for GroveConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: default_providers(),
            fallback: FallbackConfig::default(),
            emoji: EmojiConfig::default(),
            output: OutputConfig::default(),
            timeout: default_timeout(),
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "openrouter".to_string()
}

fn default_providers() -> HashMap<String, ProviderConfig> {
    let mut providers = HashMap::new();
    providers.insert(
        "openrouter".to_string(),
        ProviderConfig {
            enabled: true,
            model: "anthropic/claude-3.5-sonnet".to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        },
    );
    providers
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_emoji_retry_delay_ms() -> u64 {
    500
}

fn default_timeout() -> u64 {
    60
}

fn default_timeout_emoji() -> u64 {
    30
}

fn default_cache_dir() -> PathBuf {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache").join("recipegrove").join("emojis")
}

fn default_kitchen_url() -> String {
    "https://emojik.vercel.app".to_string()
}

fn default_size() -> u32 {
    512
}

fn default_max_concurrent() -> usize {
    4
}

fn default_min_bytes() -> u64 {
    1024
}

fn default_max_fallbacks() -> usize {
    12
}

fn default_suffix() -> String {
    "-grove".to_string()
}

fn default_sidecar_dir() -> String {
    "grove-emojis".to_string()
}

impl GroveConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPEGROVE__ prefix
    /// 2. recipegrove.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPEGROVE__EMOJI__CACHE_DIR
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`GroveConfig::load`] for the source priority.
pub fn load_config() -> Result<GroveConfig, ConfigError> {
    // Optional config file (can be missing)
    load_with(File::with_name("recipegrove").required(false))
}

/// Like [`load_config`], reading the optional file at `path` instead of
/// `recipegrove.toml` in the working directory.
pub fn load_config_from(path: &Path) -> Result<GroveConfig, ConfigError> {
    load_with(File::from(path).required(false))
}

fn load_with(file: File<FileSourceFile, FileFormat>) -> Result<GroveConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(file)
        // Use double underscore for nested: RECIPEGROVE__PROVIDERS__OPENROUTER__API_KEY
        .add_source(
            Environment::with_prefix("RECIPEGROVE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
