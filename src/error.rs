use thiserror::Error;

/// Errors that can occur while enhancing a recipe
#[derive(Error, Debug)]
pub enum GroveError {
    /// An emoji input failed the validity check
    #[error("Invalid emoji characters: {0:?}, {1:?}")]
    InvalidEmoji(String, String),

    /// A planned placement is missing a field or carries bad emoji
    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    /// Unknown embedding mode name
    #[error("Invalid embedding mode: {0}")]
    InvalidEmbeddingMode(String),

    /// Recipe text is empty after reading
    #[error("Recipe text cannot be empty")]
    EmptyRecipe,

    /// HTTP request failed
    #[error("Failed to fetch: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The combination service returned something unusable
    #[error("Combination service error: {0}")]
    Service(String),

    /// Recipe analysis or placement planning failed
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
