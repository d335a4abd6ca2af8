use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::emoji::is_valid_emoji;
use crate::GroveError;

/// One planned emoji insertion point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojiPlacement {
    /// `title`, `ingredient_<name>`, `step_<N>`, a section keyword or free text
    pub location: String,
    pub emoji_base_1: String,
    pub emoji_base_2: String,
    /// Why this combination fits
    pub context: String,
    pub reasoning: String,
}

impl EmojiPlacement {
    pub fn new(location: &str, emoji_base_1: &str, emoji_base_2: &str) -> Self {
        Self {
            location: location.to_string(),
            emoji_base_1: emoji_base_1.to_string(),
            emoji_base_2: emoji_base_2.to_string(),
            context: String::new(),
            reasoning: String::new(),
        }
    }

    /// Check the structural invariants a placement must satisfy before use.
    pub fn validate(&self) -> Result<(), GroveError> {
        if self.location.trim().is_empty() {
            return Err(GroveError::InvalidPlacement(
                "location cannot be empty".to_string(),
            ));
        }
        if !is_valid_emoji(&self.emoji_base_1) || !is_valid_emoji(&self.emoji_base_2) {
            return Err(GroveError::InvalidPlacement(format!(
                "{}: not a usable emoji pair ({:?}, {:?})",
                self.location, self.emoji_base_1, self.emoji_base_2
            )));
        }
        Ok(())
    }
}

/// Structured result of the recipe analysis step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeAnalysis {
    pub cuisine_type: String,
    #[serde(default)]
    pub regional_style: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub cooking_techniques: Vec<String>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    pub suggested_theme: String,
    pub emoji_strategy: String,
}

/// Location → generated artifact, `None` when every attempt failed.
pub type ResolvedCombinations = HashMap<String, Option<PathBuf>>;

/// How a generated emoji image is referenced from the output document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingMode {
    /// Literal first base emoji, no image
    Unicode,
    /// `./<sidecar>/<file>`, artifacts copied next to the output
    #[default]
    Relative,
    /// Fully resolved filesystem path
    Absolute,
    /// Inline `data:` URI
    Base64,
}

impl EmbeddingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingMode::Unicode => "unicode",
            EmbeddingMode::Relative => "relative",
            EmbeddingMode::Absolute => "absolute",
            EmbeddingMode::Base64 => "base64",
        }
    }
}

impl FromStr for EmbeddingMode {
    type Err = GroveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unicode" => Ok(EmbeddingMode::Unicode),
            "relative" => Ok(EmbeddingMode::Relative),
            "absolute" => Ok(EmbeddingMode::Absolute),
            "base64" => Ok(EmbeddingMode::Base64),
            other => Err(GroveError::InvalidEmbeddingMode(other.to_string())),
        }
    }
}

impl fmt::Display for EmbeddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many placements the planner is asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Low,
    #[default]
    Medium,
    High,
}

impl Density {
    pub fn as_str(&self) -> &'static str {
        match self {
            Density::Low => "low",
            Density::Medium => "medium",
            Density::High => "high",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            Density::Low => "Place 3-5 emojis total, only in key locations",
            Density::Medium => "Place 5-10 emojis, balanced throughout the recipe",
            Density::High => "Place 10-15 emojis, creating rich visual interest",
        }
    }
}

impl FromStr for Density {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Density::Low),
            "medium" => Ok(Density::Medium),
            "high" => Ok(Density::High),
            other => Err(format!("unknown density: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Meteorological season for a month number (1-12).
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Fall,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            other => Err(format!("unknown season: {}", other)),
        }
    }
}
