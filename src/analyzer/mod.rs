//! Recipe analysis and emoji placement planning through an LLM provider.

pub mod extract;
pub mod prompt;

use log::{debug, info, warn};
use serde_json::Value;

use crate::config::GroveConfig;
use crate::model::{Density, EmojiPlacement, RecipeAnalysis, Season};
use crate::providers::{FallbackProvider, LlmProvider};
use crate::themes::ThemeConfig;
use crate::GroveError;

pub use extract::extract_json;
pub use prompt::sanitize_input;

const ANALYSIS_TEMPERATURE: f32 = 0.3;
const PLANNING_TEMPERATURE: f32 = 0.7;

pub struct RecipeAnalyzer {
    provider: Box<dyn LlmProvider>,
}

impl RecipeAnalyzer {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Build an analyzer backed by the configured provider chain.
    pub fn from_config(config: &GroveConfig) -> Result<Self, GroveError> {
        let provider =
            FallbackProvider::new(config).map_err(|e| GroveError::Analysis(e.to_string()))?;
        Ok(Self::new(Box::new(provider)))
    }

    pub async fn analyze_recipe(
        &self,
        markdown: &str,
        season: Option<Season>,
    ) -> Result<RecipeAnalysis, GroveError> {
        info!("Analyzing recipe with {}", self.provider.provider_name());
        let user = prompt::build_analysis_prompt(markdown, season);
        let content = self
            .provider
            .complete(prompt::ANALYSIS_SYSTEM_PROMPT, &user, ANALYSIS_TEMPERATURE)
            .await
            .map_err(|e| GroveError::Analysis(e.to_string()))?;

        let analysis = parse_analysis(&content)?;
        info!(
            "Analysis complete (cuisine: {}, theme: {})",
            analysis.cuisine_type, analysis.suggested_theme
        );
        Ok(analysis)
    }

    pub async fn plan_placements(
        &self,
        markdown: &str,
        analysis: &RecipeAnalysis,
        density: Density,
        theme: Option<&ThemeConfig>,
    ) -> Result<Vec<EmojiPlacement>, GroveError> {
        info!("Planning {} density emoji placements", density.as_str());
        let user = prompt::build_planning_prompt(markdown, analysis, density, theme);
        let content = self
            .provider
            .complete(prompt::PLANNING_SYSTEM_PROMPT, &user, PLANNING_TEMPERATURE)
            .await
            .map_err(|e| GroveError::Analysis(e.to_string()))?;

        let placements = parse_placements(&content)?;
        info!("Planned {} emoji placements", placements.len());
        Ok(placements)
    }
}

pub fn parse_analysis(content: &str) -> Result<RecipeAnalysis, GroveError> {
    let value = extract_json(content).map_err(GroveError::Analysis)?;
    serde_json::from_value(value)
        .map_err(|e| GroveError::Analysis(format!("invalid analysis structure: {}", e)))
}

/// Parse and validate placements. Accepts a bare array or `{"placements": [...]}`.
/// Entries that decode but fail validation are dropped with a warning.
pub fn parse_placements(content: &str) -> Result<Vec<EmojiPlacement>, GroveError> {
    let value = extract_json(content).map_err(GroveError::Analysis)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("placements") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(GroveError::InvalidPlacement(
                    "expected a JSON array of placements".to_string(),
                ))
            }
        },
        other => {
            warn!("Unexpected placement payload: {}", other);
            return Err(GroveError::InvalidPlacement(
                "expected a JSON array of placements".to_string(),
            ));
        }
    };

    let mut placements = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let placement: EmojiPlacement = serde_json::from_value(item)
            .map_err(|e| GroveError::InvalidPlacement(format!("entry {}: {}", index, e)))?;
        if let Err(e) = placement.validate() {
            warn!("Skipping placement {}: {}", index, e);
            continue;
        }
        debug!(
            "Placement {} -> {} + {}",
            placement.location, placement.emoji_base_1, placement.emoji_base_2
        );
        placements.push(placement);
    }
    Ok(placements)
}
