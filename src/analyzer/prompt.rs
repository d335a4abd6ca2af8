use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Density, RecipeAnalysis, Season};
use crate::themes::{seasonal_emojis, ThemeConfig};

/// Longest recipe text forwarded to a model, in characters.
pub const MAX_INPUT_CHARS: usize = 50_000;

pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a culinary analyst helping decorate recipes \
with thematic emoji combinations. Always answer with valid JSON only.";

pub const PLANNING_SYSTEM_PROMPT: &str = "You are a playful recipe designer who places \
Emoji Kitchen combinations inside recipes. Always answer with valid JSON only.";

static INJECTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)ignore\s+(previous|all|above)\s+instructions?",
        r"(?i)disregard\s+(previous|all|above)",
        r"(?i)forget\s+(previous|all|above)",
        r"(?i)system\s*prompt",
        r"(?i)you\s+are\s+now",
        r"(?i)new\s+instructions?",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Truncate recipe text and redact common prompt injection phrases.
pub fn sanitize_input(text: &str) -> String {
    let mut text: String = text.chars().take(MAX_INPUT_CHARS).collect();
    for pattern in INJECTION_PATTERNS.iter() {
        text = pattern.replace_all(&text, "[REDACTED]").into_owned();
    }
    text
}

pub fn build_analysis_prompt(markdown: &str, season: Option<Season>) -> String {
    let season_context = match season {
        Some(season) => {
            let suggestions: Vec<&str> = seasonal_emojis(season).into_iter().take(5).collect();
            format!(
                "\n\nCurrent season: {}\nSeasonal emoji suggestions: {}",
                season.as_str(),
                suggestions.join(", ")
            )
        }
        None => String::new(),
    };

    format!(
        r#"You are analyzing a recipe to add thematic emoji combinations.{season_context}

Recipe content:
{recipe}

Tasks:
1. Identify the cuisine type and regional style (e.g., Thai, Japanese, Italian, Mexican)
2. Extract key ingredients
3. Identify cooking techniques used
4. Determine the occasion or context (romantic, quick meal, comfort food, etc.)
5. Identify any dietary tags (vegan, vegetarian, gluten-free, etc.)
6. Suggest an appropriate theme based on the above analysis
7. Recommend an emoji combination strategy

Output your analysis as a JSON object with this exact structure:
{{
    "cuisine_type": "string",
    "regional_style": "string or null",
    "ingredients": ["ingredient1", "ingredient2"],
    "cooking_techniques": ["technique1", "technique2"],
    "occasion": "string or null",
    "dietary_tags": ["tag1", "tag2"],
    "suggested_theme": "string",
    "emoji_strategy": "string describing the emoji combination approach"
}}

Respond with ONLY the JSON object, no additional text."#,
        recipe = sanitize_input(markdown),
    )
}

pub fn build_planning_prompt(
    markdown: &str,
    analysis: &RecipeAnalysis,
    density: Density,
    theme: Option<&ThemeConfig>,
) -> String {
    let key_ingredients: Vec<&str> = analysis
        .ingredients
        .iter()
        .take(5)
        .map(String::as_str)
        .collect();

    let palette = match theme {
        Some(theme) => format!(
            "\nPreferred palette ({}): primary {} / accents {}\n",
            theme.name,
            theme.primary_emojis.join(" "),
            theme.accent_emojis.join(" ")
        ),
        None => String::new(),
    };

    format!(
        r#"Based on this recipe analysis, plan emoji placements.

Recipe:
{recipe}

Analysis:
- Cuisine: {cuisine}
- Regional Style: {regional}
- Theme: {theme_name}
- Strategy: {strategy}
- Key Ingredients: {ingredients}
{palette}
Emoji Density: {density} - {guidance}

For each placement, specify:
- Location identifier (e.g., "title", "ingredient_tomato", "step_1", "serving_suggestion")
- Base emoji 1 (single emoji character)
- Base emoji 2 (single emoji character to combine with emoji 1)
- Context explaining why this combination fits
- Reasoning for the placement

Important guidelines:
- Use emoji combinations that reflect the {theme_name} theme
- Match emojis to specific ingredients or techniques
- Ensure visual variety (don't reuse the same combination)
- Consider the {cuisine} cuisine style

Output as a JSON array with this exact structure:
[
    {{
        "location": "title",
        "emoji_base_1": "🐉",
        "emoji_base_2": "🥟",
        "context": "Dragon represents Asian cuisine power and dumplings are the dish",
        "reasoning": "Title needs strong thematic presence"
    }}
]

Respond with ONLY the JSON array, no additional text."#,
        recipe = sanitize_input(markdown),
        cuisine = analysis.cuisine_type,
        regional = analysis.regional_style.as_deref().unwrap_or("none"),
        theme_name = analysis.suggested_theme,
        strategy = analysis.emoji_strategy,
        ingredients = key_ingredients.join(", "),
        density = density.as_str(),
        guidance = density.guidance(),
    )
}
