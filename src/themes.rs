//! Cuisine and seasonal emoji palettes used to steer placement planning.

use chrono::Datelike;

use crate::model::Season;

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeConfig {
    pub name: &'static str,
    /// Emoji that set the mood (flags, symbols)
    pub primary_emojis: &'static [&'static str],
    /// Food emoji to combine with the primary ones
    pub accent_emojis: &'static [&'static str],
    pub description: &'static str,
}

pub const CUISINE_THEMES: &[(&str, ThemeConfig)] = &[
    (
        "asian",
        ThemeConfig {
            name: "Asian Cuisine",
            primary_emojis: &["🐉", "🏮", "🎋", "🥢"],
            accent_emojis: &["🍜", "🥟", "🍱", "🍣", "🥠"],
            description: "Dragon and lantern themes with traditional Asian food items",
        },
    ),
    (
        "italian",
        ThemeConfig {
            name: "Italian Cuisine",
            primary_emojis: &["🇮🇹", "🍷", "🌿", "🏛️"],
            accent_emojis: &["🍝", "🍕", "🧀", "🍅", "🥖"],
            description: "Italian flag and Mediterranean symbols with classic ingredients",
        },
    ),
    (
        "mexican",
        ThemeConfig {
            name: "Mexican Cuisine",
            primary_emojis: &["🇲🇽", "🌵", "🎺", "☀️"],
            accent_emojis: &["🌮", "🌯", "🫔", "🌶️", "🥑"],
            description: "Mexican symbols with traditional spices and ingredients",
        },
    ),
    (
        "mediterranean",
        ThemeConfig {
            name: "Mediterranean Cuisine",
            primary_emojis: &["🌊", "☀️", "🫒", "🏺"],
            accent_emojis: &["🥗", "🐟", "🍋", "🧄", "🌿"],
            description: "Sea and sun themes with fresh Mediterranean ingredients",
        },
    ),
];

const WINTER: ThemeConfig = ThemeConfig {
    name: "Winter Comfort",
    primary_emojis: &["❄️", "☃️", "🔥", "🎄"],
    accent_emojis: &["🍲", "🥘", "☕", "🍵", "🥧", "🎁"],
    description: "Cozy winter themes with comfort foods and warm drinks",
};

const SPRING: ThemeConfig = ThemeConfig {
    name: "Spring Fresh",
    primary_emojis: &["🌸", "🌷", "🦋", "🌱"],
    accent_emojis: &["🥗", "🌿", "🌼", "🐝", "🍓"],
    description: "Fresh spring themes with light dishes and vibrant colors",
};

const SUMMER: ThemeConfig = ThemeConfig {
    name: "Summer Vibes",
    primary_emojis: &["☀️", "🏖️", "🌊", "🌴"],
    accent_emojis: &["🍉", "🍓", "🥤", "🍦", "🏄"],
    description: "Bright summer themes with refreshing foods and drinks",
};

const FALL: ThemeConfig = ThemeConfig {
    name: "Autumn Harvest",
    primary_emojis: &["🍂", "🍁", "🎃", "🌾"],
    accent_emojis: &["🍎", "🍇", "🌰", "🥧", "🦃"],
    description: "Harvest themes with autumn ingredients and warm colors",
};

/// Cuisine theme by name, case-insensitive.
pub fn get_theme(name: &str) -> Option<&'static ThemeConfig> {
    let name = name.trim().to_lowercase();
    CUISINE_THEMES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, theme)| theme)
}

pub fn get_seasonal_theme(season: Season) -> &'static ThemeConfig {
    match season {
        Season::Winter => &WINTER,
        Season::Spring => &SPRING,
        Season::Summer => &SUMMER,
        Season::Fall => &FALL,
    }
}

/// Season for today's local date.
pub fn detect_season() -> Season {
    Season::from_month(chrono::Local::now().month())
}

/// Suggestions offered to the analysis prompt for a season.
pub fn seasonal_emojis(season: Season) -> Vec<&'static str> {
    let theme = get_seasonal_theme(season);
    theme
        .primary_emojis
        .iter()
        .chain(theme.accent_emojis.iter())
        .copied()
        .collect()
}
