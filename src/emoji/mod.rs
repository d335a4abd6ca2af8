//! Emoji Kitchen integration: validity checks, canonical keys, fallback
//! planning, the on-disk cache and the combination resolver.

pub mod cache;
pub mod fallback;
pub mod generator;
pub mod kitchen;

pub use cache::EmojiCache;
pub use fallback::{fallback_combinations, UNIVERSAL_BASES};
pub use generator::EmojiGenerator;
pub use kitchen::{AttemptError, CombinationService, EmojiKitchenClient};

/// Codepoint ranges that count as pictographic for input validation.
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F000, 0x1F0FF), // mahjong, domino, playing cards
    (0x1F100, 0x1F1FF), // enclosed alphanumerics, regional indicators
    (0x1F200, 0x1F2FF), // enclosed ideographic supplement
    (0x1F300, 0x1F5FF), // symbols & pictographs
    (0x1F600, 0x1F64F), // emoticons
    (0x1F680, 0x1F6FF), // transport & map
    (0x1F700, 0x1F7FF), // alchemical, geometric shapes extended
    (0x1F800, 0x1F8FF), // supplemental arrows-c
    (0x1F900, 0x1F9FF), // supplemental symbols & pictographs
    (0x1FA00, 0x1FAFF), // chess, symbols & pictographs extended-a
    (0x2300, 0x23FF),   // misc technical (watch, hourglass)
    (0x2600, 0x26FF),   // misc symbols
    (0x2700, 0x27BF),   // dingbats
    (0x2B00, 0x2BFF),   // stars, squares
    (0x2190, 0x21FF),   // arrows
    (0x2100, 0x214F),   // letterlike symbols
    (0x24C2, 0x24C2),
    (0x25A0, 0x25FF),   // geometric shapes
    (0x00A9, 0x00A9),
    (0x00AE, 0x00AE),
    (0x203C, 0x203C),
    (0x2049, 0x2049),
    (0x3030, 0x3030),
    (0x303D, 0x303D),
    (0x3297, 0x3297),
    (0x3299, 0x3299),
];

fn is_pictographic(c: char) -> bool {
    let cp = c as u32;
    EMOJI_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&cp))
}

/// Whether `emoji` is usable as a combination input.
///
/// Multi-codepoint graphemes (flags, ZWJ sequences, variation selectors)
/// pass as long as at least one codepoint is pictographic.
pub fn is_valid_emoji(emoji: &str) -> bool {
    let trimmed = emoji.trim();
    !trimmed.is_empty() && trimmed.chars().any(is_pictographic)
}

/// Codepoint id for a single emoji, e.g. `❤️` → `u2764-ufe0f`.
pub fn codepoint_id(emoji: &str) -> String {
    emoji
        .trim()
        .chars()
        .map(|c| format!("u{:x}", c as u32))
        .collect::<Vec<_>>()
        .join("-")
}

/// Canonical, filesystem-safe key for an ordered emoji pair.
///
/// `("🐉", "🥟")` → `u1f409_u1f95f`. The order is significant.
pub fn combination_key(emoji1: &str, emoji2: &str) -> String {
    format!("{}_{}", codepoint_id(emoji1), codepoint_id(emoji2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_emoji() {
        assert!(is_valid_emoji("😊"));
        assert!(is_valid_emoji("🐉"));
        assert!(is_valid_emoji("🥟"));
        assert!(is_valid_emoji("❤️"));
        assert!(is_valid_emoji("⭐"));
        assert!(is_valid_emoji("🇮🇹"));
        assert!(!is_valid_emoji(""));
        assert!(!is_valid_emoji("   "));
        assert!(!is_valid_emoji("abc"));
        assert!(!is_valid_emoji("123"));
        assert!(!is_valid_emoji("麺"));
    }

    #[test]
    fn test_symbol_emoji_with_presentation_selector() {
        for emoji in ["▶️", "◀️", "▪️", "Ⓜ️", "‼️", "ℹ️", "©️", "®️", "⁉️"] {
            assert!(is_valid_emoji(emoji), "{} should be accepted", emoji);
        }
    }

    #[test]
    fn test_codepoint_id() {
        assert_eq!(codepoint_id("🐉"), "u1f409");
        assert_eq!(codepoint_id("❤️"), "u2764-ufe0f");
        assert_eq!(codepoint_id("🇮🇹"), "u1f1ee-u1f1f9");
    }

    #[test]
    fn test_combination_key_is_ordered_and_safe() {
        let key = combination_key("🐉", "🥟");
        assert_eq!(key, "u1f409_u1f95f");
        assert_ne!(key, combination_key("🥟", "🐉"));
        assert!(key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
    }
}
