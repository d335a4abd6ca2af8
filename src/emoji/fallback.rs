//! Ordered alternatives to try when a combination is not available.

/// Emoji that combine with almost any partner on Emoji Kitchen.
pub const UNIVERSAL_BASES: &[&str] = &["😊", "❤️", "🔥", "⭐"];

/// Pairs built only from universal bases, always kept in the sequence.
const ULTIMATE_PAIRS: &[(&str, &str)] = &[("😊", "❤️"), ("🔥", "⭐")];

pub const DEFAULT_MAX_FALLBACKS: usize = 12;

/// Alternatives for `(emoji1, emoji2)` using the built-in universal bases.
pub fn fallback_combinations(emoji1: &str, emoji2: &str) -> Vec<(String, String)> {
    fallback_combinations_with(emoji1, emoji2, UNIVERSAL_BASES, DEFAULT_MAX_FALLBACKS)
}

/// Alternatives for `(emoji1, emoji2)`, most promising first.
///
/// Order: the swapped pair, then each input paired with every universal base
/// in both directions, then the ultimate pairs. The result is deduplicated,
/// never contains the original pair, and holds at most `max` entries. Room
/// for the ultimate pairs is reserved when `max` leaves space beyond them.
pub fn fallback_combinations_with(
    emoji1: &str,
    emoji2: &str,
    bases: &[&str],
    max: usize,
) -> Vec<(String, String)> {
    let original = (emoji1.to_string(), emoji2.to_string());
    let mut out: Vec<(String, String)> = Vec::new();

    let push = |out: &mut Vec<(String, String)>, a: &str, b: &str| {
        let pair = (a.to_string(), b.to_string());
        if pair != original && !out.contains(&pair) {
            out.push(pair);
        }
    };

    push(&mut out, emoji2, emoji1);

    for &base in bases {
        if base == emoji1 || base == emoji2 {
            continue;
        }
        push(&mut out, emoji1, base);
        push(&mut out, base, emoji1);
        push(&mut out, emoji2, base);
        push(&mut out, base, emoji2);
    }

    let ultimate: Vec<(String, String)> = ULTIMATE_PAIRS
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .filter(|pair| *pair != original)
        .collect();

    // Reserve room for the ultimate pairs only when the swap still fits.
    let reserved = ultimate.iter().filter(|p| !out.contains(p)).count();
    out.truncate(if max > reserved { max - reserved } else { max });

    for (a, b) in &ultimate {
        push(&mut out, a, b);
    }

    out.truncate(max);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn test_swap_comes_first() {
        let fallbacks = fallback_combinations("🐉", "🥟");
        assert_eq!(fallbacks[0], pair("🥟", "🐉"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            fallback_combinations("🐉", "🥟"),
            fallback_combinations("🐉", "🥟")
        );
    }

    #[test]
    fn test_no_original_and_no_duplicates() {
        for (a, b) in [("🐉", "🥟"), ("😊", "❤️"), ("🔥", "🔥"), ("🦐", "⭐")] {
            let fallbacks = fallback_combinations(a, b);
            assert!(!fallbacks.contains(&pair(a, b)));
            for (i, p) in fallbacks.iter().enumerate() {
                assert!(!fallbacks[i + 1..].contains(p), "duplicate {:?}", p);
            }
            assert!(fallbacks.len() <= DEFAULT_MAX_FALLBACKS);
        }
    }

    #[test]
    fn test_universal_pairing_order() {
        let fallbacks = fallback_combinations_with("🐉", "🥟", &["😊"], 20);
        assert_eq!(
            fallbacks,
            vec![
                pair("🥟", "🐉"),
                pair("🐉", "😊"),
                pair("😊", "🐉"),
                pair("🥟", "😊"),
                pair("😊", "🥟"),
                pair("😊", "❤️"),
                pair("🔥", "⭐"),
            ]
        );
    }

    #[test]
    fn test_skips_base_equal_to_input() {
        let fallbacks = fallback_combinations_with("🔥", "🥟", &["🔥", "😊"], 20);
        assert!(!fallbacks.contains(&pair("🔥", "🔥")));
        assert!(fallbacks.contains(&pair("🥟", "😊")));
    }

    #[test]
    fn test_cap_keeps_ultimate_pairs() {
        let fallbacks = fallback_combinations_with("🐉", "🥟", UNIVERSAL_BASES, 5);
        assert_eq!(fallbacks.len(), 5);
        assert_eq!(fallbacks[0], pair("🥟", "🐉"));
        assert!(fallbacks.contains(&pair("😊", "❤️")));
        assert!(fallbacks.contains(&pair("🔥", "⭐")));
    }

    #[test]
    fn test_small_cap_keeps_swap_first() {
        assert_eq!(
            fallback_combinations_with("🐉", "🥟", UNIVERSAL_BASES, 1),
            vec![pair("🥟", "🐉")]
        );
        assert_eq!(
            fallback_combinations_with("🐉", "🥟", UNIVERSAL_BASES, 2),
            vec![pair("🥟", "🐉"), pair("🐉", "😊")]
        );
        assert_eq!(
            fallback_combinations_with("🐉", "🥟", UNIVERSAL_BASES, 3),
            vec![pair("🥟", "🐉"), pair("😊", "❤️"), pair("🔥", "⭐")]
        );
        assert!(fallback_combinations_with("🐉", "🥟", UNIVERSAL_BASES, 0).is_empty());
    }

    #[test]
    fn test_ultimate_pair_equal_to_original_is_excluded() {
        let fallbacks = fallback_combinations("😊", "❤️");
        assert!(!fallbacks.contains(&pair("😊", "❤️")));
        assert!(fallbacks.contains(&pair("🔥", "⭐")));
        assert_eq!(fallbacks[0], pair("❤️", "😊"));
    }
}
