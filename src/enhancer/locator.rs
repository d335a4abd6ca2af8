//! Resolve semantic placement locations to line indices.
//!
//! All searches are first-match, top to bottom, over the current lines.

/// Section names that target a heading rather than body text.
pub const SECTION_KEYWORDS: &[&str] = &[
    "serving",
    "serving_suggestion",
    "serving_suggestions",
    "notes",
    "note",
    "tips",
    "tip",
];

/// A parsed placement location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location<'a> {
    Title,
    Ingredient(String),
    Step(u32),
    Section(&'a str),
    Keyword(&'a str),
}

impl<'a> Location<'a> {
    pub fn parse(location: &'a str) -> Self {
        if location == "title" {
            return Location::Title;
        }
        if let Some(name) = location.strip_prefix("ingredient_") {
            if !name.is_empty() {
                return Location::Ingredient(name.replace('_', " "));
            }
        }
        if let Some(n) = location.strip_prefix("step_") {
            if let Ok(n) = n.parse::<u32>() {
                if n > 0 {
                    return Location::Step(n);
                }
            }
        }
        if SECTION_KEYWORDS.contains(&location) {
            return Location::Section(location);
        }
        Location::Keyword(location)
    }
}

/// Line index for `location`, or `None` when nothing matches.
pub fn locate<S: AsRef<str>>(lines: &[S], location: &str) -> Option<usize> {
    match Location::parse(location) {
        Location::Title => find_title(lines),
        Location::Ingredient(name) => find_line_containing(lines, &name),
        Location::Step(n) => find_step(lines, n),
        Location::Section(name) => find_section(lines, name),
        Location::Keyword(keyword) => find_line_containing(lines, keyword),
    }
}

/// First top-level heading (`# Title`).
pub fn find_title<S: AsRef<str>>(lines: &[S]) -> Option<usize> {
    lines
        .iter()
        .position(|line| line.as_ref().trim().starts_with("# "))
}

/// Case-insensitive substring search.
pub fn find_line_containing<S: AsRef<str>>(lines: &[S], text: &str) -> Option<usize> {
    let needle = text.to_lowercase();
    if needle.trim().is_empty() {
        return None;
    }
    lines
        .iter()
        .position(|line| line.as_ref().to_lowercase().contains(&needle))
}

/// Numbered step: `N.`, `N)` or `Step N` at the start of the trimmed line.
pub fn find_step<S: AsRef<str>>(lines: &[S], step: u32) -> Option<usize> {
    let patterns = [
        format!("{}.", step),
        format!("{})", step),
        format!("step {}", step),
    ];
    lines.iter().position(|line| {
        let line = line.as_ref().trim().to_lowercase();
        patterns.iter().any(|p| line.starts_with(p.as_str()))
    })
}

/// Heading line whose text mentions the section name.
pub fn find_section<S: AsRef<str>>(lines: &[S], section: &str) -> Option<usize> {
    let terms = [section.to_lowercase(), section.replace('_', " ").to_lowercase()];
    lines.iter().position(|line| {
        let line = line.as_ref().trim().to_lowercase();
        line.starts_with('#') && terms.iter().any(|t| line.contains(t.as_str()))
    })
}
