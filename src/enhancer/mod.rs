//! Splice resolved emoji combinations into recipe markdown.
//!
//! The document is a vector of lines. Placements only ever append to an
//! existing line, so line indices stay valid for the whole pass.

pub mod locator;

pub use locator::{locate, Location};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::{EmbeddingMode, EmojiPlacement, ResolvedCombinations};
use crate::GroveError;

pub const DEFAULT_SIDECAR_DIR: &str = "grove-emojis";

#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedRecipe {
    pub text: String,
    /// References actually inserted
    pub placed: usize,
}

/// Inserts emoji references into recipe markdown at planned locations.
#[derive(Debug, Clone)]
pub struct RecipeEnhancer {
    mode: EmbeddingMode,
    sidecar_dir: String,
}

impl Default for RecipeEnhancer {
    fn default() -> Self {
        Self::new(EmbeddingMode::default())
    }
}

impl RecipeEnhancer {
    pub fn new(mode: EmbeddingMode) -> Self {
        Self {
            mode,
            sidecar_dir: DEFAULT_SIDECAR_DIR.to_string(),
        }
    }

    /// Build from a mode name such as `"relative"`.
    pub fn from_mode_name(mode: &str) -> Result<Self, GroveError> {
        Ok(Self::new(mode.parse()?))
    }

    pub fn with_sidecar_dir(mut self, name: impl Into<String>) -> Self {
        self.sidecar_dir = name.into();
        self
    }

    pub fn mode(&self) -> EmbeddingMode {
        self.mode
    }

    pub fn sidecar_dir(&self) -> &str {
        &self.sidecar_dir
    }

    /// Apply placements in order and return the enhanced document.
    ///
    /// Placements without a resolved image or without a matching line are
    /// skipped. When two placements hit the same line, the later one's
    /// reference lands after the earlier one's.
    pub fn enhance_recipe(
        &self,
        markdown: &str,
        placements: &[EmojiPlacement],
        resolved: &ResolvedCombinations,
    ) -> String {
        self.enhance(markdown, placements, resolved).text
    }

    /// Same as [`enhance_recipe`](Self::enhance_recipe), also reporting how
    /// many references were inserted.
    pub fn enhance(
        &self,
        markdown: &str,
        placements: &[EmojiPlacement],
        resolved: &ResolvedCombinations,
    ) -> EnhancedRecipe {
        info!(
            "Enhancing recipe with {} emoji placements",
            placements.len()
        );

        let mut lines: Vec<String> = markdown.split('\n').map(str::to_string).collect();
        let mut placed = 0;

        for placement in placements {
            let artifact = match resolved.get(&placement.location).and_then(|p| p.as_ref()) {
                Some(path) => path,
                None => {
                    warn!("No emoji generated for {}", placement.location);
                    continue;
                }
            };

            let reference = self.format_reference(placement, artifact);

            match locate(&lines, &placement.location) {
                Some(idx) => {
                    lines[idx] = append_to_line(&lines[idx], &reference);
                    placed += 1;
                }
                None => warn!("No line matches location {}", placement.location),
            }
        }

        debug!("Placed {}/{} emojis", placed, placements.len());
        EnhancedRecipe {
            text: lines.join("\n"),
            placed,
        }
    }

    /// Markdown for one placement according to the embedding mode.
    pub fn format_reference(&self, placement: &EmojiPlacement, artifact: &Path) -> String {
        let alt = format!("{}+{}", placement.emoji_base_1, placement.emoji_base_2);

        match self.mode {
            EmbeddingMode::Unicode => placement.emoji_base_1.clone(),
            EmbeddingMode::Relative => {
                let file_name = artifact
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("![{}](./{}/{})", alt, self.sidecar_dir, file_name)
            }
            EmbeddingMode::Absolute => {
                format!("![{}]({})", alt, absolute_path(artifact).display())
            }
            EmbeddingMode::Base64 => match image_to_data_uri(artifact) {
                Ok(uri) => format!("![{}]({})", alt, uri),
                Err(e) => {
                    warn!("Could not embed {}: {}", artifact.display(), e);
                    format!("![{}]({})", alt, absolute_path(artifact).display())
                }
            },
        }
    }

    /// Copy every resolved artifact into the sidecar directory next to `output_path`.
    ///
    /// Files already present under the same name are left alone, so running
    /// this twice is harmless.
    pub fn copy_to_sidecar(
        &self,
        resolved: &ResolvedCombinations,
        output_path: &Path,
    ) -> io::Result<PathBuf> {
        let parent = output_path.parent().unwrap_or_else(|| Path::new("."));
        let sidecar = parent.join(&self.sidecar_dir);
        fs::create_dir_all(&sidecar)?;

        for artifact in resolved.values().flatten() {
            let Some(name) = artifact.file_name() else {
                continue;
            };
            if !artifact.exists() {
                warn!("Emoji file missing: {}", artifact.display());
                continue;
            }
            let dest = sidecar.join(name);
            if dest.exists() {
                continue;
            }
            match fs::copy(artifact, &dest) {
                Ok(_) => debug!("Copied emoji: {}", dest.display()),
                Err(e) => warn!("Could not copy {}: {}", artifact.display(), e),
            }
        }

        Ok(sidecar)
    }
}

/// Append ` reference` to a line, keeping a trailing `\r` at the end.
fn append_to_line(line: &str, reference: &str) -> String {
    match line.strip_suffix('\r') {
        Some(body) => format!("{} {}\r", body, reference),
        None => format!("{} {}", line, reference),
    }
}

fn absolute_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

/// Media type guessed from the file extension.
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "image/png",
    }
}

/// Read an image and encode it as a `data:` URI.
pub fn image_to_data_uri(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(format!(
        "data:{};base64,{}",
        mime_type(path),
        STANDARD.encode(bytes)
    ))
}

/// `<stem><suffix><ext>` next to the input, or inside `output_dir`.
pub fn output_path(input: &Path, suffix: &str, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "recipe".to_string());
    let name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };

    match output_dir {
        Some(dir) => dir.join(name),
        None => input
            .parent()
            .map(|p| p.join(&name))
            .unwrap_or_else(|| PathBuf::from(&name)),
    }
}

/// Write the enhanced recipe, creating parent directories as needed.
pub fn write_output(enhanced: &str, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, enhanced)?;
    info!("Saved enhanced recipe to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RECIPE: &str = "# Pad Thai\n\n## Ingredients\n- Rice noodles\n- Shrimp\n\n## Instructions\n1. Soak noodles\n2. Stir fry";

    fn resolved(entries: &[(&str, Option<&str>)]) -> ResolvedCombinations {
        entries
            .iter()
            .map(|(loc, path)| (loc.to_string(), path.map(PathBuf::from)))
            .collect()
    }

    #[test]
    fn test_enhance_relative() {
        let enhancer = RecipeEnhancer::new(EmbeddingMode::Relative);
        let placements = vec![
            EmojiPlacement::new("title", "🐉", "🍜"),
            EmojiPlacement::new("step_2", "🔥", "🍳"),
        ];
        let map = resolved(&[
            ("title", Some("/cache/u1f409/u1f409_u1f35c.png")),
            ("step_2", Some("/cache/u1f525/u1f525_u1f373.png")),
        ]);

        let out = enhancer.enhance_recipe(RECIPE, &placements, &map);
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(
            lines[0],
            "# Pad Thai ![🐉+🍜](./grove-emojis/u1f409_u1f35c.png)"
        );
        assert_eq!(
            lines[8],
            "2. Stir fry ![🔥+🍳](./grove-emojis/u1f525_u1f373.png)"
        );
        assert_eq!(lines.len(), RECIPE.split('\n').count());
    }

    #[test]
    fn test_unicode_mode_has_no_image_syntax() {
        let enhancer = RecipeEnhancer::new(EmbeddingMode::Unicode);
        let placements = vec![
            EmojiPlacement::new("title", "🐉", "🍜"),
            EmojiPlacement::new("ingredient_shrimp", "🦐", "🔥"),
        ];
        let map = resolved(&[
            ("title", Some("/cache/a.png")),
            ("ingredient_shrimp", Some("/cache/b.png")),
        ]);

        let out = enhancer.enhance_recipe(RECIPE, &placements, &map);
        assert!(!out.contains("!["));
        assert!(!out.contains("]("));
        assert!(out.starts_with("# Pad Thai 🐉\n"));
        assert!(out.contains("- Shrimp 🦐\n"));
    }

    #[test]
    fn test_missing_resolution_and_location_are_skipped() {
        let enhancer = RecipeEnhancer::new(EmbeddingMode::Relative);
        let placements = vec![
            EmojiPlacement::new("dessert", "🍰", "✨"),
            EmojiPlacement::new("step_1", "🍜", "💧"),
            EmojiPlacement::new("title", "🐉", "🍜"),
        ];
        let map = resolved(&[
            ("dessert", Some("/cache/x.png")),
            ("step_1", None),
            ("title", Some("/cache/t.png")),
        ]);

        let enhanced = enhancer.enhance(RECIPE, &placements, &map);
        assert_eq!(enhanced.placed, 1);
        let out = enhanced.text;
        assert!(out.starts_with("# Pad Thai ![🐉+🍜](./grove-emojis/t.png)"));
        assert!(out.contains("\n1. Soak noodles\n"));
        assert!(!out.contains("x.png"));
    }

    #[test]
    fn test_no_matches_leave_document_unchanged() {
        let enhancer = RecipeEnhancer::new(EmbeddingMode::Absolute);
        let placements = vec![EmojiPlacement::new("dessert", "🍰", "✨")];
        let map = resolved(&[("dessert", Some("/cache/x.png"))]);
        assert_eq!(enhancer.enhance_recipe(RECIPE, &placements, &map), RECIPE);
    }

    #[test]
    fn test_same_line_order_follows_input() {
        let enhancer = RecipeEnhancer::new(EmbeddingMode::Unicode);
        let a = EmojiPlacement::new("title", "🐉", "🍜");
        let b = EmojiPlacement::new("pad thai", "🥢", "🍤");
        let map = resolved(&[("title", Some("/c/a.png")), ("pad thai", Some("/c/b.png"))]);

        let ab = enhancer.enhance_recipe(RECIPE, &[a.clone(), b.clone()], &map);
        let ba = enhancer.enhance_recipe(RECIPE, &[b, a], &map);

        assert!(ab.starts_with("# Pad Thai 🐉 🥢\n"));
        assert!(ba.starts_with("# Pad Thai 🥢 🐉\n"));
    }

    #[test]
    fn test_crlf_lines_keep_their_endings() {
        let enhancer = RecipeEnhancer::new(EmbeddingMode::Unicode);
        let placements = vec![EmojiPlacement::new("title", "🐉", "🍜")];
        let map = resolved(&[("title", Some("/c/a.png"))]);

        let out = enhancer.enhance_recipe("# Soup\r\nBody\r\n", &placements, &map);
        assert_eq!(out, "# Soup 🐉\r\nBody\r\n");
    }

    #[test]
    fn test_base64_reference() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("u1f409_u1f35c.png");
        fs::write(&artifact, b"png!").unwrap();

        let enhancer = RecipeEnhancer::new(EmbeddingMode::Base64);
        let reference =
            enhancer.format_reference(&EmojiPlacement::new("title", "🐉", "🍜"), &artifact);
        assert_eq!(reference, "![🐉+🍜](data:image/png;base64,cG5nIQ==)");
    }

    #[test]
    fn test_absolute_reference() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("a.png");
        fs::write(&artifact, b"png").unwrap();

        let enhancer = RecipeEnhancer::new(EmbeddingMode::Absolute);
        let reference =
            enhancer.format_reference(&EmojiPlacement::new("title", "🐉", "🍜"), &artifact);
        let expected = fs::canonicalize(&artifact).unwrap();
        assert_eq!(reference, format!("![🐉+🍜]({})", expected.display()));
    }

    #[test]
    fn test_copy_to_sidecar_is_idempotent() {
        let cache = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let a = cache.path().join("u1f409_u1f35c.png");
        let b = cache.path().join("u1f525_u1f373.png");
        fs::write(&a, b"aaaa").unwrap();
        fs::write(&b, b"bbbb").unwrap();

        let mut map = ResolvedCombinations::new();
        map.insert("title".to_string(), Some(a));
        map.insert("step_1".to_string(), Some(b));
        map.insert("step_2".to_string(), None);
        map.insert("notes".to_string(), Some(cache.path().join("missing.png")));

        let enhancer = RecipeEnhancer::default();
        let output = out.path().join("recipe-grove.md");
        let first = enhancer.copy_to_sidecar(&map, &output).unwrap();
        let second = enhancer.copy_to_sidecar(&map, &output).unwrap();
        assert_eq!(first, second);

        let mut names: Vec<String> = fs::read_dir(&first)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["u1f409_u1f35c.png", "u1f525_u1f373.png"]);
        assert_eq!(fs::read(first.join("u1f409_u1f35c.png")).unwrap(), b"aaaa");
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("/r/pad-thai.md"), "-grove", None),
            PathBuf::from("/r/pad-thai-grove.md")
        );
        assert_eq!(
            output_path(Path::new("/r/pad-thai.md"), "-grove", Some(Path::new("/out"))),
            PathBuf::from("/out/pad-thai-grove.md")
        );
        assert_eq!(
            output_path(Path::new("notes"), "-grove", None),
            PathBuf::from("notes-grove")
        );
    }

    #[test]
    fn test_from_mode_name() {
        assert_eq!(
            RecipeEnhancer::from_mode_name("base64").unwrap().mode(),
            EmbeddingMode::Base64
        );
        assert!(matches!(
            RecipeEnhancer::from_mode_name("inline"),
            Err(GroveError::InvalidEmbeddingMode(_))
        ));
    }
}
