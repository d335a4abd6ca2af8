//! End-to-end run: read, analyze, plan, resolve, enhance, write.

use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::analyzer::RecipeAnalyzer;
use crate::config::GroveConfig;
use crate::emoji::EmojiGenerator;
use crate::enhancer::{output_path, write_output, RecipeEnhancer};
use crate::export::{self, HtmlExporter};
use crate::model::{Density, EmbeddingMode, EmojiPlacement, RecipeAnalysis, Season};
use crate::themes::{get_seasonal_theme, get_theme, ThemeConfig};
use crate::GroveError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Html,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Per-run choices, usually mapped from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Cuisine theme name; `None` lets the analysis pick
    pub theme: Option<String>,
    pub season: Option<Season>,
    pub density: Density,
    pub output_dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub shopping_list: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub planned: usize,
    pub resolved: usize,
    pub placed: usize,
    pub output: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub shopping_list: Option<PathBuf>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Emojis planned:  {}", self.planned)?;
        writeln!(f, "Emojis resolved: {}", self.resolved)?;
        write!(f, "Emojis placed:   {}", self.placed)?;
        for (label, path) in [
            ("Output", &self.output),
            ("HTML export", &self.html),
            ("Shopping list", &self.shopping_list),
        ] {
            if let Some(path) = path {
                write!(f, "\n{}: {}", label, path.display())?;
            }
        }
        Ok(())
    }
}

pub struct GrovePipeline {
    analyzer: RecipeAnalyzer,
    generator: EmojiGenerator,
    enhancer: RecipeEnhancer,
    suffix: String,
}

impl GrovePipeline {
    pub fn new(analyzer: RecipeAnalyzer, generator: EmojiGenerator, enhancer: RecipeEnhancer) -> Self {
        Self {
            analyzer,
            generator,
            enhancer,
            suffix: "-grove".to_string(),
        }
    }

    pub fn from_config(config: &GroveConfig) -> Result<Self, GroveError> {
        let analyzer = RecipeAnalyzer::from_config(config)?;
        let generator = EmojiGenerator::from_config(&config.emoji)?;
        let enhancer = RecipeEnhancer::new(config.output.embedding_mode)
            .with_sidecar_dir(config.output.sidecar_dir.clone());
        Ok(Self::new(analyzer, generator, enhancer).with_suffix(config.output.suffix.clone()))
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn generator(&self) -> &EmojiGenerator {
        &self.generator
    }

    /// Analysis and placement planning only.
    pub async fn plan(
        &self,
        markdown: &str,
        options: &RunOptions,
    ) -> Result<(RecipeAnalysis, Vec<EmojiPlacement>), GroveError> {
        let analysis = self.analyzer.analyze_recipe(markdown, options.season).await?;
        let theme = pick_theme(options, &analysis);
        if let Some(theme) = theme {
            debug!("Using theme palette {}", theme.name);
        }
        let placements = self
            .analyzer
            .plan_placements(markdown, &analysis, options.density, theme)
            .await?;
        Ok((analysis, placements))
    }

    pub async fn run(&self, input: &Path, options: &RunOptions) -> Result<RunSummary, GroveError> {
        info!("Processing {}", input.display());
        let markdown = tokio::fs::read_to_string(input).await?;
        if markdown.trim().is_empty() {
            return Err(GroveError::EmptyRecipe);
        }

        let (_, placements) = self.plan(&markdown, options).await?;
        let mut summary = RunSummary {
            planned: placements.len(),
            ..Default::default()
        };

        if options.dry_run {
            for placement in &placements {
                info!(
                    "[dry run] {}: {} + {} ({})",
                    placement.location,
                    placement.emoji_base_1,
                    placement.emoji_base_2,
                    placement.context
                );
            }
            return Ok(summary);
        }

        let resolved = self.generator.resolve_all(&placements).await;
        summary.resolved = resolved.values().filter(|p| p.is_some()).count();
        info!(
            "Generated {}/{} emojis",
            summary.resolved,
            resolved.len()
        );

        let enhanced = self.enhancer.enhance(&markdown, &placements, &resolved);
        summary.placed = enhanced.placed;

        let out_path = output_path(input, &self.suffix, options.output_dir.as_deref());
        write_output(&enhanced.text, &out_path)?;

        if self.enhancer.mode() == EmbeddingMode::Relative {
            let sidecar = self.enhancer.copy_to_sidecar(&resolved, &out_path)?;
            debug!("Emoji files copied to {}", sidecar.display());
        }

        if options.format == OutputFormat::Html {
            let exporter = match self.enhancer.mode() {
                EmbeddingMode::Base64 => HtmlExporter::with_embedded_images(
                    out_path.parent().unwrap_or_else(|| Path::new(".")),
                ),
                _ => HtmlExporter::new(),
            };
            let title = export::recipe_title(&markdown).unwrap_or("Recipe");
            let html_path = export::html_path(&out_path);
            write_output(&exporter.export(&enhanced.text, title), &html_path)?;
            summary.html = Some(html_path);
        }

        if options.shopping_list {
            let list_path = export::shopping_list_path(input, options.output_dir.as_deref());
            write_output(&export::generate_shopping_list(&markdown), &list_path)?;
            summary.shopping_list = Some(list_path);
        }

        summary.output = Some(out_path);
        Ok(summary)
    }
}

/// Explicit theme, else the analysis suggestion, else the season's palette.
fn pick_theme(options: &RunOptions, analysis: &RecipeAnalysis) -> Option<&'static ThemeConfig> {
    if let Some(name) = &options.theme {
        match get_theme(name) {
            Some(theme) => return Some(theme),
            None => warn!("Unknown theme '{}', falling back to analysis", name),
        }
    }
    get_theme(&analysis.suggested_theme).or_else(|| options.season.map(get_seasonal_theme))
}
