use clap::Parser;
use env_logger::Env;
use log::debug;
use std::path::PathBuf;

use recipe_grove::emoji::EmojiCache;
use recipe_grove::themes::detect_season;
use recipe_grove::{
    load_config, Density, EmbeddingMode, GrovePipeline, OutputFormat, RunOptions, Season,
};

/// Add themed Emoji Kitchen combinations to a markdown recipe.
#[derive(Parser, Debug)]
#[command(name = "recipe-grove", version, about)]
struct Cli {
    /// Markdown recipe to enhance.
    #[arg(required_unless_present = "clear_cache")]
    input: Option<PathBuf>,

    /// Cuisine theme: asian, italian, mexican, mediterranean. Detected when omitted.
    #[arg(long, env = "RECIPEGROVE_THEME")]
    theme: Option<String>,

    /// Season: winter, spring, summer, fall, auto or none.
    #[arg(long, default_value = "auto")]
    season: String,

    /// Model id for the default provider.
    #[arg(long, env = "RECIPEGROVE_MODEL")]
    model: Option<String>,

    /// Directory for the enhanced recipe (defaults to the input's directory).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How many emojis to place: low, medium, high.
    #[arg(long)]
    emoji_density: Option<Density>,

    /// How images are referenced: relative, absolute, base64, unicode.
    #[arg(long)]
    emoji_path: Option<EmbeddingMode>,

    /// Output format: markdown or html.
    #[arg(long, default_value = "markdown")]
    format: OutputFormat,

    /// Also write a categorized shopping list.
    #[arg(long)]
    shopping_list: bool,

    /// Plan placements without generating emojis.
    #[arg(long)]
    dry_run: bool,

    /// Empty the emoji cache before running.
    #[arg(long)]
    clear_cache: bool,

    /// Debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn resolve_season(arg: &str) -> Result<Option<Season>, String> {
    match arg.trim().to_lowercase().as_str() {
        "auto" => Ok(Some(detect_season())),
        "none" | "off" => Ok(None),
        other => other.parse().map(Some),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let mut config = load_config()?;

    if let Some(model) = &cli.model {
        let provider = config.default_provider.clone();
        if let Some(provider_config) = config.providers.get_mut(&provider) {
            provider_config.model = model.clone();
        }
    }
    if let Some(mode) = cli.emoji_path {
        config.output.embedding_mode = mode;
    }

    if cli.clear_cache {
        EmojiCache::new(&config.emoji.cache_dir).clear()?;
    }

    let Some(input) = cli.input else {
        return Ok(());
    };

    let season = resolve_season(&cli.season)?;
    if let Some(season) = season {
        debug!("Season: {}", season.as_str());
    }

    let options = RunOptions {
        theme: cli.theme,
        season,
        density: cli.emoji_density.unwrap_or(config.output.density),
        output_dir: cli.output,
        format: cli.format,
        shopping_list: cli.shopping_list,
        dry_run: cli.dry_run,
    };

    let pipeline = GrovePipeline::from_config(&config)?;
    let summary = pipeline.run(&input, &options).await?;

    if cli.dry_run {
        println!("Dry run complete");
    }
    println!("{}", summary);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "recipe-grove",
            "dumplings.md",
            "--emoji-density",
            "high",
            "--emoji-path",
            "base64",
            "--format",
            "html",
            "--dry-run",
        ]);
        assert_eq!(cli.input, Some(PathBuf::from("dumplings.md")));
        assert_eq!(cli.emoji_density, Some(Density::High));
        assert_eq!(cli.emoji_path, Some(EmbeddingMode::Base64));
        assert_eq!(cli.format, OutputFormat::Html);
        assert!(cli.dry_run);
    }

    #[test]
    fn test_clear_cache_without_input() {
        let cli = Cli::try_parse_from(["recipe-grove", "--clear-cache"]).unwrap();
        assert!(cli.input.is_none());
        assert!(Cli::try_parse_from(["recipe-grove"]).is_err());
    }

    #[test]
    fn test_resolve_season() {
        assert_eq!(resolve_season("none").unwrap(), None);
        assert_eq!(resolve_season("Autumn").unwrap(), Some(Season::Fall));
        assert!(resolve_season("monsoon").is_err());
        assert!(resolve_season("auto").unwrap().is_some());
    }
}
