//! Decorate recipe markdown with themed Emoji Kitchen combinations.
//!
//! A run analyzes the recipe with an LLM, plans where emoji pairs belong,
//! resolves each pair to a combined image (with a deterministic fallback
//! search and a local cache), and inserts references into the document.
//!
//! ```no_run
//! use recipe_grove::{GroveConfig, GrovePipeline, RunOptions};
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), recipe_grove::GroveError> {
//! let config = GroveConfig::load()?;
//! let pipeline = GrovePipeline::from_config(&config)?;
//! let summary = pipeline
//!     .run(Path::new("dumplings.md"), &RunOptions::default())
//!     .await?;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod config;
pub mod emoji;
pub mod enhancer;
pub mod error;
pub mod export;
pub mod model;
pub mod pipeline;
pub mod providers;
pub mod themes;

pub use analyzer::RecipeAnalyzer;
pub use config::{load_config, GroveConfig};
pub use emoji::{CombinationService, EmojiCache, EmojiGenerator, EmojiKitchenClient};
pub use enhancer::RecipeEnhancer;
pub use error::GroveError;
pub use model::{Density, EmbeddingMode, EmojiPlacement, RecipeAnalysis, Season};
pub use pipeline::{GrovePipeline, OutputFormat, RunOptions, RunSummary};
