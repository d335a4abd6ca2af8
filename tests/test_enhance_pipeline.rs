use mockito::{Matcher, Server, ServerGuard};
use recipe_grove::providers::OpenAIProvider;
use recipe_grove::{
    EmbeddingMode, EmojiCache, EmojiGenerator, EmojiKitchenClient, GroveError, GrovePipeline,
    OutputFormat, RecipeAnalyzer, RecipeEnhancer, RunOptions,
};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const RECIPE: &str = "# Pork Dumplings

## Ingredients
- 500g ground pork
- 1 napa cabbage
- 40 dumpling wrappers

## Instructions
1. Mix the filling
2. Fold and steam
";

const ANALYSIS: &str = r#"{
    "cuisine_type": "Chinese",
    "regional_style": "Northern",
    "ingredients": ["pork", "cabbage"],
    "cooking_techniques": ["steaming"],
    "occasion": "Lunar New Year",
    "dietary_tags": [],
    "suggested_theme": "asian",
    "emoji_strategy": "dragons with dumplings"
}"#;

const PLAN: &str = r#"```json
[
    {"location": "title", "emoji_base_1": "🐉", "emoji_base_2": "🥟",
     "context": "Dragon dumplings", "reasoning": "Strong opening"},
    {"location": "step_2", "emoji_base_1": "🔥", "emoji_base_2": "🥢",
     "context": "Steaming", "reasoning": "Action step"}
]
```"#;

fn chat_body(content: &str) -> String {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
}

async fn mock_llm(server: &mut ServerGuard) {
    server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("add thematic emoji combinations".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_body(ANALYSIS))
        .create_async()
        .await;
    server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("plan emoji placements".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_body(PLAN))
        .create_async()
        .await;
}

fn pipeline(llm_url: String, kitchen_url: String, cache_dir: &Path, mode: EmbeddingMode) -> GrovePipeline {
    let provider = OpenAIProvider::with_base_url(
        "test-key".to_string(),
        llm_url,
        "test-model".to_string(),
    );
    let analyzer = RecipeAnalyzer::new(Box::new(provider));
    let generator = EmojiGenerator::new(
        Arc::new(EmojiKitchenClient::with_base_url(kitchen_url, 2, 1)),
        EmojiCache::new(cache_dir).with_min_bytes(16),
    );
    GrovePipeline::new(analyzer, generator, RecipeEnhancer::new(mode))
}

fn write_recipe(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let input = dir.path().join("dumplings.md");
    fs::write(&input, contents).unwrap();
    input
}

#[tokio::test]
async fn test_full_run_relative_mode() {
    let mut llm = Server::new_async().await;
    mock_llm(&mut llm).await;

    let mut kitchen = Server::new_async().await;
    let kitchen_mock = kitchen
        .mock("GET", Matcher::Regex(r"^/s/".to_string()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(vec![7u8; 256])
        .expect(2)
        .create_async()
        .await;

    let work = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    let input = write_recipe(&work, RECIPE);

    let pipeline = pipeline(llm.url(), kitchen.url(), cache.path(), EmbeddingMode::Relative);
    let options = RunOptions {
        format: OutputFormat::Html,
        shopping_list: true,
        ..Default::default()
    };
    let summary = pipeline.run(&input, &options).await.unwrap();

    assert_eq!(summary.planned, 2);
    assert_eq!(summary.resolved, 2);
    assert_eq!(summary.placed, 2);
    kitchen_mock.assert_async().await;

    let output = work.path().join("dumplings-grove.md");
    assert_eq!(summary.output.as_deref(), Some(output.as_path()));
    let enhanced = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = enhanced.split('\n').collect();
    assert_eq!(
        lines[0],
        "# Pork Dumplings ![🐉+🥟](./grove-emojis/u1f409_u1f95f.png)"
    );
    assert_eq!(
        lines[9],
        "2. Fold and steam ![🔥+🥢](./grove-emojis/u1f525_u1f962.png)"
    );
    assert_eq!(lines.len(), RECIPE.split('\n').count());

    assert!(work.path().join("grove-emojis/u1f409_u1f95f.png").exists());
    assert!(work.path().join("grove-emojis/u1f525_u1f962.png").exists());
    assert!(cache.path().join("u1f409/u1f409_u1f95f.png").exists());

    let html = fs::read_to_string(summary.html.unwrap()).unwrap();
    assert!(html.contains("<title>Pork Dumplings</title>"));
    assert!(html.contains(r#"<img src="./grove-emojis/u1f409_u1f95f.png""#));

    let list = fs::read_to_string(summary.shopping_list.unwrap()).unwrap();
    assert!(list.contains("- [ ] 500g ground pork"));
}

#[tokio::test]
async fn test_second_run_uses_cache() {
    let mut llm = Server::new_async().await;
    mock_llm(&mut llm).await;

    let mut kitchen = Server::new_async().await;
    let kitchen_mock = kitchen
        .mock("GET", Matcher::Regex(r"^/s/".to_string()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(vec![7u8; 256])
        .expect(2)
        .create_async()
        .await;

    let work = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    let input = write_recipe(&work, RECIPE);
    let pipeline = pipeline(llm.url(), kitchen.url(), cache.path(), EmbeddingMode::Unicode);

    let first = pipeline.run(&input, &RunOptions::default()).await.unwrap();
    let second = pipeline.run(&input, &RunOptions::default()).await.unwrap();
    assert_eq!(first.placed, 2);
    assert_eq!(second.placed, 2);
    kitchen_mock.assert_async().await;

    let enhanced = fs::read_to_string(work.path().join("dumplings-grove.md")).unwrap();
    assert!(enhanced.starts_with("# Pork Dumplings 🐉\n"));
    assert!(!enhanced.contains("!["));
    assert!(!work.path().join("grove-emojis").exists());
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let mut llm = Server::new_async().await;
    mock_llm(&mut llm).await;

    let mut kitchen = Server::new_async().await;
    let kitchen_mock = kitchen
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let work = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    let input = write_recipe(&work, RECIPE);
    let pipeline = pipeline(llm.url(), kitchen.url(), cache.path(), EmbeddingMode::Relative);

    let options = RunOptions {
        dry_run: true,
        ..Default::default()
    };
    let summary = pipeline.run(&input, &options).await.unwrap();

    assert_eq!(summary.planned, 2);
    assert_eq!(summary.resolved, 0);
    assert!(summary.output.is_none());
    assert!(!work.path().join("dumplings-grove.md").exists());
    kitchen_mock.assert_async().await;
}

#[tokio::test]
async fn test_unavailable_pair_resolves_by_swapping() {
    let mut kitchen = Server::new_async().await;
    let original = kitchen
        .mock("GET", Matcher::Regex(r"^/s/%F0%9F%90%89_%F0%9F%A5%9F".to_string()))
        .match_query(Matcher::Any)
        .with_status(404)
        .expect(1)
        .create_async()
        .await;
    let swapped = kitchen
        .mock("GET", Matcher::Regex(r"^/s/%F0%9F%A5%9F_%F0%9F%90%89".to_string()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(vec![9u8; 64])
        .expect(1)
        .create_async()
        .await;

    let cache = TempDir::new().unwrap();
    let generator = EmojiGenerator::new(
        Arc::new(EmojiKitchenClient::with_base_url(kitchen.url(), 3, 1)),
        EmojiCache::new(cache.path()).with_min_bytes(16),
    );

    let path = generator
        .generate_combination("🐉", "🥟", true)
        .await
        .unwrap()
        .unwrap();
    assert!(path.ends_with("u1f95f/u1f95f_u1f409.png"));
    original.assert_async().await;
    swapped.assert_async().await;
}

#[tokio::test]
async fn test_empty_recipe_is_rejected() {
    let llm = Server::new_async().await;
    let kitchen = Server::new_async().await;
    let work = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    let input = write_recipe(&work, "  \n\n");

    let pipeline = pipeline(llm.url(), kitchen.url(), cache.path(), EmbeddingMode::Relative);
    let result = pipeline.run(&input, &RunOptions::default()).await;
    assert!(matches!(result, Err(GroveError::EmptyRecipe)));
}
