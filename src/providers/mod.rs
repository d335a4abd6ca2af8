mod anthropic;
mod factory;
mod fallback;
mod open_ai;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use fallback::FallbackProvider;
pub use open_ai::OpenAIProvider;

use async_trait::async_trait;
use std::error::Error;

/// Unified trait for all LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openrouter", "anthropic")
    fn provider_name(&self) -> &str;

    /// Send one system + user exchange and return the model's text reply
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;
}
