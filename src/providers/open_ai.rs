use crate::config::ProviderConfig;
use crate::providers::LlmProvider;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;
use std::time::Duration;

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api";

/// Chat-completions client for OpenAI and OpenAI-compatible gateways (OpenRouter)
pub struct OpenAIProvider {
    name: String,
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl OpenAIProvider {
    /// Create an OpenAI provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, Box<dyn Error>> {
        Self::build("openai", "OPENAI_API_KEY", OPENAI_BASE_URL, config, timeout)
    }

    /// Create an OpenRouter provider from configuration
    pub fn openrouter(config: &ProviderConfig, timeout: Duration) -> Result<Self, Box<dyn Error>> {
        Self::build(
            "openrouter",
            "OPENROUTER_API_KEY",
            OPENROUTER_BASE_URL,
            config,
            timeout,
        )
    }

    fn build(
        name: &str,
        env_key: &str,
        default_base_url: &str,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<Self, Box<dyn Error>> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(env_key).ok())
            .ok_or_else(|| format!("{} not found in config or environment", env_key))?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url.to_string());

        Ok(OpenAIProvider {
            name: name.to_string(),
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        OpenAIProvider {
            name: "openai".to_string(),
            client: Client::new(),
            api_key,
            base_url,
            model,
            max_tokens: 2000,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let mut request = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key));

        if self.name == "openrouter" {
            request = request
                .header("HTTP-Referer", "https://github.com/AutumnsGrove/RecipeGrove")
                .header("X-Title", "RecipeGrove");
        }

        let response = request
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": system},
                    {"role": "user", "content": user}
                ],
                "temperature": temperature,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(format!("{} API error ({}): {}", self.name, status, error_text).into());
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);
        let content = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or("Failed to extract content from response")?
            .to_string();

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_complete() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{
                        "message": {
                            "content": "{\"cuisine_type\": \"Thai\"}"
                        }
                    }]
                }"#,
            )
            .create();

        let provider = OpenAIProvider::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            "gpt-4o-mini".to_string(),
        );

        let result = provider
            .complete("You analyze recipes", "# Pad Thai", 0.3)
            .await
            .unwrap();
        assert!(result.contains("Thai"));
        mock.assert();
    }

    #[tokio::test]
    async fn test_complete_api_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Rate limited"}"#)
            .create();

        let provider = OpenAIProvider::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            "gpt-4o-mini".to_string(),
        );

        let result = provider.complete("system", "user", 0.7).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("429"));
        mock.assert();
    }

    #[test]
    fn test_openrouter_name_and_key() {
        let config = ProviderConfig {
            enabled: true,
            model: "anthropic/claude-3.5-sonnet".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            api_key: Some("test-key".to_string()),
            base_url: None,
        };

        let provider = OpenAIProvider::openrouter(&config, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.provider_name(), "openrouter");
        assert_eq!(provider.base_url, OPENROUTER_BASE_URL);
    }
}
