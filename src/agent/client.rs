//! Reasoning service client
//!
//! Talks to an OpenAI-compatible chat-completions endpoint. The conversation
//! loop only depends on the `ReasoningClient` trait, so tests can drive it
//! with a stub instead of the network.

use async_trait::async_trait;
use reqwest::{header, Client};
use secrecy::ExposeSecret;
use tracing::{debug, info};

use crate::agent::types::*;
use crate::config::ReasoningConfig;
use crate::error::{Error, Result};

/// Reasoning service seam: one request, one response, optionally carrying
/// tool-invocation requests.
#[async_trait]
pub trait ReasoningClient: Send + Sync {
    /// Send the message history and tool catalog schema; receive one message.
    async fn chat_with_tools(
        &self,
        messages: Vec<Message>,
        tools: Vec<ToolDefinition>,
    ) -> Result<ChatCompletionResponse>;
}

/// HTTP client for an OpenAI-compatible API
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// Create a new client
    pub fn new(config: &ReasoningConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!(
                "Bearer {}",
                config.api_key.expose_secret()
            ))
            .map_err(|e| Error::Config(format!("Invalid API key format: {}", e)))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(OpenAiClient {
            client,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the configured model
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %request.model, messages = request.messages.len(), "reasoning request");

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.json::<ChatCompletionResponse>().await?;
            if let Some(ref usage) = body.usage {
                info!(tokens = usage.total_tokens, "reasoning response");
            }
            Ok(body)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            match status.as_u16() {
                429 => Err(Error::RateLimit(error_text)),
                401 => Err(Error::Unauthorized("Invalid API key".to_string())),
                _ => Err(Error::Reasoning(format!(
                    "API error ({}): {}",
                    status, error_text
                ))),
            }
        }
    }
}

#[async_trait]
impl ReasoningClient for OpenAiClient {
    async fn chat_with_tools(
        &self,
        messages: Vec<Message>,
        tools: Vec<ToolDefinition>,
    ) -> Result<ChatCompletionResponse> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            tools: if tools.is_empty() { None } else { Some(tools) },
            tool_choice: Some("auto".to_string()),
        };
        self.send_request(request).await
    }
}
