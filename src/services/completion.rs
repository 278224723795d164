use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use crate::config::CompletionSettings;

/// Errors that can occur when calling the completion API
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Client for an Azure-style OpenAI-compatible chat completions API
///
/// Used for two things, both optional and both with deterministic fallbacks:
/// - richer advice/insight text for the assistant,
/// - structured receipt extraction from images (vision).
pub struct CompletionClient {
    endpoint: String,
    api_key: String,
    model: String,
    api_version: String,
    client: Client,
}

impl CompletionClient {
    pub fn new(endpoint: String, api_key: String, model: String, api_version: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint,
            api_key,
            model,
            api_version,
            client,
        }
    }

    /// Build a client from settings; None when the LLM path is disabled.
    pub fn from_settings(settings: &CompletionSettings) -> Option<Self> {
        if !settings.enabled() {
            return None;
        }
        Some(Self::new(
            settings.endpoint.clone(),
            settings.api_key.clone(),
            settings.model.clone(),
            settings.api_version.clone(),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            self.api_version
        )
    }

    async fn complete(&self, messages: Value, max_tokens: u32, temperature: f64) -> Result<String, CompletionError> {
        let payload = json!({
            "messages": messages,
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        let response = self
            .client
            .post(self.chat_url())
            .header("api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CompletionError::ApiError(format!(
                "completion request failed: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        let content = body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| CompletionError::InvalidResponse("missing message content".into()))?;

        Ok(content.trim().to_string())
    }

    /// Plain text chat completion
    pub async fn chat(
        &self,
        system_prompt: &str,
        user_message: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String, CompletionError> {
        let messages = json!([
            {"role": "system", "content": system_prompt},
            {"role": "user", "content": user_message},
        ]);
        self.complete(messages, max_tokens, temperature).await
    }

    /// Vision completion over a base64 image
    pub async fn vision(
        &self,
        system_prompt: &str,
        user_text: &str,
        mime: &str,
        image_b64: &str,
    ) -> Result<String, CompletionError> {
        let messages = json!([
            {"role": "system", "content": system_prompt},
            {"role": "user", "content": [
                {"type": "text", "text": user_text},
                {"type": "image_url", "image_url": {
                    "url": format!("data:{};base64,{}", mime, image_b64),
                    "detail": "high",
                }},
            ]},
        ]);
        self.complete(messages, 1000, 0.1).await
    }
}

/// Strip a markdown code fence the model may have wrapped around JSON.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}
