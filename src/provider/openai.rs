use async_trait::async_trait;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::wire::{GenerationRequest, ResponseFormat};

pub const DEFAULT_BASE: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// OpenAI-compatible chat completions adapter. The prompt goes out as a
/// single user message.
pub struct OpenAIGenerator {
    model: String,
    api_key: String,
    api_base: String,
    client: Client,
    timeout_secs: u64,
}

impl OpenAIGenerator {
    pub fn new(model: String, api_key: String, api_base: Option<String>, timeout_secs: u64) -> Self {
        Self {
            model,
            api_key,
            api_base: api_base.unwrap_or_else(|| DEFAULT_BASE.to_string()),
            client: Client::new(),
            timeout_secs,
        }
    }
}

fn response_format(format: &ResponseFormat) -> Option<Value> {
    match format {
        ResponseFormat::Text => None,
        ResponseFormat::EnumField { field, values } => Some(json!({
            "type": "json_schema",
            "json_schema": {
                "name": "single_field",
                "strict": true,
                "schema": {
                    "type": "object",
                    "properties": { field.as_str(): { "type": "string", "enum": values } },
                    "required": [field],
                    "additionalProperties": false
                }
            }
        })),
    }
}

#[async_trait]
impl super::TextGenerator for OpenAIGenerator {
    async fn generate(&self, req: &GenerationRequest) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));

        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": req.prompt }
            ],
            "temperature": 0.7
        });
        if let Some(rf) = response_format(&req.response) {
            body["response_format"] = rf;
            body["temperature"] = json!(0.0);
        }

        debug!(%url, model = %self.model, prompt_len = req.prompt.len(), "openai: POST");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&body)
            .send()
            .await
            .context("openai request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("openai read body failed")?;
        debug!(%status, body_len = text.len(), "openai: response");

        if !status.is_success() {
            return Err(anyhow!("OpenAI API error ({}): {}", status, text));
        }

        #[derive(Deserialize)]
        struct ChatMessage {
            content: Option<String>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChatMessage,
        }
        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse OpenAI response: {e}\nRaw: {text}"))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow!("openai: empty choices"))
    }
}
