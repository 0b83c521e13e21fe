use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::wire::{GenerationRequest, ResponseFormat};
use super::TextGenerator;

pub const DEFAULT_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub struct GeminiGenerator {
    model: String,
    api_key: String,
    api_base: String,
    client: Client,
    timeout: Duration,
}

impl GeminiGenerator {
    pub fn new(model: String, api_key: String, api_base: Option<String>, timeout_secs: u64) -> Self {
        Self {
            model,
            api_key,
            api_base: api_base.unwrap_or_else(|| DEFAULT_BASE.to_string()),
            client: Client::new(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

fn generation_config(format: &ResponseFormat) -> Option<GenerationConfig> {
    match format {
        ResponseFormat::Text => None,
        ResponseFormat::EnumField { field, values } => Some(GenerationConfig {
            response_mime_type: "application/json",
            response_schema: json!({
                "type": "OBJECT",
                "properties": {
                    field.as_str(): { "type": "STRING", "enum": values }
                },
                "required": [field]
            }),
        }),
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, req: &GenerationRequest) -> Result<String> {
        let url = self.url();
        let body = GenerateContentRequest {
            contents: vec![Content { role: "user", parts: vec![Part { text: &req.prompt }] }],
            generation_config: generation_config(&req.response),
        };

        debug!(%url, model = %self.model, prompt_len = req.prompt.len(), "gemini: POST");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("gemini request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("gemini read body failed")?;
        debug!(%status, body_len = text.len(), "gemini: response");

        if !status.is_success() {
            return Err(anyhow!("Gemini API error ({}): {}", status, text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("gemini response parse error: {e}\nRaw: {text}"))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("gemini: empty candidates"))
    }
}
