use anyhow::Result;
use async_trait::async_trait;

use crate::cli::ProviderKind;
use crate::config::Config;
use crate::errors::BriefingError;
use crate::wire::GenerationRequest;

pub mod gemini;
pub mod openai;

/// External text-generation collaborator. Returns the raw text of the reply;
/// for structured requests that text is the JSON object.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, req: &GenerationRequest) -> Result<String>;
}

pub type DynGenerator = Box<dyn TextGenerator + Send + Sync>;

/// Builds the configured adapter. Fails before any request if the credential
/// is missing.
pub fn make_generator(cfg: &Config) -> Result<DynGenerator, BriefingError> {
    let api_key = cfg.api_key(|name| std::env::var(name).ok())?;
    let model = cfg.model();
    match cfg.provider {
        ProviderKind::Gemini => Ok(Box::new(gemini::GeminiGenerator::new(
            model,
            api_key,
            cfg.api_base.clone(),
            cfg.timeout_secs,
        ))),
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIGenerator::new(
            model,
            api_key,
            cfg.api_base.clone(),
            cfg.timeout_secs,
        ))),
    }
}
