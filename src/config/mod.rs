use anyhow::Context;
use fs_err as fs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::{Args, ProviderKind};
use crate::errors::BriefingError;
use crate::history::DEFAULT_CAPACITY;
use crate::provider::{gemini, openai};

/// Variable read by every provider when its own one is unset.
pub const GENERIC_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub api_key_env: Option<String>,
    pub timeout_secs: u64,
    pub history_path: Option<PathBuf>,
    pub history_capacity: usize,
    pub artifacts_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: None,
            api_base: None,
            api_key_env: None,
            timeout_secs: 60,
            history_path: None,
            history_capacity: DEFAULT_CAPACITY,
            artifacts_dir: ".decision-desk".into(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// File (if given), then CLI flags on top.
    pub fn resolve(args: &Args) -> anyhow::Result<Self> {
        let mut cfg = match &args.config {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        if let Some(p) = args.provider {
            cfg.provider = p;
        }
        if args.model.is_some() {
            cfg.model = args.model.clone();
        }
        if args.api_base.is_some() {
            cfg.api_base = args.api_base.clone();
        }
        if let Some(t) = args.timeout_secs {
            cfg.timeout_secs = t;
        }
        if args.history.is_some() {
            cfg.history_path = args.history.clone();
        }
        Ok(cfg)
    }

    pub fn model(&self) -> String {
        self.model.clone().unwrap_or_else(|| match self.provider {
            ProviderKind::Gemini => gemini::DEFAULT_MODEL.to_string(),
            ProviderKind::OpenAI => openai::DEFAULT_MODEL.to_string(),
        })
    }

    pub fn key_env(&self) -> String {
        self.api_key_env.clone().unwrap_or_else(|| match self.provider {
            ProviderKind::Gemini => "GEMINI_API_KEY".to_string(),
            ProviderKind::OpenAI => "OPENAI_API_KEY".to_string(),
        })
    }

    /// Looks up the credential through `lookup` (the environment in
    /// production). Blank values count as missing.
    pub fn api_key<F>(&self, lookup: F) -> Result<String, BriefingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let primary = self.key_env();
        let found = [primary.as_str(), GENERIC_KEY_ENV]
            .into_iter()
            .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()));
        found.ok_or_else(|| BriefingError::Config(format!("{primary} environment variable not set.")))
    }

    pub fn history_path(&self) -> PathBuf {
        self.history_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("decision-desk"))
                .unwrap_or_else(|| self.artifacts_dir.clone())
                .join("history.json")
        })
    }
}
