use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::convert::Infallible;
use std::path::PathBuf;

use crate::wire::Tone;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    #[value(alias = "google")]
    Gemini,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Html,
    Json,
}

fn parse_tone(s: &str) -> Result<Tone, Infallible> {
    Ok(Tone::from_label(s))
}

#[derive(Parser, Debug)]
#[command(name = "decision_desk", version, about = "Morning business briefings from your daily numbers")]
pub struct Args {
    /// Today's business data. Leave empty for a default productivity tip.
    #[arg(long, conflicts_with = "data_file")]
    pub data: Option<String>,

    /// Read business data from a file ("-" for stdin).
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Strategic, Chill or Tough Love. Anything else means Chill.
    #[arg(long, default_value = "chill", value_parser = parse_tone)]
    pub tone: Tone,

    /// Keep a session open and brief each block of input.
    #[arg(long, default_value_t = false)]
    pub interactive: bool,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub api_base: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// History file location.
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Do not read or write stored history.
    #[arg(long, default_value_t = false)]
    pub no_history: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub save_request: bool,

    #[arg(long, default_value_t = false)]
    pub save_response: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// No colours, no spinner.
    #[arg(long, default_value_t = false)]
    pub plain: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_flag_is_lenient() {
        let args = Args::try_parse_from(["decision_desk", "--tone", "Tough Love"]).unwrap();
        assert_eq!(args.tone, Tone::ToughLove);
        let args = Args::try_parse_from(["decision_desk", "--tone", "Balanced"]).unwrap();
        assert_eq!(args.tone, Tone::Chill);
        let args = Args::try_parse_from(["decision_desk"]).unwrap();
        assert_eq!(args.tone, Tone::Chill);
    }

    #[test]
    fn data_and_data_file_conflict() {
        assert!(Args::try_parse_from(["decision_desk", "--data", "x", "--data-file", "y"]).is_err());
    }

    #[test]
    fn provider_and_format_values() {
        let args = Args::try_parse_from(["decision_desk", "--provider", "openai", "--format", "json"]).unwrap();
        assert_eq!(args.provider, Some(ProviderKind::OpenAI));
        assert_eq!(args.format, OutputFormat::Json);
    }
}
