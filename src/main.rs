use chrono::Utc;
use clap::Parser;
use std::io;
use std::process;

mod briefing;
mod cli;
mod config;
mod errors;
mod history;
mod input;
mod log;
mod prompt;
mod provider;
mod segment;
mod ux;
mod wire;

use briefing::BriefingService;
use cli::{Args, OutputFormat};
use history::{FileStore, History, KeyValueStore, MemoryStore};
use input::SessionInput;
use wire::{Briefing, Tone};

type Service = BriefingService<Box<dyn KeyValueStore>>;

fn emit(briefing: &Briefing, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Terminal => ux::print_briefing(briefing),
        OutputFormat::Html => print!("{}", ux::render_html(briefing)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(briefing)?),
    }
    Ok(())
}

async fn submit(
    service: &mut Service,
    data: &str,
    tone: Tone,
    has_prior_briefing: bool,
    plain: bool,
) -> Result<Briefing, errors::BriefingError> {
    let pb = ux::spinner(plain);
    let result = service.generate(data, tone, has_prior_briefing, Utc::now()).await;
    pb.finish_and_clear();
    result
}

async fn run_once(service: &mut Service, args: &Args) -> anyhow::Result<()> {
    let data = match (&args.data, &args.data_file) {
        (Some(d), _) => d.clone(),
        (None, Some(p)) => input::read_data(p, input::MAX_INPUT_BYTES)?,
        (None, None) => String::new(),
    };
    let plain = args.plain || args.format != OutputFormat::Terminal;

    match submit(service, &data, args.tone, false, plain).await {
        Ok(briefing) => emit(&briefing, args.format),
        Err(e) => {
            ux::print_error(&format!("Failed to generate briefing. {e}"));
            process::exit(1);
        }
    }
}

async fn run_session(service: &mut Service, args: &Args) -> anyhow::Result<()> {
    let mut tone = args.tone;
    let mut has_briefing = false;
    ux::print_header();
    ux::print_welcome(tone);

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    loop {
        ux::prompt_marker();
        let Some(turn) = input::read_turn(&mut reader)? else {
            break;
        };
        match turn {
            SessionInput::Quit => break,
            SessionInput::Tone(label) => {
                tone = Tone::from_label(&label);
                println!("tone: {}", tone.label());
            }
            SessionInput::History => ux::print_history(&service.history().recent(Utc::now())),
            SessionInput::Submit(data) => {
                match submit(service, &data, tone, has_briefing, args.plain).await {
                    Ok(briefing) => {
                        emit(&briefing, args.format)?;
                        has_briefing = true;
                    }
                    Err(errors::BriefingError::Validation) => {
                        ux::print_error(&errors::BriefingError::Validation.to_string());
                    }
                    Err(e) => {
                        has_briefing = false;
                        ux::print_error(&format!("Failed to generate briefing. {e}"));
                    }
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log::init(args.debug);
    if args.plain {
        colored::control::set_override(false);
    }

    let cfg = config::Config::resolve(&args)?;

    // Credential problems surface before any request is sent.
    let generator = match provider::make_generator(&cfg) {
        Ok(g) => g,
        Err(e) => {
            ux::print_error(&format!("Failed to generate briefing. {e}"));
            process::exit(2);
        }
    };

    let store: Box<dyn KeyValueStore> = if args.no_history {
        Box::new(MemoryStore::default())
    } else {
        let path = cfg.history_path();
        tracing::debug!(path = %path.display(), "history store");
        Box::new(FileStore::new(path))
    };
    let recorder = log::StageRecorder::new(cfg.artifacts_dir.clone(), args.save_request, args.save_response);
    let mut service = BriefingService::new(generator, History::new(store, cfg.history_capacity), recorder);

    if args.interactive {
        run_session(&mut service, &args).await
    } else {
        run_once(&mut service, &args).await
    }
}
