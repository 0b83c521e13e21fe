use fs_err as fs;
use serde_json::{json, to_string_pretty};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::wire::GenerationRequest;

/// Stderr logging. `RUST_LOG` wins; otherwise `--debug` picks the level.
pub fn init(debug: bool) {
    let fallback = if debug { "decision_desk=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: Option<PathBuf>,
    pub response: Option<PathBuf>,
}

fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join("tx").join(tx.to_string())
}

/// Writes per-stage request/response artifacts under `<root>/tx/<id>/`.
#[derive(Debug, Clone)]
pub struct StageRecorder {
    root: PathBuf,
    save_request: bool,
    save_response: bool,
}

impl StageRecorder {
    pub fn new(root: impl Into<PathBuf>, save_request: bool, save_response: bool) -> Self {
        Self { root: root.into(), save_request, save_response }
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        Self::new(PathBuf::new(), false, false)
    }

    pub fn is_enabled(&self) -> bool {
        self.save_request || self.save_response
    }

    pub fn save_stage(
        &self,
        stage: &str,
        tx: Uuid,
        req: &GenerationRequest,
        response: &str,
    ) -> anyhow::Result<SavedPaths> {
        let dir = tx_dir(&self.root, tx);
        let mut request_path = None;
        let mut response_path = None;
        if !self.is_enabled() {
            return Ok(SavedPaths { dir, request: request_path, response: response_path });
        }
        fs::create_dir_all(&dir)?;

        if self.save_request {
            let p = dir.join(format!("{stage}.request.json"));
            fs::write(&p, to_string_pretty(req)?)?;
            request_path = Some(p);
        }

        if self.save_response {
            let p = dir.join(format!("{stage}.response.json"));
            fs::write(&p, to_string_pretty(&json!({ "text": response }))?)?;
            response_path = Some(p);
        }

        let saved = SavedPaths { dir, request: request_path, response: response_path };
        print_saved_paths(stage, &saved);
        Ok(saved)
    }
}

fn print_saved_paths(stage: &str, saved: &SavedPaths) {
    debug!(stage, dir = %saved.dir.display(), "artifacts directory");
    if let Some(p) = &saved.request {
        debug!(stage, path = %p.display(), "request saved");
    }
    if let Some(p) = &saved.response {
        debug!(stage, path = %p.display(), "response saved");
    }
}
