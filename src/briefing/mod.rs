use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::errors::BriefingError;
use crate::history::{History, KeyValueStore};
use crate::log::StageRecorder;
use crate::prompt::{self, CATEGORY_FIELD};
use crate::provider::DynGenerator;
use crate::segment;
use crate::wire::{Briefing, BriefingRequest, BusinessCategory, GenerationRequest, Tone};

/// Extracts the first top-level JSON object substring from a string.
/// Handles nested braces; returns None if not found.
fn extract_first_json_object(s: &str) -> Option<&str> {
    let mut start = None;
    let mut depth = 0usize;

    for (i, b) in s.bytes().enumerate() {
        if b == b'{' {
            if start.is_none() {
                start = Some(i);
            }
            depth += 1;
        } else if b == b'}' && depth > 0 {
            depth -= 1;
            if depth == 0 {
                return start.map(|st| &s[st..=i]);
            }
        }
    }
    None
}

/// Reads `{"businessType": "<label>"}` out of the classifier reply.
/// Anything malformed or unknown is Other.
pub fn parse_classification(text: &str) -> BusinessCategory {
    #[derive(Deserialize)]
    struct Classification {
        #[serde(rename = "businessType")]
        business_type: Option<String>,
    }

    let parsed = serde_json::from_str::<Classification>(text.trim()).ok().or_else(|| {
        extract_first_json_object(text).and_then(|obj| serde_json::from_str::<Classification>(obj).ok())
    });
    parsed
        .and_then(|c| c.business_type)
        .map(|label| BusinessCategory::from_label(&label))
        .unwrap_or(BusinessCategory::Other)
}

/// One submission at a time: classify, generate, segment, remember.
pub struct BriefingService<S> {
    generator: DynGenerator,
    history: History<S>,
    recorder: StageRecorder,
}

impl<S: KeyValueStore> BriefingService<S> {
    pub fn new(generator: DynGenerator, history: History<S>, recorder: StageRecorder) -> Self {
        Self { generator, history, recorder }
    }

    pub fn history(&self) -> &History<S> {
        &self.history
    }

    fn record(&self, stage: &str, tx: Uuid, req: &GenerationRequest, response: &str) {
        if let Err(e) = self.recorder.save_stage(stage, tx, req, response) {
            warn!(stage, error = %e, "could not save artifacts");
        }
    }

    async fn classify(&self, raw_text: &str, tx: Uuid) -> BusinessCategory {
        if raw_text.trim().is_empty() {
            return BusinessCategory::Other;
        }
        let req = GenerationRequest::enum_field(
            prompt::classification_prompt(raw_text),
            CATEGORY_FIELD,
            &BusinessCategory::labels(),
        );
        match self.generator.generate(&req).await {
            Ok(reply) => {
                self.record("classify", tx, &req, &reply);
                let category = parse_classification(&reply);
                debug!(category = category.label(), "business classified");
                category
            }
            Err(e) => {
                warn!(error = %e, "business classification failed; using Other");
                BusinessCategory::Other
            }
        }
    }

    /// Runs one submission. `has_prior_briefing` is whether the caller is
    /// already showing a briefing; a blank submission is only valid before
    /// the first one.
    pub async fn generate(
        &mut self,
        raw_text: &str,
        tone: Tone,
        has_prior_briefing: bool,
        now: DateTime<Utc>,
    ) -> Result<Briefing, BriefingError> {
        if raw_text.trim().is_empty() && has_prior_briefing {
            return Err(BriefingError::Validation);
        }

        let tx = Uuid::new_v4();
        let recent = self.history.recent(now);
        info!(%tx, tone = tone.label(), history = recent.len(), "generating briefing");

        let business_type = self.classify(raw_text, tx).await;

        let request = BriefingRequest::new(raw_text, tone, recent);
        let req = GenerationRequest::text(prompt::briefing_prompt(&request, now));
        let reply = self.generator.generate(&req).await.map_err(|e| {
            error!(%tx, error = ?e, "briefing generation failed");
            BriefingError::ServiceUnavailable
        })?;
        self.record("briefing", tx, &req, &reply);

        let sections = segment::parse_briefing(&reply);
        if sections.iter().all(|s| s.is_degenerate()) {
            debug!(%tx, "reply had no recognised section headers");
        }

        if let Err(e) = self.history.append(raw_text, now) {
            warn!(error = %e, "could not persist history; continuing");
        }

        Ok(Briefing {
            id: tx,
            business_type,
            tone,
            generated_at: now,
            raw_text: reply,
            sections,
        })
    }
}
