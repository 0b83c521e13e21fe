use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ========================================
/// Briefing domain types
/// ========================================

/// Stylistic modifier applied to the briefing prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tone {
    Strategic,
    #[default]
    Chill,
    #[serde(rename = "Tough Love")]
    ToughLove,
}

impl Tone {
    /// Lenient parse used for user-facing labels. Anything unrecognised is Chill.
    pub fn from_label(label: &str) -> Self {
        let norm: String = label
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match norm.as_str() {
            "strategic" => Tone::Strategic,
            "toughlove" => Tone::ToughLove,
            _ => Tone::Chill,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tone::Strategic => "Strategic",
            Tone::Chill => "Chill",
            Tone::ToughLove => "Tough Love",
        }
    }
}

/// Coarse classification label, only used to pick a presentation theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BusinessCategory {
    Coffee,
    Restaurant,
    Gym,
    Fashion,
    Tech,
    Marketing,
    #[serde(rename = "Real Estate")]
    RealEstate,
    Education,
    Travel,
    Music,
    #[default]
    Other,
}

impl BusinessCategory {
    pub const ALL: [BusinessCategory; 11] = [
        BusinessCategory::Coffee,
        BusinessCategory::Restaurant,
        BusinessCategory::Gym,
        BusinessCategory::Fashion,
        BusinessCategory::Tech,
        BusinessCategory::Marketing,
        BusinessCategory::RealEstate,
        BusinessCategory::Education,
        BusinessCategory::Travel,
        BusinessCategory::Music,
        BusinessCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BusinessCategory::Coffee => "Coffee",
            BusinessCategory::Restaurant => "Restaurant",
            BusinessCategory::Gym => "Gym",
            BusinessCategory::Fashion => "Fashion",
            BusinessCategory::Tech => "Tech",
            BusinessCategory::Marketing => "Marketing",
            BusinessCategory::RealEstate => "Real Estate",
            BusinessCategory::Education => "Education",
            BusinessCategory::Travel => "Travel",
            BusinessCategory::Music => "Music",
            BusinessCategory::Other => "Other",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }

    /// Case-insensitive lookup; unknown labels are Other.
    pub fn from_label(label: &str) -> Self {
        let wanted = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .unwrap_or(BusinessCategory::Other)
    }
}

/// One stored prior submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub data: String,
}

/// Everything the prompt builder needs for one submission.
#[derive(Debug, Clone)]
pub struct BriefingRequest {
    pub raw_user_text: String,
    pub tone: Tone,
    /// Newest first, as stored.
    pub historical_entries: Vec<HistoryEntry>,
}

impl BriefingRequest {
    pub fn new(raw_user_text: impl Into<String>, tone: Tone, historical_entries: Vec<HistoryEntry>) -> Self {
        Self {
            raw_user_text: raw_user_text.into(),
            tone,
            historical_entries,
        }
    }
}

/// A titled slice of the generated briefing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefingSection {
    pub emoji: String,
    pub title: String,
    pub body: String,
}

impl BriefingSection {
    pub fn new(emoji: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            emoji: emoji.into(),
            title: title.into(),
            body: body.into(),
        }
    }

    /// Section without a recognisable header: the whole chunk is body.
    pub fn degenerate(body: impl Into<String>) -> Self {
        Self::new("", "", body)
    }

    pub fn is_degenerate(&self) -> bool {
        self.emoji.is_empty() && self.title.is_empty()
    }
}

/// Composite result of one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Briefing {
    pub id: Uuid,
    pub business_type: BusinessCategory,
    pub tone: Tone,
    pub generated_at: DateTime<Utc>,
    pub raw_text: String,
    pub sections: Vec<BriefingSection>,
}

/// ========================================
/// Text-generation wire protocol
/// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free-form text.
    Text,
    /// A single JSON object with one string field drawn from `values`.
    EnumField { field: String, values: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub response: ResponseFormat,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response: ResponseFormat::Text,
        }
    }

    pub fn enum_field(prompt: impl Into<String>, field: impl Into<String>, values: &[&str]) -> Self {
        Self {
            prompt: prompt.into(),
            response: ResponseFormat::EnumField {
                field: field.into(),
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        }
    }
}
