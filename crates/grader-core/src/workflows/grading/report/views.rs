use super::super::domain::{QuestionId, ResponseVariant, Tier};
use super::summary::SummaryStats;
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

/// Everything presentation needs for one submission, tagged by variant so
/// each layout can be chosen without probing fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum ViewModel {
    Evaluation(EvaluationView),
    ModelAnswer(ModelAnswerView),
    Recognition(RecognitionView),
}

impl ViewModel {
    pub const fn variant(&self) -> ResponseVariant {
        match self {
            Self::Evaluation(_) => ResponseVariant::Evaluation,
            Self::ModelAnswer(_) => ResponseVariant::ModelAnswer,
            Self::Recognition(_) => ResponseVariant::Recognition,
        }
    }

    pub const fn heading(&self) -> &'static str {
        self.variant().label()
    }

    pub fn summary(&self) -> Option<&SummaryStats> {
        match self {
            Self::Evaluation(view) => Some(&view.summary.stats),
            Self::ModelAnswer(_) | Self::Recognition(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationView {
    pub summary: SummaryBlock,
    pub questions: Vec<QuestionBlock>,
    pub tier_breakdown: Vec<TierCountEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryBlock {
    #[serde(flatten)]
    pub stats: SummaryStats,
    pub tier_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text_length: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionBlock {
    pub id: QuestionId,
    pub score: f64,
    pub out_of: f64,
    pub percentage: f64,
    pub tier: Tier,
    pub tier_label: &'static str,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierCountEntry {
    pub tier: Tier,
    pub tier_label: &'static str,
    pub questions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinksBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_stream_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelAnswerView {
    pub quiz_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub answers: Value,
}

/// Pass-through for unrecognised payloads. Legacy previews are lifted out
/// when the payload carries them; `raw` holds any structured payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_sheet_markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_answer_markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl RecognitionView {
    pub fn has_legacy_previews(&self) -> bool {
        self.answer_sheet_markdown.is_some() || self.model_answer_markdown.is_some()
    }
}
