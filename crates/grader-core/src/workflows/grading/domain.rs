use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Key of one graded item as reported by the grading service (e.g. `"Q1"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Body handed back by the transport for one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    Text(String),
    Structured(Value),
}

/// Per-question grading evidence. Scores are trusted as received, so
/// `score <= out_of` is not guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResult {
    pub id: QuestionId,
    pub score: f64,
    pub out_of: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub feedback: Option<String>,
    pub audio_ref: Option<String>,
}

/// Processing details the service attaches to v2 evaluations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    pub model: Option<String>,
    pub project: Option<String>,
    pub extracted_text_length: Option<u64>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.project.is_none() && self.extracted_text_length.is_none()
    }
}

/// Observability links published alongside an evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExternalLinks {
    pub project_url: Option<String>,
    pub log_stream_url: Option<String>,
}

impl ExternalLinks {
    pub fn is_empty(&self) -> bool {
        self.project_url.is_none() && self.log_stream_url.is_none()
    }
}

/// Structured per-question evaluation. The map orders question ids
/// lexicographically whatever order the service used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationResult {
    pub results: BTreeMap<QuestionId, QuestionResult>,
    pub metadata: Option<Metadata>,
    pub links: Option<ExternalLinks>,
    pub timestamp: Option<String>,
    pub source_file_name: Option<String>,
}

impl EvaluationResult {
    /// Questions in presentation order.
    pub fn questions(&self) -> impl Iterator<Item = &QuestionResult> {
        self.results.values()
    }
}

/// A reference answer document (quiz number plus its answers).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAnswerDocument {
    pub quiz_number: String,
    pub answers: Value,
    pub course: Option<String>,
    pub term: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionBody {
    Text(String),
    Structured(Value),
}

/// Catch-all for payloads with no recognised shape, including legacy v1
/// markdown previews and text that never parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    pub raw: RecognitionBody,
}

impl RecognitionResult {
    pub fn from_value(value: Value) -> Self {
        let raw = match value {
            Value::String(text) => RecognitionBody::Text(text),
            other => RecognitionBody::Structured(other),
        };
        Self { raw }
    }
}

/// Exactly one interpretation of a grading service payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedResponse {
    Evaluation(EvaluationResult),
    ModelAnswer(ModelAnswerDocument),
    Recognition(RecognitionResult),
}

impl ClassifiedResponse {
    pub const fn variant(&self) -> ResponseVariant {
        match self {
            Self::Evaluation(_) => ResponseVariant::Evaluation,
            Self::ModelAnswer(_) => ResponseVariant::ModelAnswer,
            Self::Recognition(_) => ResponseVariant::Recognition,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseVariant {
    Evaluation,
    ModelAnswer,
    Recognition,
}

impl ResponseVariant {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Evaluation => "Evaluation Results",
            Self::ModelAnswer => "Model Answer",
            Self::Recognition => "Handwritten Recognition",
        }
    }
}

/// Four-level quality band derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Critical,
    Low,
    Medium,
    High,
}

impl Tier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub const fn ordered() -> [Tier; 4] {
        [Tier::High, Tier::Medium, Tier::Low, Tier::Critical]
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
