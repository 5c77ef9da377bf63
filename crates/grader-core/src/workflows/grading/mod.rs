//! Grading service responses: normalizing the body, deciding which shape it
//! has, scoring evaluations, and building what presentation renders.

mod classifier;
pub mod domain;
mod fields;
mod payload;
pub mod report;
pub mod submission;

pub use classifier::classify;
pub use domain::{
    ClassifiedResponse, EvaluationResult, ExternalLinks, Metadata, ModelAnswerDocument,
    QuestionId, QuestionResult, RawPayload, RecognitionBody, RecognitionResult, ResponseVariant,
    Tier,
};
pub use payload::normalize;
pub use report::{aggregate, build_view_model, tier_of, SummaryStats, ViewModel};

use tracing::debug;

/// Normalize, classify, then build. Total: every payload yields a view.
pub fn process_payload(payload: RawPayload) -> ViewModel {
    let classified = classify(normalize(payload));
    debug!(variant = ?classified.variant(), "classified grading response");
    build_view_model(classified)
}
