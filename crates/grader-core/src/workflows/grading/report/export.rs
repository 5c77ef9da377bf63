use super::views::{QuestionBlock, ViewModel};
use serde::Serialize;
use std::io::Write;

const LIST_SEPARATOR: &str = "; ";

#[derive(Debug, Serialize)]
struct QuestionRow<'a> {
    id: &'a str,
    score: f64,
    out_of: f64,
    percentage: f64,
    tier: &'static str,
    matched: String,
    missing: String,
    feedback: &'a str,
}

impl<'a> From<&'a QuestionBlock> for QuestionRow<'a> {
    fn from(block: &'a QuestionBlock) -> Self {
        Self {
            id: block.id.as_str(),
            score: block.score,
            out_of: block.out_of,
            percentage: block.percentage,
            tier: block.tier_label,
            matched: block.matched.join(LIST_SEPARATOR),
            missing: block.missing.join(LIST_SEPARATOR),
            feedback: block.feedback.as_deref().unwrap_or_default(),
        }
    }
}

/// Writes one CSV row per question. Views without questions produce only the
/// header row; returns the number of question rows written.
pub fn write_question_csv<W: Write>(view: &ViewModel, writer: W) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let questions: &[QuestionBlock] = match view {
        ViewModel::Evaluation(evaluation) => &evaluation.questions,
        ViewModel::ModelAnswer(_) | ViewModel::Recognition(_) => &[],
    };

    if questions.is_empty() {
        csv_writer.write_record([
            "id",
            "score",
            "out_of",
            "percentage",
            "tier",
            "matched",
            "missing",
            "feedback",
        ])?;
    }

    for block in questions {
        csv_writer.serialize(QuestionRow::from(block))?;
    }

    csv_writer.flush()?;
    Ok(questions.len())
}
