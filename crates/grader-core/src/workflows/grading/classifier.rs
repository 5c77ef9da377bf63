use super::domain::{
    ClassifiedResponse, EvaluationResult, ExternalLinks, Metadata, ModelAnswerDocument,
    QuestionId, QuestionResult, RecognitionResult,
};
use super::fields;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Maps a normalized payload onto exactly one response variant.
///
/// The shapes can overlap (a v2 evaluation may also carry `quiz_number`), so
/// the order below is part of the contract: evaluation, then model answer,
/// then recognition, which accepts anything.
pub fn classify(value: Value) -> ClassifiedResponse {
    if let Some(results) = evaluation_results(&value) {
        return ClassifiedResponse::Evaluation(read_evaluation(&value, results));
    }

    if let Some(document) = read_model_answer(&value) {
        return ClassifiedResponse::ModelAnswer(document);
    }

    ClassifiedResponse::Recognition(RecognitionResult::from_value(value))
}

fn evaluation_results(value: &Value) -> Option<&Map<String, Value>> {
    fields::present(value, "evaluation")
        .and_then(|evaluation| fields::present(evaluation, "results"))
        .and_then(Value::as_object)
}

fn read_evaluation(value: &Value, results: &Map<String, Value>) -> EvaluationResult {
    let results: BTreeMap<QuestionId, QuestionResult> = results
        .iter()
        .map(|(key, entry)| {
            let id = QuestionId(key.clone());
            let question = read_question(id.clone(), entry);
            (id, question)
        })
        .collect();

    EvaluationResult {
        results,
        metadata: fields::present(value, "metadata").map(read_metadata),
        links: fields::present(value, "galileo").map(read_links),
        timestamp: fields::text(value, "timestamp"),
        source_file_name: fields::text(value, "student_file"),
    }
}

fn read_question(id: QuestionId, entry: &Value) -> QuestionResult {
    QuestionResult {
        id,
        score: fields::number(entry, "score"),
        out_of: fields::number(entry, "out_of"),
        matched: fields::string_list(entry, "matched"),
        missing: fields::string_list(entry, "missing"),
        feedback: fields::text(entry, "feedback"),
        audio_ref: fields::text(entry, "audio_url"),
    }
}

fn read_metadata(metadata: &Value) -> Metadata {
    Metadata {
        model: fields::text(metadata, "model"),
        project: fields::text(metadata, "project"),
        extracted_text_length: fields::count(metadata, "extracted_text_length"),
    }
}

fn read_links(galileo: &Value) -> ExternalLinks {
    ExternalLinks {
        project_url: fields::text(galileo, "project_url"),
        log_stream_url: fields::text(galileo, "log_stream_url"),
    }
}

fn read_model_answer(value: &Value) -> Option<ModelAnswerDocument> {
    let quiz_number = fields::present(value, "quiz_number")?;
    let answers = fields::present(value, "answers")?;

    Some(ModelAnswerDocument {
        quiz_number: match quiz_number {
            Value::String(text) => text.trim().to_string(),
            other => fields::scalar_text(other).unwrap_or_else(|| other.to_string()),
        },
        answers: answers.clone(),
        course: fields::text(value, "course"),
        term: fields::text(value, "term"),
        title: fields::text(value, "title"),
    })
}
