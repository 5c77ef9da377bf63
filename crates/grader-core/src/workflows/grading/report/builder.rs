use super::super::domain::{
    ClassifiedResponse, EvaluationResult, ExternalLinks, Metadata, ModelAnswerDocument,
    QuestionResult, RecognitionBody, RecognitionResult, Tier,
};
use super::super::fields;
use super::summary::{aggregate, question_percentage, tier_for_percentage};
use super::views::{
    EvaluationView, LinksBlock, MetadataBlock, ModelAnswerView, QuestionBlock, RecognitionView,
    SummaryBlock, TierCountEntry, ViewModel,
};
use serde_json::Value;

const ANSWER_SHEET_KEYS: [&str; 2] = ["answerSheetPreview", "answerSheet"];
const MODEL_ANSWER_KEYS: [&str; 2] = ["modelAnswerPreview", "modelAnswer"];

/// Builds the display structure for a classified response. Only evaluations
/// are aggregated; the other variants pass through under their own tag.
pub fn build_view_model(response: ClassifiedResponse) -> ViewModel {
    match response {
        ClassifiedResponse::Evaluation(evaluation) => {
            ViewModel::Evaluation(evaluation_view(evaluation))
        }
        ClassifiedResponse::ModelAnswer(document) => {
            ViewModel::ModelAnswer(model_answer_view(document))
        }
        ClassifiedResponse::Recognition(result) => {
            ViewModel::Recognition(recognition_view(result))
        }
    }
}

fn evaluation_view(evaluation: EvaluationResult) -> EvaluationView {
    let stats = aggregate(&evaluation);
    let EvaluationResult {
        results,
        metadata,
        links,
        timestamp,
        source_file_name,
    } = evaluation;

    let questions: Vec<QuestionBlock> = results.into_values().map(question_block).collect();
    let tier_breakdown = tier_breakdown(&questions);
    let processed_at = timestamp.as_deref().and_then(fields::parse_timestamp);

    EvaluationView {
        summary: SummaryBlock {
            stats,
            tier_label: stats.tier.label(),
            source_file_name,
            timestamp,
            processed_at,
            metadata: metadata
                .filter(|metadata| !metadata.is_empty())
                .map(metadata_block),
        },
        questions,
        tier_breakdown,
        links: links.filter(|links| !links.is_empty()).map(links_block),
    }
}

fn question_block(question: QuestionResult) -> QuestionBlock {
    let percentage = question_percentage(&question);
    let tier = tier_for_percentage(percentage);

    QuestionBlock {
        id: question.id,
        score: question.score,
        out_of: question.out_of,
        percentage,
        tier,
        tier_label: tier.label(),
        matched: question.matched,
        missing: question.missing,
        feedback: question.feedback,
        audio_ref: question.audio_ref,
    }
}

fn tier_breakdown(questions: &[QuestionBlock]) -> Vec<TierCountEntry> {
    Tier::ordered()
        .into_iter()
        .map(|tier| TierCountEntry {
            tier,
            tier_label: tier.label(),
            questions: questions.iter().filter(|block| block.tier == tier).count(),
        })
        .collect()
}

fn metadata_block(metadata: Metadata) -> MetadataBlock {
    MetadataBlock {
        model: metadata.model,
        project: metadata.project,
        extracted_text_length: metadata.extracted_text_length,
    }
}

fn links_block(links: ExternalLinks) -> LinksBlock {
    LinksBlock {
        project_url: links.project_url,
        log_stream_url: links.log_stream_url,
    }
}

fn model_answer_view(document: ModelAnswerDocument) -> ModelAnswerView {
    ModelAnswerView {
        quiz_number: document.quiz_number,
        course: document.course,
        term: document.term,
        title: document.title,
        answers: document.answers,
    }
}

fn recognition_view(result: RecognitionResult) -> RecognitionView {
    match result.raw {
        RecognitionBody::Text(text) => RecognitionView {
            text: Some(text),
            answer_sheet_markdown: None,
            model_answer_markdown: None,
            raw: None,
        },
        RecognitionBody::Structured(value) => RecognitionView {
            text: None,
            answer_sheet_markdown: first_markdown(&value, &ANSWER_SHEET_KEYS),
            model_answer_markdown: first_markdown(&value, &MODEL_ANSWER_KEYS),
            raw: Some(value),
        },
    }
}

fn first_markdown(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        value
            .get(*key)
            .and_then(Value::as_str)
            .filter(|markdown| !markdown.trim().is_empty())
            .map(str::to_string)
    })
}
