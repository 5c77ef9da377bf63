use grader_core::workflows::grading::report::views::{
    EvaluationView, ModelAnswerView, QuestionBlock, RecognitionView,
};
use grader_core::workflows::grading::ViewModel;
use serde_json::Value;
use std::fmt;

/// Terminal layout for a view model.
pub(crate) struct Rendered<'a>(pub(crate) &'a ViewModel);

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.0.heading())?;
        match self.0 {
            ViewModel::Evaluation(view) => render_evaluation(f, view),
            ViewModel::ModelAnswer(view) => render_model_answer(f, view),
            ViewModel::Recognition(view) => render_recognition(f, view),
        }
    }
}

fn render_evaluation(f: &mut fmt::Formatter<'_>, view: &EvaluationView) -> fmt::Result {
    let summary = &view.summary;
    writeln!(f)?;
    writeln!(f, "Evaluation Summary")?;
    if let Some(file) = &summary.source_file_name {
        writeln!(f, "  File: {file}")?;
    }
    match (&summary.processed_at, &summary.timestamp) {
        (Some(processed), _) => writeln!(f, "  Processed: {}", processed.format("%Y-%m-%d %H:%M:%S"))?,
        (None, Some(raw)) => writeln!(f, "  Processed: {raw}")?,
        (None, None) => {}
    }
    writeln!(
        f,
        "  Score: {:.2}/{} ({:.1}%) - {}",
        summary.stats.total_score,
        summary.stats.total_out_of,
        summary.stats.percentage,
        summary.tier_label
    )?;

    if let Some(metadata) = &summary.metadata {
        writeln!(f)?;
        writeln!(f, "Processing Info")?;
        if let Some(model) = &metadata.model {
            writeln!(f, "  Model: {model}")?;
        }
        if let Some(project) = &metadata.project {
            writeln!(f, "  Project: {project}")?;
        }
        if let Some(length) = metadata.extracted_text_length {
            writeln!(f, "  Extracted text: {length} characters")?;
        }
    }

    if !view.questions.is_empty() {
        writeln!(f)?;
        write!(f, "Tiers:")?;
        for entry in &view.tier_breakdown {
            write!(f, " {} {}", entry.tier_label, entry.questions)?;
        }
        writeln!(f)?;

        writeln!(f)?;
        writeln!(f, "Question Analysis")?;
        for question in &view.questions {
            render_question(f, question)?;
        }
    }

    if let Some(links) = &view.links {
        writeln!(f)?;
        writeln!(f, "Links")?;
        if let Some(url) = &links.project_url {
            writeln!(f, "  View Project: {url}")?;
        }
        if let Some(url) = &links.log_stream_url {
            writeln!(f, "  View Log Stream: {url}")?;
        }
    }
    Ok(())
}

fn render_question(f: &mut fmt::Formatter<'_>, question: &QuestionBlock) -> fmt::Result {
    writeln!(
        f,
        "  {}  {:.2}/{} ({:.1}%) [{}]",
        question.id, question.score, question.out_of, question.percentage, question.tier_label
    )?;
    if !question.matched.is_empty() {
        writeln!(f, "    Matched: {}", question.matched.join(", "))?;
    }
    if !question.missing.is_empty() {
        writeln!(f, "    Missing: {}", question.missing.join(", "))?;
    }
    if let Some(feedback) = &question.feedback {
        writeln!(f, "    Feedback: {feedback}")?;
    }
    if let Some(audio) = &question.audio_ref {
        writeln!(f, "    Audio: {audio}")?;
    }
    Ok(())
}

fn render_model_answer(f: &mut fmt::Formatter<'_>, view: &ModelAnswerView) -> fmt::Result {
    writeln!(f, "Quiz: {}", view.quiz_number)?;
    for (label, value) in [
        ("Course", &view.course),
        ("Term", &view.term),
        ("Title", &view.title),
    ] {
        if let Some(value) = value {
            writeln!(f, "{label}: {value}")?;
        }
    }

    writeln!(f)?;
    match &view.answers {
        Value::Object(answers) => {
            for (key, answer) in answers {
                writeln!(f, "  {key}: {}", inline(answer))?;
            }
            Ok(())
        }
        Value::Array(answers) => {
            for (index, answer) in answers.iter().enumerate() {
                writeln!(f, "  {}. {}", index + 1, inline(answer))?;
            }
            Ok(())
        }
        other => writeln!(f, "  {}", inline(other)),
    }
}

fn render_recognition(f: &mut fmt::Formatter<'_>, view: &RecognitionView) -> fmt::Result {
    if view.has_legacy_previews() {
        if let Some(markdown) = &view.answer_sheet_markdown {
            writeln!(f, "-- Answer Sheet --")?;
            writeln!(f, "{}", markdown.trim_end())?;
        }
        if let Some(markdown) = &view.model_answer_markdown {
            writeln!(f, "-- Model Answer --")?;
            writeln!(f, "{}", markdown.trim_end())?;
        }
        return Ok(());
    }

    if let Some(text) = &view.text {
        return writeln!(f, "{}", text.trim_end());
    }
    if let Some(raw) = &view.raw {
        let pretty = serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string());
        return writeln!(f, "{pretty}");
    }
    Ok(())
}

fn inline(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
