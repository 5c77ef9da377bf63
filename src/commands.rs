use crate::render::Rendered;
use clap::Args;
use grader_core::config::AppConfig;
use grader_core::error::AppError;
use grader_core::telemetry::{self, LogSink};
use grader_core::workflows::grading::report::export::write_question_csv;
use grader_core::workflows::grading::submission::{
    HttpGradingTransport, SubmissionController, SubmissionFiles, SubmissionOutcome, UploadSlot,
    UploadedDocument,
};
use grader_core::workflows::grading::{process_payload, RawPayload, ViewModel};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

#[derive(Args, Debug, Default)]
pub(crate) struct OutputArgs {
    /// Print the view model as JSON instead of the terminal layout
    #[arg(long)]
    pub(crate) json: bool,
    /// Also write the per-question breakdown to a CSV file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    /// Student answer paper (PDF, required)
    #[arg(long)]
    pub(crate) answer_paper: PathBuf,
    /// Model answer paper (PDF)
    #[arg(long)]
    pub(crate) model_answer: Option<PathBuf>,
    /// Question paper (PDF)
    #[arg(long)]
    pub(crate) question_paper: Option<PathBuf>,
    /// Override the configured grading service endpoint
    #[arg(long)]
    pub(crate) api_url: Option<String>,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

#[derive(Args, Debug)]
pub(crate) struct InspectArgs {
    /// Saved grading service response, or `-` to read standard input
    pub(crate) payload: PathBuf,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

pub(crate) async fn run_submit(args: SubmitArgs) -> Result<(), AppError> {
    let SubmitArgs {
        answer_paper,
        model_answer,
        question_paper,
        api_url,
        output,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(api_url) = api_url {
        config.grading.api_url = api_url;
        config.grading.validate()?;
    }
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;

    let files = collect_files(&answer_paper, model_answer.as_deref(), question_paper.as_deref())
        .await?;
    let transport = HttpGradingTransport::new(&config.grading)?;
    info!(
        api_url = transport.api_url(),
        documents = files.present().count(),
        "uploading documents"
    );

    let controller = SubmissionController::new(transport);
    let outcome = tokio::select! {
        outcome = controller.submit(files) => outcome?,
        _ = tokio::signal::ctrl_c() => {
            controller.cancel();
            warn!("interrupted; submission abandoned");
            return Ok(());
        }
    };

    match outcome {
        SubmissionOutcome::Succeeded(view) => emit(&view, &output).await,
        SubmissionOutcome::Failed(error) => {
            eprintln!("Failed to process files: {error}");
            eprintln!();
            eprintln!("Please check:");
            eprintln!("1. The API server is running at {}", config.grading.api_url);
            eprintln!("2. The endpoint is accessible");
            eprintln!("3. Run with APP_LOG_LEVEL=debug for more details");
            Err(error.into())
        }
        SubmissionOutcome::Discarded => Ok(()),
    }
}

pub(crate) async fn run_inspect(args: InspectArgs) -> Result<(), AppError> {
    let InspectArgs { payload, output } = args;

    let config = AppConfig::load()?;
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;

    let body = if payload.as_os_str() == "-" {
        let mut buffer = String::new();
        tokio::io::stdin().read_to_string(&mut buffer).await?;
        buffer
    } else {
        tokio::fs::read_to_string(&payload).await?
    };

    let view = process_payload(RawPayload::Text(body));
    emit(&view, &output).await
}

async fn collect_files(
    answer_paper: &Path,
    model_answer: Option<&Path>,
    question_paper: Option<&Path>,
) -> Result<SubmissionFiles, AppError> {
    let mut files = SubmissionFiles::default();
    for (slot, path) in [
        (UploadSlot::AnswerPaper, Some(answer_paper)),
        (UploadSlot::ModelAnswerPaper, model_answer),
        (UploadSlot::QuestionPaper, question_paper),
    ] {
        if let Some(path) = path {
            files.accept(slot, UploadedDocument::load(path).await?)?;
        }
    }
    Ok(files)
}

async fn emit(view: &ViewModel, output: &OutputArgs) -> Result<(), AppError> {
    if output.json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", Rendered(view));
    }

    if let Some(path) = &output.csv {
        let mut buffer = Vec::new();
        let rows = write_question_csv(view, &mut buffer)?;
        tokio::fs::write(path, buffer).await?;
        info!(rows, path = %path.display(), "wrote question breakdown");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collect_files_rejects_non_pdf_uploads() {
        let dir = std::env::temp_dir().join(format!("grader-client-collect-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.expect("temp dir");
        let answers = dir.join("answers.pdf");
        let notes = dir.join("notes.txt");
        tokio::fs::write(&answers, b"%PDF-1.4").await.expect("write");
        tokio::fs::write(&notes, b"notes").await.expect("write");

        let files = collect_files(&answers, None, None).await.expect("collects");
        assert!(files.is_ready());
        assert_eq!(files.present().count(), 1);

        let error = collect_files(&answers, Some(notes.as_path()), None)
            .await
            .expect_err("text file rejected");
        assert!(error.to_string().contains("Please upload a PDF file"));

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn emit_writes_the_csv_breakdown() {
        let dir = std::env::temp_dir().join(format!("grader-client-emit-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.expect("temp dir");
        let path = dir.join("questions.csv");

        let view = process_payload(RawPayload::Text(
            r#"{"evaluation": {"results": {"Q1": {"score": 2, "out_of": 4}}}}"#.into(),
        ));
        let output = OutputArgs {
            json: true,
            csv: Some(path.clone()),
        };
        emit(&view, &output).await.expect("emits");

        let written = tokio::fs::read_to_string(&path).await.expect("csv written");
        assert!(written.starts_with("id,score,out_of,percentage,tier"));
        assert!(written.contains("Q1,2.0,4.0,50.0,Low"));

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
