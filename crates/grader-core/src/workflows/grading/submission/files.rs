use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// One of the three upload fields of the grading form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadSlot {
    AnswerPaper,
    ModelAnswerPaper,
    QuestionPaper,
}

impl UploadSlot {
    /// Multipart field name expected by the grading service.
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::AnswerPaper => "answerPaper",
            Self::ModelAnswerPaper => "modelAnswerPaper",
            Self::QuestionPaper => "questionPaper",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AnswerPaper => "Answer Paper PDF",
            Self::ModelAnswerPaper => "Model Answer PDF",
            Self::QuestionPaper => "Question Paper PDF",
        }
    }

    pub const fn ordered() -> [UploadSlot; 3] {
        [
            UploadSlot::AnswerPaper,
            UploadSlot::ModelAnswerPaper,
            UploadSlot::QuestionPaper,
        ]
    }
}

impl fmt::Display for UploadSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A document picked for upload, held in memory until it is sent.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for UploadedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedDocument")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadedDocument {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads a document from disk, guessing its content type from the
    /// extension the same way a browser file picker would.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ValidationError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type
            .parse::<mime::Mime>()
            .map(|parsed| parsed.essence_str() == mime::APPLICATION_PDF.essence_str())
            .unwrap_or(false)
    }
}

/// The documents gathered for one submission. Only the answer paper is
/// required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFiles {
    pub answer_paper: Option<UploadedDocument>,
    pub model_answer_paper: Option<UploadedDocument>,
    pub question_paper: Option<UploadedDocument>,
}

impl SubmissionFiles {
    /// Places a document in its slot. Non-PDF documents are rejected and the
    /// slot keeps whatever it held before.
    pub fn accept(
        &mut self,
        slot: UploadSlot,
        document: UploadedDocument,
    ) -> Result<(), ValidationError> {
        if !document.is_pdf() {
            return Err(ValidationError::NotPdf {
                slot,
                file_name: document.file_name,
                content_type: document.content_type,
            });
        }

        *self.slot_mut(slot) = Some(document);
        Ok(())
    }

    pub fn remove(&mut self, slot: UploadSlot) -> Option<UploadedDocument> {
        self.slot_mut(slot).take()
    }

    pub fn get(&self, slot: UploadSlot) -> Option<&UploadedDocument> {
        match slot {
            UploadSlot::AnswerPaper => self.answer_paper.as_ref(),
            UploadSlot::ModelAnswerPaper => self.model_answer_paper.as_ref(),
            UploadSlot::QuestionPaper => self.question_paper.as_ref(),
        }
    }

    /// Filled slots in form order.
    pub fn present(&self) -> impl Iterator<Item = (UploadSlot, &UploadedDocument)> {
        UploadSlot::ordered()
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|document| (slot, document)))
    }

    /// Submit enablement: the answer paper has been provided.
    pub fn is_ready(&self) -> bool {
        self.answer_paper.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.is_ready() {
            return Err(ValidationError::MissingAnswerPaper);
        }

        match self.present().find(|(_, document)| !document.is_pdf()) {
            Some((slot, document)) => Err(ValidationError::NotPdf {
                slot,
                file_name: document.file_name.clone(),
                content_type: document.content_type.clone(),
            }),
            None => Ok(()),
        }
    }

    fn slot_mut(&mut self, slot: UploadSlot) -> &mut Option<UploadedDocument> {
        match slot {
            UploadSlot::AnswerPaper => &mut self.answer_paper,
            UploadSlot::ModelAnswerPaper => &mut self.model_answer_paper,
            UploadSlot::QuestionPaper => &mut self.question_paper,
        }
    }
}

/// Problems with the selected documents; shown to the user, never fatal.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Please upload the Answer Paper PDF file")]
    MissingAnswerPaper,
    #[error("Please upload a PDF file ({slot}: '{file_name}' is {content_type})")]
    NotPdf {
        slot: UploadSlot,
        file_name: String,
        content_type: String,
    },
    #[error("could not read '{}': {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}
