mod controller;
mod files;
mod transport;

pub use controller::{SubmissionController, SubmissionError, SubmissionOutcome, SubmissionState};
pub use files::{SubmissionFiles, UploadSlot, UploadedDocument, ValidationError};
pub use transport::{interpret_body, GradingTransport, HttpGradingTransport, TransportError};
