use super::files::SubmissionFiles;
use crate::config::GradingServiceConfig;
use crate::workflows::grading::domain::RawPayload;
use crate::workflows::grading::payload::strip_noise;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, warn};

/// Sends one submission to the grading service and hands back the body.
pub trait GradingTransport: Send + Sync {
    fn submit(
        &self,
        files: &SubmissionFiles,
    ) -> impl Future<Output = Result<RawPayload, TransportError>> + Send;
}

/// Failures reaching the grading service or getting a usable answer from it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error: {status} {body}")]
    Status { status: u16, body: String },
    #[error("grading service reported a failure: {message}")]
    Rejected { message: String },
    #[error("could not prepare request: {0}")]
    Client(String),
}

/// Multipart transport over HTTP.
#[derive(Clone)]
pub struct HttpGradingTransport {
    client: Client,
    api_url: String,
}

impl HttpGradingTransport {
    pub fn new(config: &GradingServiceConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| TransportError::Client(err.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim().to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn form(files: &SubmissionFiles) -> Result<Form, TransportError> {
        files
            .present()
            .try_fold(Form::new(), |form, (slot, document)| {
                let part = Part::bytes(document.bytes.clone())
                    .file_name(document.file_name.clone())
                    .mime_str(&document.content_type)
                    .map_err(|err| TransportError::Client(err.to_string()))?;
                Ok(form.part(slot.field_name(), part))
            })
    }
}

impl GradingTransport for HttpGradingTransport {
    fn submit(
        &self,
        files: &SubmissionFiles,
    ) -> impl Future<Output = Result<RawPayload, TransportError>> + Send {
        let form = Self::form(files);
        let request = self.client.post(&self.api_url);

        async move {
            let response = request
                .multipart(form?)
                .send()
                .await
                .map_err(|err| TransportError::Network(err.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|err| TransportError::Network(err.to_string()))?;

            if !status.is_success() {
                warn!(status = status.as_u16(), "grading service returned an error status");
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            debug!(bytes = body.len(), "grading service responded");
            interpret_body(body)
        }
    }
}

/// Splits a successful body into a payload or a service-reported failure.
/// Bodies that are not JSON are passed on as text for the normalizer.
pub fn interpret_body(body: String) -> Result<RawPayload, TransportError> {
    match serde_json::from_str::<Value>(strip_noise(&body)) {
        Ok(value) => {
            if value.get("success").and_then(Value::as_bool) == Some(false) {
                return Err(TransportError::Rejected {
                    message: failure_message(&value),
                });
            }
            Ok(RawPayload::Structured(value))
        }
        Err(_) => Ok(RawPayload::Text(body)),
    }
}

fn failure_message(value: &Value) -> String {
    ["error", "message", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| "no error detail provided".to_string())
}
