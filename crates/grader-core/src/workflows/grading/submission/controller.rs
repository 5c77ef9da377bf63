use super::files::{SubmissionFiles, ValidationError};
use super::transport::{GradingTransport, TransportError};
use crate::workflows::grading::process_payload;
use crate::workflows::grading::report::ViewModel;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Where the submission flow currently stands. Each transition replaces the
/// whole value.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Submitting { files: SubmissionFiles },
    Succeeded { view: ViewModel, files: SubmissionFiles },
    Failed { message: String },
}

impl SubmissionState {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting { .. } => "submitting",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }

    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }
}

/// What became of a submission once its transport call returned.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Succeeded(ViewModel),
    Failed(TransportError),
    /// Cancelled or reset while in flight; the late result was dropped.
    Discarded,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a submission is already in progress")]
    InFlight,
    #[error("cannot submit while the previous result is {state}; reset first")]
    NotIdle { state: &'static str },
}

struct Slot {
    state: SubmissionState,
    generation: u64,
}

/// Returns the slot to `Idle` if the submit future is dropped while its
/// request is still outstanding.
struct InFlight<'a> {
    slot: &'a Mutex<Slot>,
    ticket: u64,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.generation == self.ticket && slot.state.is_submitting() {
            slot.generation += 1;
            slot.state = SubmissionState::Idle;
            warn!(
                submission = self.ticket,
                "submission dropped before the grading service answered"
            );
        }
    }
}

/// Sequences one submission at a time: validate, send, then run the pure
/// pipeline on whatever came back.
pub struct SubmissionController<T> {
    transport: T,
    slot: Mutex<Slot>,
}

impl<T> SubmissionController<T>
where
    T: GradingTransport,
{
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            slot: Mutex::new(Slot {
                state: SubmissionState::Idle,
                generation: 0,
            }),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().state.clone()
    }

    /// Whether the submit affordance should be enabled.
    pub fn can_submit(&self) -> bool {
        matches!(self.lock().state, SubmissionState::Idle)
    }

    pub async fn submit(
        &self,
        files: SubmissionFiles,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let ticket = {
            let mut slot = self.lock();
            match &slot.state {
                SubmissionState::Idle => {}
                SubmissionState::Submitting { .. } => return Err(SubmissionError::InFlight),
                other => {
                    return Err(SubmissionError::NotIdle {
                        state: other.label(),
                    })
                }
            }

            files.validate()?;
            slot.generation += 1;
            slot.state = SubmissionState::Submitting {
                files: files.clone(),
            };
            slot.generation
        };

        info!(submission = ticket, "submitting documents for grading");
        let in_flight = InFlight {
            slot: &self.slot,
            ticket,
            armed: true,
        };
        let result = self.transport.submit(&files).await;
        in_flight.disarm();

        let mut slot = self.lock();
        if slot.generation != ticket || !slot.state.is_submitting() {
            warn!(
                submission = ticket,
                "submission was cancelled; discarding late response"
            );
            return Ok(SubmissionOutcome::Discarded);
        }

        match result {
            Ok(payload) => {
                let view = process_payload(payload);
                info!(
                    submission = ticket,
                    variant = ?view.variant(),
                    "grading response ready"
                );
                slot.state = SubmissionState::Succeeded {
                    view: view.clone(),
                    files,
                };
                Ok(SubmissionOutcome::Succeeded(view))
            }
            Err(error) => {
                warn!(submission = ticket, %error, "grading request failed");
                slot.state = SubmissionState::Failed {
                    message: format!("Failed to process files: {error}"),
                };
                Ok(SubmissionOutcome::Failed(error))
            }
        }
    }

    /// Abandons an outstanding submission. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let mut slot = self.lock();
        if !slot.state.is_submitting() {
            return false;
        }

        slot.generation += 1;
        slot.state = SubmissionState::Idle;
        info!("submission cancelled");
        true
    }

    /// Clears any held result and returns to `Idle`.
    pub fn reset(&self) {
        let mut slot = self.lock();
        slot.generation += 1;
        slot.state = SubmissionState::Idle;
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
