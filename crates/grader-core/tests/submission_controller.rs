use grader_core::workflows::grading::submission::{
    GradingTransport, SubmissionController, SubmissionError, SubmissionFiles, SubmissionOutcome,
    SubmissionState, TransportError, UploadSlot, UploadedDocument,
};
use grader_core::workflows::grading::{RawPayload, ViewModel};
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

type Reply = Result<RawPayload, TransportError>;

/// Holds every request open until the test releases it.
#[derive(Clone, Default)]
struct GatedTransport {
    pending: Arc<Mutex<Vec<oneshot::Sender<Reply>>>>,
}

impl GatedTransport {
    fn release(&self, reply: Reply) {
        let sender = self
            .pending
            .lock()
            .expect("gate mutex poisoned")
            .pop()
            .expect("a request is pending");
        sender.send(reply).expect("request still waiting");
    }
}

impl GradingTransport for GatedTransport {
    fn submit(&self, _files: &SubmissionFiles) -> impl Future<Output = Reply> + Send {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().expect("gate mutex poisoned").push(tx);
        async move {
            rx.await
                .unwrap_or_else(|_| Err(TransportError::Network("gate dropped".into())))
        }
    }
}

fn ready_files() -> SubmissionFiles {
    let mut files = SubmissionFiles::default();
    files
        .accept(
            UploadSlot::AnswerPaper,
            UploadedDocument::new("answers.pdf", "application/pdf", b"%PDF-1.7".to_vec()),
        )
        .expect("pdf accepted");
    files
        .accept(
            UploadSlot::ModelAnswerPaper,
            UploadedDocument::new("model.pdf", "application/pdf", b"%PDF-1.7".to_vec()),
        )
        .expect("pdf accepted");
    files
}

fn evaluation_body() -> RawPayload {
    RawPayload::Text(
        r#"{"evaluation": {"results": {"Q1": {"score": 4, "out_of": 5, "matched": ["a"], "missing": []}}}}"#
            .to_string(),
    )
}

async fn wait_until_submitting<T: GradingTransport>(controller: &SubmissionController<T>) {
    for _ in 0..1_000 {
        if controller.state().is_submitting() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("submission never started");
}

#[tokio::test]
async fn success_holds_view_and_accepted_files() {
    let gate = GatedTransport::default();
    let controller = Arc::new(SubmissionController::new(gate.clone()));

    let task = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit(ready_files()).await })
    };
    wait_until_submitting(&controller).await;
    assert!(!controller.can_submit(), "submit disabled while in flight");

    gate.release(Ok(evaluation_body()));
    let outcome = task.await.expect("task joins").expect("submission runs");
    assert!(matches!(
        outcome,
        SubmissionOutcome::Succeeded(ViewModel::Evaluation(_))
    ));

    match controller.state() {
        SubmissionState::Succeeded { view, files } => {
            assert_eq!(view.summary().map(|stats| stats.percentage), Some(80.0));
            assert_eq!(files, ready_files());
        }
        other => panic!("expected succeeded state, got {other:?}"),
    }
}

#[tokio::test]
async fn second_submission_is_rejected_while_one_is_in_flight() {
    let gate = GatedTransport::default();
    let controller = Arc::new(SubmissionController::new(gate.clone()));

    let task = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit(ready_files()).await })
    };
    wait_until_submitting(&controller).await;

    let overlapping = controller.submit(ready_files()).await;
    assert!(matches!(overlapping, Err(SubmissionError::InFlight)));

    gate.release(Ok(evaluation_body()));
    task.await.expect("task joins").expect("first submission runs");
    assert_eq!(controller.state().label(), "succeeded");
}

#[tokio::test]
async fn cancelled_submission_discards_its_late_response() {
    let gate = GatedTransport::default();
    let controller = Arc::new(SubmissionController::new(gate.clone()));

    let task = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit(ready_files()).await })
    };
    wait_until_submitting(&controller).await;

    assert!(controller.cancel());
    assert_eq!(controller.state(), SubmissionState::Idle);

    gate.release(Ok(evaluation_body()));
    let outcome = task.await.expect("task joins").expect("submission runs");
    assert_eq!(outcome, SubmissionOutcome::Discarded);
    assert_eq!(controller.state(), SubmissionState::Idle);
}

#[tokio::test]
async fn late_response_never_overwrites_a_newer_submission() {
    let gate = GatedTransport::default();
    let controller = Arc::new(SubmissionController::new(gate.clone()));

    let stale = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit(ready_files()).await })
    };
    wait_until_submitting(&controller).await;
    controller.reset();

    let fresh = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit(ready_files()).await })
    };
    wait_until_submitting(&controller).await;
    for _ in 0..100 {
        if gate.pending.lock().expect("gate mutex poisoned").len() == 2 {
            break;
        }
        tokio::task::yield_now().await;
    }

    // The most recent request sits on top of the stack.
    gate.release(Err(TransportError::Status {
        status: 500,
        body: "Internal Server Error".into(),
    }));
    let fresh_outcome = fresh.await.expect("task joins").expect("submission runs");
    assert!(matches!(fresh_outcome, SubmissionOutcome::Failed(_)));

    gate.release(Ok(evaluation_body()));
    let stale_outcome = stale.await.expect("task joins").expect("submission runs");
    assert_eq!(stale_outcome, SubmissionOutcome::Discarded);

    match controller.state() {
        SubmissionState::Failed { message } => {
            assert_eq!(
                message,
                "Failed to process files: API error: 500 Internal Server Error"
            );
        }
        other => panic!("expected failed state, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_keeps_no_partial_view() {
    let gate = GatedTransport::default();
    let controller = Arc::new(SubmissionController::new(gate.clone()));

    let task = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit(ready_files()).await })
    };
    wait_until_submitting(&controller).await;
    gate.release(Err(TransportError::Network("connection reset".into())));

    let outcome = task.await.expect("task joins").expect("submission runs");
    assert_eq!(
        outcome,
        SubmissionOutcome::Failed(TransportError::Network("connection reset".into()))
    );
    assert!(matches!(controller.state(), SubmissionState::Failed { .. }));

    controller.reset();
    assert!(controller.can_submit());
}

#[tokio::test]
async fn dropping_a_pending_submit_returns_to_idle() {
    let gate = GatedTransport::default();
    let controller = SubmissionController::new(gate.clone());

    let timed_out = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        controller.submit(ready_files()),
    )
    .await;
    assert!(timed_out.is_err(), "gate never answers");

    assert_eq!(controller.state(), SubmissionState::Idle);
    assert!(controller.can_submit());
    assert!(!controller.cancel(), "nothing left in flight");
}

#[tokio::test]
async fn aborting_a_stale_submit_leaves_the_newer_one_in_flight() {
    let gate = GatedTransport::default();
    let controller = Arc::new(SubmissionController::new(gate.clone()));

    let stale = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit(ready_files()).await })
    };
    wait_until_submitting(&controller).await;
    controller.reset();

    let fresh = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit(ready_files()).await })
    };
    wait_until_submitting(&controller).await;

    stale.abort();
    assert!(stale.await.is_err(), "stale task was aborted");
    assert!(controller.state().is_submitting());

    for _ in 0..100 {
        if gate.pending.lock().expect("gate mutex poisoned").len() == 2 {
            break;
        }
        tokio::task::yield_now().await;
    }
    gate.release(Ok(evaluation_body()));
    let outcome = fresh.await.expect("task joins").expect("submission runs");
    assert!(matches!(outcome, SubmissionOutcome::Succeeded(_)));
}
