use std::time::Duration;

use snaptext_client::ProcessResponse;
use snaptext_types::{Command, StyledSpan, TextStyle, UiEvent, WorkflowPhase};

use super::support::{
    FakeBackend, FakeCamera, FakeClipboard, Harness, MIB, Reply, hello_response, jpeg_candidate,
};
use crate::controller::CaptureController;
use crate::error::ControllerError;
use crate::events::ControllerEvent;
use crate::session::{NO_API_FALLBACK, NO_TEXT_FALLBACK};

fn failing_backend(status: u16, message: &str) -> FakeBackend {
    FakeBackend::new(
        Reply::Failure {
            status,
            message: message.to_string(),
        },
        Duration::from_millis(800),
    )
}

async fn submitted(h: &mut Harness) {
    h.command(Command::SelectImage(jpeg_candidate(2 * MIB)))
        .await
        .unwrap();
    h.command(Command::Submit).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_submission_produces_results() {
    let mut h = Harness::new();

    submitted(&mut h).await;
    assert_eq!(h.session().phase(), WorkflowPhase::Submitting);
    assert!(h.session().submission_in_flight());

    h.pump_until(|s| s.phase() == WorkflowPhase::ResultReady)
        .await;

    let results = h.session().results().unwrap();
    assert_eq!(results.extracted_text, "Hello");
    assert_eq!(
        results.api_rendered.spans,
        vec![StyledSpan {
            text: "Hi".to_string(),
            style: TextStyle {
                bold: true,
                ..TextStyle::default()
            },
        }]
    );
    assert_eq!(h.session().progress().percent, 100);
    assert!(!h.session().submission_in_flight());

    let received = h.backend.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].name, "receipt.jpg");
    assert_eq!(received[0].size(), (2 * MIB) as u64);

    let events = h.drain_ui();
    assert!(events.contains(&UiEvent::Progress {
        percent: 100,
        status: "Finishing...".to_string(),
    }));
    assert!(events.contains(&UiEvent::ResultsShown {
        text: "Hello".to_string(),
        markup: results.api_rendered.spans.clone(),
    }));
}

#[tokio::test(start_paused = true)]
async fn test_results_wait_for_settle_delay() {
    let mut h = Harness::new();
    submitted(&mut h).await;

    h.pump_until(|s| s.progress().percent == 100).await;
    let answered = tokio::time::Instant::now();
    assert_eq!(h.session().phase(), WorkflowPhase::Submitting);

    h.pump_until(|s| s.phase() == WorkflowPhase::ResultReady)
        .await;
    assert!(answered.elapsed() >= Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_progress_is_monotonic_and_capped() {
    let mut h = Harness::with(
        FakeBackend::new(Reply::Success(hello_response()), Duration::from_secs(30)),
        FakeCamera::new(true, Duration::ZERO),
        FakeClipboard::new(false),
    );
    submitted(&mut h).await;

    let mut seen = vec![h.session().progress().percent];
    while h.session().progress().percent < 100 {
        h.step().await;
        seen.push(h.session().progress().percent);
    }

    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{:?}", seen);
    let before_answer = &seen[..seen.len() - 1];
    assert!(before_answer.iter().all(|p| *p <= 95));
    assert!(before_answer.contains(&95));
}

#[tokio::test(start_paused = true)]
async fn test_status_text_tracks_progress() {
    let mut h = Harness::with(
        FakeBackend::new(Reply::Success(hello_response()), Duration::from_secs(10)),
        FakeCamera::new(true, Duration::ZERO),
        FakeClipboard::new(false),
    );
    submitted(&mut h).await;

    h.pump_until(|s| s.progress().percent >= 35).await;
    assert_eq!(h.session().progress().status, "Extracting text with OCR...");

    h.pump_until(|s| s.progress().percent >= 65).await;
    assert_eq!(h.session().progress().status, "Querying the language API...");
}

#[tokio::test(start_paused = true)]
async fn test_double_submit_sends_once() {
    let mut h = Harness::new();
    submitted(&mut h).await;

    let second = h.command(Command::Submit).await;

    assert_eq!(second, Err(ControllerError::SubmissionInFlight));
    h.pump_until(|s| s.phase() == WorkflowPhase::ResultReady)
        .await;
    assert_eq!(h.backend.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_submit_without_selection_is_refused() {
    let mut h = Harness::new();

    let result = h.command(Command::Submit).await;

    assert_eq!(
        result,
        Err(ControllerError::InvalidInPhase {
            operation: "submit",
            phase: WorkflowPhase::Idle,
        })
    );
    assert_eq!(h.backend.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_backend_failure_offers_recovery() {
    let mut h = Harness::with(
        failing_backend(500, "OCR failed"),
        FakeCamera::new(true, Duration::ZERO),
        FakeClipboard::new(false),
    );
    submitted(&mut h).await;

    h.pump_until(|s| s.phase() == WorkflowPhase::Failed).await;

    assert_eq!(h.session().progress().percent, 0);
    assert_eq!(h.session().progress().status, "OCR failed");
    assert_eq!(h.session().failure_message(), Some("OCR failed"));
    assert!(h.session().recovery_offered());
    assert!(h.session().results().is_none());
    assert!(h.drain_ui().contains(&UiEvent::RecoveryOffered));

    h.command(Command::Recover).await.unwrap();

    assert_eq!(h.session().phase(), WorkflowPhase::Previewing);
    assert!(!h.session().recovery_offered());
    assert_eq!(h.session().selected_image().unwrap().name, "receipt.jpg");
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_backend_offers_recovery() {
    let mut h = Harness::with(
        FakeBackend::new(Reply::Unreachable, Duration::from_millis(300)),
        FakeCamera::new(true, Duration::ZERO),
        FakeClipboard::new(false),
    );
    submitted(&mut h).await;

    h.pump_until(|s| s.phase() == WorkflowPhase::Failed).await;

    let unreachable = "Could not reach the processing service";
    assert_eq!(h.session().progress().percent, 0);
    assert_eq!(h.session().progress().status, unreachable);
    assert_eq!(h.session().failure_message(), Some(unreachable));
    assert!(h.session().recovery_offered());
    assert!(h.drain_ui().contains(&UiEvent::RecoveryOffered));

    h.command(Command::Recover).await.unwrap();

    assert_eq!(h.session().phase(), WorkflowPhase::Previewing);
    assert_eq!(h.session().selected_image().unwrap().name, "receipt.jpg");
    assert_eq!(h.backend.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_resubmit_after_recovery() {
    let mut h = Harness::with(
        failing_backend(502, "Upstream unavailable"),
        FakeCamera::new(true, Duration::ZERO),
        FakeClipboard::new(false),
    );
    submitted(&mut h).await;
    h.pump_until(|s| s.phase() == WorkflowPhase::Failed).await;
    h.command(Command::Recover).await.unwrap();

    h.backend.set_reply(Reply::Success(hello_response()));
    h.command(Command::Submit).await.unwrap();
    h.pump_until(|s| s.phase() == WorkflowPhase::ResultReady)
        .await;

    assert_eq!(h.backend.calls(), 2);
    assert_eq!(h.session().results().unwrap().extracted_text, "Hello");
}

#[tokio::test(start_paused = true)]
async fn test_recover_only_from_failure() {
    let mut h = Harness::new();

    let result = h.command(Command::Recover).await;

    assert!(matches!(
        result,
        Err(ControllerError::InvalidInPhase { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_empty_response_uses_fallbacks() {
    let mut h = Harness::with(
        FakeBackend::new(
            Reply::Success(ProcessResponse {
                success: Some(true),
                text: Some(String::new()),
                maritaca_response: None,
            }),
            Duration::from_millis(300),
        ),
        FakeCamera::new(true, Duration::ZERO),
        FakeClipboard::new(false),
    );
    submitted(&mut h).await;

    h.pump_until(|s| s.phase() == WorkflowPhase::ResultReady)
        .await;

    let results = h.session().results().unwrap();
    assert_eq!(results.extracted_text, NO_TEXT_FALLBACK);
    assert_eq!(results.api_rendered.plain_text(), NO_API_FALLBACK);
}

#[tokio::test(start_paused = true)]
async fn test_timer_stops_after_answer() {
    let mut h = Harness::new();
    submitted(&mut h).await;
    h.pump_until(|s| s.phase() == WorkflowPhase::ResultReady)
        .await;

    tokio::time::sleep(Duration::from_secs(5)).await;

    assert!(h.queue.is_empty());
    assert_eq!(h.session().progress().percent, 100);
}

#[tokio::test(start_paused = true)]
async fn test_new_query_resets_session() {
    let mut h = Harness::new();
    submitted(&mut h).await;
    h.pump_until(|s| s.phase() == WorkflowPhase::ResultReady)
        .await;
    h.drain_ui();

    h.command(Command::ResetSession).await.unwrap();

    assert_eq!(h.session().phase(), WorkflowPhase::Idle);
    assert!(h.session().selected_image().is_none());
    assert!(h.session().results().is_none());
    assert_eq!(h.session().progress().percent, 0);
    assert_eq!(
        h.drain_ui(),
        vec![
            UiEvent::PreviewCleared,
            UiEvent::Progress {
                percent: 0,
                status: String::new(),
            },
            UiEvent::PhaseChanged(WorkflowPhase::Idle),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_new_query_refused_while_submitting() {
    let mut h = Harness::new();
    submitted(&mut h).await;

    let result = h.command(Command::ResetSession).await;

    assert!(matches!(
        result,
        Err(ControllerError::InvalidInPhase { .. })
    ));
    assert!(h.session().submission_in_flight());
}

#[tokio::test]
async fn test_run_loop_drives_full_workflow() {
    let (queue_tx, queue_rx) = kanal::unbounded_async::<ControllerEvent>();
    let (ui_tx, ui_rx) = kanal::unbounded_async::<UiEvent>();
    let harness = Harness::new();
    let devices = crate::controller::Devices {
        backend: harness.backend.clone(),
        camera: harness.camera.clone(),
        clipboard: harness.clipboard.clone(),
    };
    let controller = CaptureController::new(
        snaptext_config::Config::default(),
        devices,
        queue_tx.clone(),
        ui_tx,
        tokio_util::sync::CancellationToken::new(),
    );
    let task = tokio::spawn(controller.run(queue_rx));

    queue_tx
        .send(Command::SelectImage(jpeg_candidate(1024)).into())
        .await
        .unwrap();
    queue_tx.send(Command::Submit.into()).await.unwrap();

    let shown = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            match ui_rx.recv().await {
                Ok(UiEvent::ResultsShown { text, .. }) => break text,
                Ok(_) => continue,
                Err(e) => panic!("UI channel error: {}", e),
            }
        }
    })
    .await
    .expect("Timeout - results never shown");
    assert_eq!(shown, "Hello");

    queue_tx.send(Command::Shutdown.into()).await.unwrap();
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("Timeout - controller did not stop")
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_health_probe_leaves_workflow_alone() {
    let mut h = Harness::new();

    h.controller.start().await.unwrap();

    assert_eq!(h.session().phase(), WorkflowPhase::Idle);
    assert!(h.drain_ui().is_empty());
    assert!(h.queue.is_empty());
    h.command(Command::SelectImage(jpeg_candidate(1024)))
        .await
        .unwrap();
}
