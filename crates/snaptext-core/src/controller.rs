use std::future::Future;
use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use snaptext_client::ProcessingBackend;
use snaptext_config::Config;
use snaptext_types::{Command, UiEvent, WorkflowPhase};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::device::{CameraDevice, ClipboardWriter};
use crate::error::ControllerError;
use crate::events::{Completion, ControllerEvent};
use crate::health;
use crate::session::{Phase, Session};

mod acquire;
mod camera;
mod results;
mod submit;

pub use results::{COPY_CONFIRMATION, COPY_FAILED};

/// External collaborators driven by the controller
#[derive(Clone)]
pub struct Devices {
    pub backend: Arc<dyn ProcessingBackend>,
    pub camera: Arc<dyn CameraDevice>,
    pub clipboard: Arc<dyn ClipboardWriter>,
}

/// Owns the session and mediates every workflow transition.
///
/// Commands and completions arrive on one queue and are handled strictly one
/// at a time. Suspending work is spawned and reports back through the same
/// queue with the ticket it was issued under.
pub struct CaptureController {
    session: Session,
    config: Config,
    devices: Devices,
    queue: AsyncSender<ControllerEvent>,
    ui: AsyncSender<UiEvent>,
    cancel: CancellationToken,
    progress_timer: Option<CancellationToken>,
}

impl CaptureController {
    pub fn new(
        config: Config,
        devices: Devices,
        queue: AsyncSender<ControllerEvent>,
        ui: AsyncSender<UiEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            session: Session::new(),
            config,
            devices,
            queue,
            ui,
            cancel,
            progress_timer: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.session.phase()
    }

    /// Page-load initialisation: start the diagnostic readiness probe
    pub fn start(&self) -> JoinHandle<()> {
        health::spawn_health_check(self.devices.backend.clone())
    }

    /// Consume the queue until shutdown, cancellation, or the queue closes
    pub async fn run(mut self, events: AsyncReceiver<ControllerEvent>) {
        tracing::info!("[CONTROLLER] Starting, waiting for events");

        loop {
            let event = tokio::select! {
                _ = self.cancel.cancelled() => break,
                event = events.recv() => match event {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::warn!("[CONTROLLER] Queue closed: {}", e);
                        break;
                    }
                },
            };

            let stop = matches!(event, ControllerEvent::Command(Command::Shutdown));
            if let Err(e) = self.handle(event).await {
                tracing::warn!("[CONTROLLER] Refused: {}", e);
            }
            if stop {
                break;
            }
        }

        self.shutdown().await;
        tracing::info!("[CONTROLLER] Stopped");
    }

    /// Handle exactly one queued event
    pub async fn handle(&mut self, event: ControllerEvent) -> Result<(), ControllerError> {
        let result = match event {
            ControllerEvent::Command(command) => {
                tracing::debug!("[CONTROLLER] Command: {}", command.name());
                self.dispatch(command).await
            }
            ControllerEvent::Completion(completion) => {
                tracing::debug!("[CONTROLLER] Completion: {}", completion.name());
                self.complete(completion).await;
                Ok(())
            }
        };

        debug_assert!(self.session.invariants_hold(), "{:?}", self.session);
        result
    }

    async fn dispatch(&mut self, command: Command) -> Result<(), ControllerError> {
        match command {
            Command::SelectImage(candidate) => self.select_image(candidate).await,
            Command::RemoveImage => self.remove_image().await,
            Command::Drag(event) => self.handle_drag(event).await,
            Command::OpenCamera => self.open_camera().await,
            Command::CaptureFrame => self.capture_frame().await,
            Command::RetakePhoto => self.retake_photo().await,
            Command::UsePhoto => self.use_photo().await,
            Command::CloseCamera => self.close_camera().await,
            Command::Submit => self.submit().await,
            Command::Recover => self.recover().await,
            Command::SwitchTab(tab) => {
                self.switch_tab(tab).await;
                Ok(())
            }
            Command::CopyActiveTab => self.copy_active_tab().await,
            Command::ResetSession => self.reset_session().await,
            Command::Shutdown => {
                self.shutdown().await;
                Ok(())
            }
        }
    }

    async fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::PreviewRendered { ticket, info } => {
                self.on_preview_rendered(ticket, info).await
            }
            Completion::CameraAcquired { ticket, result } => {
                self.on_camera_acquired(ticket, result).await
            }
            Completion::FrameCaptured { ticket, result } => {
                self.on_frame_captured(ticket, result).await
            }
            Completion::ProgressTick { ticket, percent } => {
                self.on_progress_tick(ticket, percent).await
            }
            Completion::SubmissionFinished { ticket, result } => {
                self.on_submission_finished(ticket, result).await
            }
            Completion::SettleElapsed { ticket } => self.on_settle_elapsed(ticket).await,
            Completion::CopyFinished { ticket, result } => {
                self.on_copy_finished(ticket, result).await
            }
            Completion::CopyFeedbackExpired { ticket } => {
                self.on_copy_feedback_expired(ticket).await
            }
        }
    }

    /// Teardown: stop timers and release any capture device
    pub async fn shutdown(&mut self) {
        self.cancel_progress_timer();
        self.cancel.cancel();
        self.session.camera_pending = None;

        if self.session.phase.has_capture_handle() {
            let upload = self.session.upload_phase();
            match std::mem::replace(&mut self.session.phase, upload) {
                Phase::CameraLive { handle, .. } | Phase::CameraFrozen { handle, .. } => {
                    handle.release()
                }
                _ => {}
            }
            self.emit(UiEvent::CameraClosed).await;
        }
    }

    pub(crate) async fn emit(&self, event: UiEvent) {
        if let Err(e) = self.ui.send(event).await {
            tracing::warn!("[CONTROLLER] Failed to send UI update: {}", e);
        }
    }

    pub(crate) async fn set_phase(&mut self, phase: Phase) {
        self.session.phase = phase;
        self.emit(UiEvent::PhaseChanged(self.session.phase())).await;
    }

    pub(crate) fn invalid(&self, operation: &'static str) -> ControllerError {
        ControllerError::InvalidInPhase {
            operation,
            phase: self.session.phase(),
        }
    }

    /// Run `work` off the queue and post its completion back onto it.
    ///
    /// Work still pending at teardown is dropped.
    pub(crate) fn spawn_completion<F>(&self, work: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let queue = self.queue.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                completion = work => {
                    if let Err(e) = queue.send(completion.into()).await {
                        tracing::debug!("[CONTROLLER] Completion dropped: {}", e);
                    }
                }
            }
        });
    }

    pub(crate) fn cancel_progress_timer(&mut self) {
        if let Some(timer) = self.progress_timer.take() {
            timer.cancel();
        }
    }
}
