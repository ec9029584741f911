use std::time::Duration;

use snaptext_client::{ClientError, ProcessResponse};
use snaptext_types::UiEvent;

use crate::controller::CaptureController;
use crate::error::ControllerError;
use crate::events::{Completion, Ticket};
use crate::progress::{self, COMPLETE};
use crate::session::{Phase, PreviewState, ProgressDisplay, ResultPanes};

impl CaptureController {
    /// Send the selected image to the backend. One submission at a time.
    pub async fn submit(&mut self) -> Result<(), ControllerError> {
        if self.session.submission_in_flight() {
            tracing::warn!("Submission already in flight, ignoring");
            return Err(ControllerError::SubmissionInFlight);
        }
        if !matches!(self.session.phase, Phase::Previewing) {
            return Err(self.invalid("submit"));
        }
        let Some(image) = self.session.selected.as_ref().map(|s| s.image.clone()) else {
            return Err(ControllerError::NothingSelected);
        };

        let ticket = self.session.issue_ticket();
        // A camera request still in flight is abandoned; its grant gets released
        self.session.camera_pending = None;
        self.session.results = None;
        self.session.recovery_offered = false;

        self.set_phase(Phase::Submitting {
            ticket,
            outcome: None,
        })
        .await;
        self.set_progress(0, progress::status_text(0).to_string()).await;

        let timer = self.cancel.child_token();
        progress::spawn_progress_timer(
            ticket,
            &self.config.progress,
            timer.clone(),
            self.queue.clone(),
        );
        self.progress_timer = Some(timer);

        tracing::info!("Submitting {} as {:?}", image.name, ticket);
        let backend = self.devices.backend.clone();
        self.spawn_completion(async move {
            let result = backend.process_image(image).await;
            Completion::SubmissionFinished { ticket, result }
        });

        Ok(())
    }

    pub(crate) async fn on_progress_tick(&mut self, ticket: Ticket, percent: u8) {
        let live = matches!(
            self.session.phase,
            Phase::Submitting { ticket: current, outcome: None } if current == ticket
        );
        if !live || percent <= self.session.progress.percent {
            return;
        }

        self.set_progress(percent, progress::status_text(percent).to_string())
            .await;
    }

    pub(crate) async fn on_submission_finished(
        &mut self,
        ticket: Ticket,
        result: Result<ProcessResponse, ClientError>,
    ) {
        let live = matches!(
            self.session.phase,
            Phase::Submitting { ticket: current, outcome: None } if current == ticket
        );
        if !live {
            tracing::debug!("Discarding stale submission result {:?}", ticket);
            return;
        }
        self.cancel_progress_timer();

        match result {
            Ok(response) => {
                tracing::info!("Processing succeeded for {:?}", ticket);
                self.set_progress(COMPLETE, progress::status_text(COMPLETE).to_string())
                    .await;
                self.session.phase = Phase::Submitting {
                    ticket,
                    outcome: Some(response),
                };

                let settle = Duration::from_millis(self.config.progress.settle_ms);
                self.spawn_completion(async move {
                    tokio::time::sleep(settle).await;
                    Completion::SettleElapsed { ticket }
                });
            }
            Err(e) => {
                tracing::error!("Processing failed: {}", e);
                let message = e.user_message();
                self.set_progress(0, message.clone()).await;
                self.session.recovery_offered = true;
                self.set_phase(Phase::Failed { message }).await;
                self.emit(UiEvent::RecoveryOffered).await;
            }
        }
    }

    pub(crate) async fn on_settle_elapsed(&mut self, ticket: Ticket) {
        match std::mem::replace(&mut self.session.phase, Phase::Idle) {
            Phase::Submitting {
                ticket: current,
                outcome: Some(response),
            } if current == ticket => {
                let panes = ResultPanes::from_response(response);
                let shown = UiEvent::ResultsShown {
                    text: panes.extracted_text.clone(),
                    markup: panes.api_rendered.spans.clone(),
                };
                self.session.results = Some(panes);
                self.set_phase(Phase::ResultReady).await;
                self.emit(shown).await;
            }
            other => self.session.phase = other,
        }
    }

    /// Leave the failed processing view; the selection is kept
    pub async fn recover(&mut self) -> Result<(), ControllerError> {
        if !matches!(self.session.phase, Phase::Failed { .. }) {
            return Err(self.invalid("recover"));
        }

        self.session.recovery_offered = false;
        let upload = self.session.upload_phase();
        self.set_phase(upload).await;
        Ok(())
    }

    /// "New query": drop the selection and results and start over
    pub async fn reset_session(&mut self) -> Result<(), ControllerError> {
        if !matches!(
            self.session.phase,
            Phase::Idle | Phase::Previewing | Phase::ResultReady | Phase::Failed { .. }
        ) {
            return Err(self.invalid("new query"));
        }

        self.session.selected = None;
        self.session.preview = PreviewState::Hidden;
        self.session.results = None;
        self.session.recovery_offered = false;
        self.session.copy_confirmed = false;
        self.session.camera_pending = None;
        self.session.last_copy = None;

        self.emit(UiEvent::PreviewCleared).await;
        self.set_progress(0, String::new()).await;
        self.set_phase(Phase::Idle).await;
        Ok(())
    }

    async fn set_progress(&mut self, percent: u8, status: String) {
        self.session.progress = ProgressDisplay {
            percent,
            status: status.clone(),
        };
        self.emit(UiEvent::Progress { percent, status }).await;
    }
}
