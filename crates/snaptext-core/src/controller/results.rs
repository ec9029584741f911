use std::time::Duration;

use snaptext_types::{ResultTab, UiEvent};

use crate::controller::CaptureController;
use crate::error::{ClipboardError, ControllerError};
use crate::events::{Completion, Ticket};

pub const COPY_CONFIRMATION: &str = "Copied!";
pub const COPY_FAILED: &str = "Could not copy the text. Please try again.";

impl CaptureController {
    /// Show another result tab; the panes themselves are untouched
    pub async fn switch_tab(&mut self, tab: ResultTab) {
        if self.session.active_tab == tab {
            return;
        }
        self.session.active_tab = tab;
        self.emit(UiEvent::TabChanged(tab)).await;
    }

    /// Copy the visible tab's plain text to the clipboard
    pub async fn copy_active_tab(&mut self) -> Result<(), ControllerError> {
        let Some(results) = self.session.results.as_ref() else {
            return Err(ControllerError::NoResults);
        };
        let text = results.plain_text(self.session.active_tab);

        let ticket = self.session.issue_ticket();
        self.session.last_copy = Some(ticket);

        let clipboard = self.devices.clipboard.clone();
        self.spawn_completion(async move {
            let result = clipboard.write_text(text).await;
            Completion::CopyFinished { ticket, result }
        });

        Ok(())
    }

    pub(crate) async fn on_copy_finished(
        &mut self,
        ticket: Ticket,
        result: Result<(), ClipboardError>,
    ) {
        if self.session.last_copy != Some(ticket) {
            return;
        }

        match result {
            Ok(()) => {
                tracing::debug!("Copied {} to clipboard", self.session.active_tab.label());
                self.session.copy_confirmed = true;
                self.emit(UiEvent::CopyFeedback { confirmed: true }).await;

                let revert = Duration::from_millis(self.config.ui.copy_feedback_ms);
                self.spawn_completion(async move {
                    tokio::time::sleep(revert).await;
                    Completion::CopyFeedbackExpired { ticket }
                });
            }
            Err(e) => {
                tracing::error!("Failed to copy text: {}", e);
                self.emit(UiEvent::Notice(COPY_FAILED.to_string())).await;
            }
        }
    }

    pub(crate) async fn on_copy_feedback_expired(&mut self, ticket: Ticket) {
        if self.session.last_copy == Some(ticket) && self.session.copy_confirmed {
            self.session.copy_confirmed = false;
            self.emit(UiEvent::CopyFeedback { confirmed: false }).await;
        }
    }
}
