use std::sync::Arc;

use snaptext_types::{DragEvent, ImageCandidate, PreviewInfo, UiEvent};

use crate::controller::CaptureController;
use crate::error::ControllerError;
use crate::events::{Completion, Ticket};
use crate::selection::{self, SelectedImage};
use crate::session::{Phase, PreviewState};

impl CaptureController {
    /// Validate and adopt a new image, replacing any previous selection
    pub async fn select_image(&mut self, candidate: ImageCandidate) -> Result<(), ControllerError> {
        if !matches!(self.session.phase, Phase::Idle | Phase::Previewing) {
            return Err(self.invalid("select image"));
        }

        let max_bytes = self.config.limits.max_image_bytes;
        if let Err(e) = selection::validate(&candidate, max_bytes) {
            tracing::warn!(
                "Rejected {} ({}, {} bytes): {:?}",
                candidate.name,
                candidate.media_type,
                candidate.size(),
                e
            );
            self.emit(UiEvent::Notice(e.to_string())).await;
            return Err(e.into());
        }

        let ticket = self.session.issue_ticket();
        let image = Arc::new(candidate);
        tracing::info!(
            "Selected {} ({}, {} bytes)",
            image.name,
            image.media_type,
            image.size()
        );

        self.session.selected = Some(SelectedImage {
            image: image.clone(),
            ticket,
        });
        self.session.preview = PreviewState::Rendering;
        self.set_phase(Phase::Previewing).await;

        self.spawn_completion(async move {
            let info = selection::inspect_preview(&image);
            Completion::PreviewRendered { ticket, info }
        });

        Ok(())
    }

    pub async fn remove_image(&mut self) -> Result<(), ControllerError> {
        if !matches!(self.session.phase, Phase::Idle | Phase::Previewing) {
            return Err(self.invalid("remove image"));
        }

        self.session.selected = None;
        self.session.preview = PreviewState::Hidden;
        self.emit(UiEvent::PreviewCleared).await;
        self.set_phase(Phase::Idle).await;
        Ok(())
    }

    /// Every drag event on the drop target is consumed here; nothing falls
    /// through to default handling.
    pub async fn handle_drag(&mut self, event: DragEvent) -> Result<(), ControllerError> {
        match event {
            DragEvent::Enter | DragEvent::Over => {
                self.set_drop_highlight(true).await;
                Ok(())
            }
            DragEvent::Leave => {
                self.set_drop_highlight(false).await;
                Ok(())
            }
            DragEvent::Drop(items) => {
                self.set_drop_highlight(false).await;
                match items.into_iter().next() {
                    Some(first) => self.select_image(first).await,
                    None => {
                        tracing::debug!("Drop carried no files");
                        Ok(())
                    }
                }
            }
        }
    }

    async fn set_drop_highlight(&mut self, highlighted: bool) {
        if self.session.drop_highlight != highlighted {
            self.session.drop_highlight = highlighted;
            self.emit(UiEvent::DropHighlight(highlighted)).await;
        }
    }

    pub(crate) async fn on_preview_rendered(&mut self, ticket: Ticket, info: PreviewInfo) {
        let current = self.session.selected.as_ref().map(|s| s.ticket);
        if current != Some(ticket) {
            tracing::debug!("Discarding stale preview {:?}", ticket);
            return;
        }

        self.session.preview = PreviewState::Shown(info.clone());
        self.emit(UiEvent::PreviewShown(info)).await;
    }
}
