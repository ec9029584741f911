use image::RgbaImage;
use snaptext_client::ProcessResponse;
use snaptext_types::{PreviewInfo, ResultTab, WorkflowPhase};

use crate::device::CaptureHandle;
use crate::events::Ticket;
use crate::markup::{self, RenderedMarkup};
use crate::selection::SelectedImage;

pub const NO_TEXT_FALLBACK: &str = "No text detected in the image.";
pub const NO_API_FALLBACK: &str = "No response from the language API.";

/// Composite workflow state.
///
/// Camera handles live inside the camera variants, so a handle cannot exist
/// outside `CameraLive`/`CameraFrozen`.
#[derive(Debug)]
pub enum Phase {
    Idle,
    Previewing,
    CameraLive {
        handle: CaptureHandle,
        ticket: Ticket,
        capture_pending: bool,
    },
    CameraFrozen {
        handle: CaptureHandle,
        ticket: Ticket,
        still: RgbaImage,
    },
    Submitting {
        ticket: Ticket,
        /// Set once the backend answered successfully and the settle delay runs
        outcome: Option<ProcessResponse>,
    },
    ResultReady,
    Failed {
        message: String,
    },
}

impl Phase {
    pub fn kind(&self) -> WorkflowPhase {
        match self {
            Phase::Idle => WorkflowPhase::Idle,
            Phase::Previewing => WorkflowPhase::Previewing,
            Phase::CameraLive { .. } => WorkflowPhase::CameraLive,
            Phase::CameraFrozen { .. } => WorkflowPhase::CameraFrozen,
            Phase::Submitting { .. } => WorkflowPhase::Submitting,
            Phase::ResultReady => WorkflowPhase::ResultReady,
            Phase::Failed { .. } => WorkflowPhase::Failed,
        }
    }

    pub fn has_capture_handle(&self) -> bool {
        matches!(self, Phase::CameraLive { .. } | Phase::CameraFrozen { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    Hidden,
    Rendering,
    Shown(PreviewInfo),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressDisplay {
    pub percent: u8,
    pub status: String,
}

/// The two result surfaces shown after a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPanes {
    pub extracted_text: String,
    pub api_markup: String,
    pub api_rendered: RenderedMarkup,
}

impl ResultPanes {
    pub fn from_response(response: ProcessResponse) -> Self {
        let extracted_text = response
            .text
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_TEXT_FALLBACK.to_string());
        let api_markup = response
            .maritaca_response
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_API_FALLBACK.to_string());
        let api_rendered = markup::render(&api_markup);

        Self {
            extracted_text,
            api_markup,
            api_rendered,
        }
    }

    /// Plain text of a tab, as copied to the clipboard
    pub fn plain_text(&self, tab: ResultTab) -> String {
        match tab {
            ResultTab::ExtractedText => self.extracted_text.clone(),
            ResultTab::ApiResponse => self.api_rendered.plain_text(),
        }
    }
}

/// The single live workflow instance
#[derive(Debug)]
pub struct Session {
    pub(crate) phase: Phase,
    pub(crate) selected: Option<SelectedImage>,
    pub(crate) preview: PreviewState,
    pub(crate) active_tab: ResultTab,
    pub(crate) results: Option<ResultPanes>,
    pub(crate) progress: ProgressDisplay,
    pub(crate) recovery_offered: bool,
    pub(crate) drop_highlight: bool,
    pub(crate) copy_confirmed: bool,
    /// Camera acquisition requested but not yet granted or denied
    pub(crate) camera_pending: Option<Ticket>,
    pub(crate) last_copy: Option<Ticket>,
    next_ticket: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            selected: None,
            preview: PreviewState::Hidden,
            active_tab: ResultTab::default(),
            results: None,
            progress: ProgressDisplay::default(),
            recovery_offered: false,
            drop_highlight: false,
            copy_confirmed: false,
            camera_pending: None,
            last_copy: None,
            next_ticket: 0,
        }
    }

    pub(crate) fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase.kind()
    }

    pub fn selected_image(&self) -> Option<&snaptext_types::ImageCandidate> {
        self.selected.as_ref().map(|s| s.image.as_ref())
    }

    pub fn preview(&self) -> &PreviewState {
        &self.preview
    }

    pub fn active_tab(&self) -> ResultTab {
        self.active_tab
    }

    pub fn results(&self) -> Option<&ResultPanes> {
        self.results.as_ref()
    }

    pub fn progress(&self) -> &ProgressDisplay {
        &self.progress
    }

    pub fn recovery_offered(&self) -> bool {
        self.recovery_offered
    }

    pub fn drop_highlighted(&self) -> bool {
        self.drop_highlight
    }

    pub fn copy_confirmed(&self) -> bool {
        self.copy_confirmed
    }

    pub fn has_capture_handle(&self) -> bool {
        self.phase.has_capture_handle()
    }

    pub fn camera_pending(&self) -> bool {
        self.camera_pending.is_some()
    }

    pub fn submission_in_flight(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    pub fn failure_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Where a closed camera view returns to
    pub(crate) fn upload_phase(&self) -> Phase {
        if self.selected.is_some() {
            Phase::Previewing
        } else {
            Phase::Idle
        }
    }

    /// Phase-level invariants; checked after every handled event in debug builds
    pub fn invariants_hold(&self) -> bool {
        let needs_image = matches!(
            self.phase.kind(),
            WorkflowPhase::Previewing | WorkflowPhase::Submitting | WorkflowPhase::ResultReady
        );
        let camera_consistent = !(self.camera_pending.is_some() && self.phase.has_capture_handle());

        (!needs_image || self.selected.is_some()) && camera_consistent
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
