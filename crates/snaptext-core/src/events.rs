use image::RgbaImage;
use snaptext_client::{ClientError, ProcessResponse};
use snaptext_types::{Command, PreviewInfo};

use crate::device::CaptureHandle;
use crate::error::{CameraError, ClipboardError};

/// Identifies the async operation a completion belongs to.
///
/// Tickets only ever increase within a session, so a completion whose ticket
/// no longer matches the session is stale and gets discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

/// Result of a suspended operation, posted back onto the controller queue
pub enum Completion {
    PreviewRendered {
        ticket: Ticket,
        info: PreviewInfo,
    },
    /// A granted stream arrives already wrapped, so dropping a stale grant stops it
    CameraAcquired {
        ticket: Ticket,
        result: Result<CaptureHandle, CameraError>,
    },
    FrameCaptured {
        ticket: Ticket,
        result: Result<RgbaImage, CameraError>,
    },
    ProgressTick {
        ticket: Ticket,
        percent: u8,
    },
    SubmissionFinished {
        ticket: Ticket,
        result: Result<ProcessResponse, ClientError>,
    },
    SettleElapsed {
        ticket: Ticket,
    },
    CopyFinished {
        ticket: Ticket,
        result: Result<(), ClipboardError>,
    },
    CopyFeedbackExpired {
        ticket: Ticket,
    },
}

impl Completion {
    pub fn name(&self) -> &'static str {
        match self {
            Completion::PreviewRendered { .. } => "PreviewRendered",
            Completion::CameraAcquired { .. } => "CameraAcquired",
            Completion::FrameCaptured { .. } => "FrameCaptured",
            Completion::ProgressTick { .. } => "ProgressTick",
            Completion::SubmissionFinished { .. } => "SubmissionFinished",
            Completion::SettleElapsed { .. } => "SettleElapsed",
            Completion::CopyFinished { .. } => "CopyFinished",
            Completion::CopyFeedbackExpired { .. } => "CopyFeedbackExpired",
        }
    }
}

/// Everything the controller consumes, in arrival order, from one queue
pub enum ControllerEvent {
    Command(Command),
    Completion(Completion),
}

impl From<Command> for ControllerEvent {
    fn from(command: Command) -> Self {
        ControllerEvent::Command(command)
    }
}

impl From<Completion> for ControllerEvent {
    fn from(completion: Completion) -> Self {
        ControllerEvent::Completion(completion)
    }
}
