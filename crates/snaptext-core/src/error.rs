use snaptext_types::WorkflowPhase;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Please select a valid image (JPG, PNG, GIF).")]
    UnsupportedType { media_type: String },

    #[error("The image is too large. The maximum size is {}MB.", .limit / (1024 * 1024))]
    TooLarge { size: u64, limit: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("Camera access is not supported in this environment")]
    Unsupported,

    #[error("No camera device found")]
    NoDevice,

    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("Camera stream already stopped")]
    Stopped,

    #[error("Failed to capture frame: {0}")]
    Capture(String),

    #[error("Failed to encode photo: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Clipboard write failed: {0}")]
    Write(String),
}

/// Reasons an operation is refused by the capture controller.
///
/// A refused operation never changes the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("{operation} is not valid while {phase:?}")]
    InvalidInPhase {
        operation: &'static str,
        phase: WorkflowPhase,
    },

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("No image selected")]
    NothingSelected,

    #[error("No results to copy")]
    NoResults,

    #[error("Camera is already being opened")]
    CameraPending,

    #[error(transparent)]
    Rejected(#[from] SelectionError),
}
