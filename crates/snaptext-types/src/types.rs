/// A file-like image input: what the user picked, dropped, or the camera produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub name: String,
    /// Declared media type, e.g. `image/png`
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageCandidate {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Byte length of the payload
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Result surface currently shown and targeted by "copy"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultTab {
    #[default]
    ExtractedText,
    ApiResponse,
}

impl ResultTab {
    pub fn label(self) -> &'static str {
        match self {
            ResultTab::ExtractedText => "extracted-text",
            ResultTab::ApiResponse => "api-response",
        }
    }
}

/// Top-level state of the capture/submit/result workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    Idle,
    Previewing,
    CameraLive,
    CameraFrozen,
    Submitting,
    ResultReady,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop(Vec<ImageCandidate>),
}

/// User gestures forwarded from the front end to the capture controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectImage(ImageCandidate),
    RemoveImage,
    Drag(DragEvent),
    OpenCamera,
    CaptureFrame,
    RetakePhoto,
    UsePhoto,
    CloseCamera,
    Submit,
    Recover,
    SwitchTab(ResultTab),
    CopyActiveTab,
    ResetSession,
    Shutdown,
}

impl Command {
    /// Stable variant name for logs; payloads stay out of the output
    pub fn name(&self) -> &'static str {
        match self {
            Command::SelectImage(_) => "select-image",
            Command::RemoveImage => "remove-image",
            Command::Drag(DragEvent::Enter) => "drag-enter",
            Command::Drag(DragEvent::Over) => "drag-over",
            Command::Drag(DragEvent::Leave) => "drag-leave",
            Command::Drag(DragEvent::Drop(_)) => "drag-drop",
            Command::OpenCamera => "open-camera",
            Command::CaptureFrame => "capture-frame",
            Command::RetakePhoto => "retake-photo",
            Command::UsePhoto => "use-photo",
            Command::CloseCamera => "close-camera",
            Command::Submit => "submit",
            Command::Recover => "recover",
            Command::SwitchTab(_) => "switch-tab",
            Command::CopyActiveTab => "copy-active-tab",
            Command::ResetSession => "reset-session",
            Command::Shutdown => "shutdown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub code: bool,
}

/// A run of text sharing one style, produced by rendering markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewInfo {
    pub name: String,
    pub media_type: String,
    pub size: u64,
    /// `None` when the payload could not be decoded for display
    pub dimensions: Option<(u32, u32)>,
}

/// View updates emitted by the controller for the front end to render
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    PhaseChanged(WorkflowPhase),
    /// Blocking user notice
    Notice(String),
    PreviewShown(PreviewInfo),
    PreviewCleared,
    DropHighlight(bool),
    CameraStarting,
    CameraLive,
    CameraStill { width: u32, height: u32 },
    CameraClosed,
    Progress { percent: u8, status: String },
    RecoveryOffered,
    ResultsShown {
        text: String,
        markup: Vec<StyledSpan>,
    },
    TabChanged(ResultTab),
    CopyFeedback { confirmed: bool },
}
