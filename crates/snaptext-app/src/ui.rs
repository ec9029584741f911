use std::sync::Arc;

use crossterm::style::Stylize;
use kanal::AsyncReceiver;
use snaptext_types::{PreviewInfo, ResultTab, StyledSpan, UiEvent, WorkflowPhase};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// What the terminal currently shows, rebuilt from controller updates
#[derive(Debug, Clone)]
pub struct ViewState {
    pub phase: WorkflowPhase,
    pub preview: Option<PreviewInfo>,
    pub camera_open: bool,
    pub progress: u8,
    pub status: String,
    pub recovery_offered: bool,
    pub extracted_text: Option<String>,
    pub api_markup: Vec<StyledSpan>,
    pub active_tab: ResultTab,
    pub copy_confirmed: bool,
    pub drop_highlight: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            phase: WorkflowPhase::Idle,
            preview: None,
            camera_open: false,
            progress: 0,
            status: String::new(),
            recovery_offered: false,
            extracted_text: None,
            api_markup: Vec::new(),
            active_tab: ResultTab::default(),
            copy_confirmed: false,
            drop_highlight: false,
        }
    }
}

impl ViewState {
    pub fn apply(&mut self, event: &UiEvent) {
        match event {
            UiEvent::PhaseChanged(phase) => {
                self.phase = *phase;
                if matches!(phase, WorkflowPhase::Idle | WorkflowPhase::Previewing) {
                    self.recovery_offered = false;
                }
                if *phase == WorkflowPhase::Submitting {
                    self.extracted_text = None;
                    self.api_markup.clear();
                }
            }
            UiEvent::PreviewShown(info) => self.preview = Some(info.clone()),
            UiEvent::PreviewCleared => {
                self.preview = None;
                self.extracted_text = None;
                self.api_markup.clear();
            }
            UiEvent::DropHighlight(on) => self.drop_highlight = *on,
            UiEvent::CameraStarting | UiEvent::Notice(_) | UiEvent::CameraStill { .. } => {}
            UiEvent::CameraLive => self.camera_open = true,
            UiEvent::CameraClosed => self.camera_open = false,
            UiEvent::Progress { percent, status } => {
                self.progress = *percent;
                self.status = status.clone();
            }
            UiEvent::RecoveryOffered => self.recovery_offered = true,
            UiEvent::ResultsShown { text, markup } => {
                self.extracted_text = Some(text.clone());
                self.api_markup = markup.clone();
            }
            UiEvent::TabChanged(tab) => self.active_tab = *tab,
            UiEvent::CopyFeedback { confirmed } => self.copy_confirmed = *confirmed,
        }
    }

    /// Multi-line report printed by the `status` command
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("phase: {:?}", self.phase)];

        if let Some(preview) = &self.preview {
            lines.push(format!("image: {}", describe_preview(preview)));
        }
        if self.camera_open {
            lines.push("camera: open".to_string());
        }
        if self.phase == WorkflowPhase::Submitting || self.recovery_offered {
            lines.push(format!("progress: {}% {}", self.progress, self.status));
        }
        if self.recovery_offered {
            lines.push("type `back` to return to the upload view".to_string());
        }
        if self.extracted_text.is_some() {
            lines.push(format!("tab: {}", self.active_tab.label()));
        }

        lines.join("\n")
    }
}

pub fn describe_preview(info: &PreviewInfo) -> String {
    let kib = info.size as f64 / 1024.0;
    match info.dimensions {
        Some((w, h)) => format!("{} ({}, {w}x{h}, {kib:.1} KiB)", info.name, info.media_type),
        None => format!("{} ({}, {kib:.1} KiB, no preview)", info.name, info.media_type),
    }
}

/// Terminal rendering of the language API answer
pub fn render_spans(spans: &[StyledSpan]) -> String {
    spans
        .iter()
        .map(|span| {
            let mut styled = span.text.clone().stylize();
            if span.style.bold {
                styled = styled.bold();
            }
            if span.style.italic {
                styled = styled.italic();
            }
            if span.style.underline {
                styled = styled.underlined();
            }
            if span.style.code {
                styled = styled.cyan();
            }
            styled.to_string()
        })
        .collect()
}

fn render(event: &UiEvent, view: &ViewState) -> Option<String> {
    let line = match event {
        UiEvent::Notice(message) => format!("{} {}", "!".yellow().bold(), message),
        UiEvent::PreviewShown(info) => format!("Selected {}", describe_preview(info)),
        UiEvent::PreviewCleared => "Image removed".to_string(),
        UiEvent::CameraStarting => "Opening camera...".to_string(),
        UiEvent::CameraLive => "Camera live. `capture` to take a photo, `close` to cancel".to_string(),
        UiEvent::CameraStill { width, height } => {
            format!("Captured {width}x{height} still. `use` it or `retake`")
        }
        UiEvent::CameraClosed => "Camera closed".to_string(),
        UiEvent::Progress { percent, status } if !status.is_empty() => {
            format!("[{percent:>3}%] {status}")
        }
        UiEvent::RecoveryOffered => "Type `back` to try again".to_string(),
        UiEvent::ResultsShown { .. } => render_results(view),
        UiEvent::TabChanged(_) => render_results(view),
        UiEvent::CopyFeedback { confirmed: true } => {
            snaptext_core::controller::COPY_CONFIRMATION.green().to_string()
        }
        _ => return None,
    };
    Some(line)
}

fn render_results(view: &ViewState) -> String {
    let body = match view.active_tab {
        ResultTab::ExtractedText => view.extracted_text.clone().unwrap_or_default(),
        ResultTab::ApiResponse => render_spans(&view.api_markup),
    };
    format!("{}\n{}", format!("== {} ==", view.active_tab.label()).bold(), body)
}

/// Applies controller updates to the shared view and prints them
pub async fn ui_loop(
    updates: AsyncReceiver<UiEvent>,
    view: Arc<RwLock<ViewState>>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = updates.recv() => match event {
                Ok(event) => event,
                Err(_) => break,
            },
        };

        let mut view = view.write().await;
        view.apply(&event);
        if let Some(line) = render(&event, &view) {
            println!("{line}");
        }
    }

    tracing::debug!("UI loop stopped");
    Ok(())
}
