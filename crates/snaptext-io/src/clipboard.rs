use arboard::Clipboard;
use async_trait::async_trait;
use snaptext_core::{ClipboardError, ClipboardWriter};

/// System clipboard; a fresh handle is opened for each write
#[derive(Debug, Default, Clone, Copy)]
pub struct ArboardClipboard;

#[async_trait]
impl ClipboardWriter for ArboardClipboard {
    async fn write_text(&self, text: String) -> Result<(), ClipboardError> {
        let written = tokio::task::spawn_blocking(move || {
            let mut clipboard =
                Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::Write(e.to_string()))
        })
        .await;

        match written {
            Ok(result) => result,
            Err(e) => Err(ClipboardError::Write(e.to_string())),
        }
    }
}
