//! Virtual camera backed by a still image on disk.
//!
//! Stands in for a video device on machines without one: every snapshot
//! returns the same decoded frame until the stream is stopped.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use image::RgbaImage;
use snaptext_core::{CameraDevice, CameraError, CaptureStream};

#[derive(Debug, Clone, Default)]
pub struct FileCamera {
    source: Option<PathBuf>,
}

impl FileCamera {
    pub fn new(source: Option<PathBuf>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl CameraDevice for FileCamera {
    async fn open(&self) -> Result<Arc<dyn CaptureStream>, CameraError> {
        let Some(path) = self.source.clone() else {
            return Err(CameraError::NoDevice);
        };

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CameraError::NoDevice);
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(CameraError::PermissionDenied);
            }
            Err(e) => return Err(CameraError::Capture(e.to_string())),
        };

        let frame = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|e| CameraError::Capture(e.to_string()))?
            .map_err(|e| CameraError::Capture(e.to_string()))?
            .to_rgba8();

        tracing::info!(
            "[CAMERA] Streaming {} ({}x{})",
            path.display(),
            frame.width(),
            frame.height()
        );
        Ok(Arc::new(FileStream {
            frame,
            stopped: AtomicBool::new(false),
        }))
    }
}

pub struct FileStream {
    frame: RgbaImage,
    stopped: AtomicBool,
}

impl FileStream {
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureStream for FileStream {
    async fn snapshot(&self) -> Result<RgbaImage, CameraError> {
        if self.is_stopped() {
            return Err(CameraError::Stopped);
        }
        Ok(self.frame.clone())
    }

    fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            tracing::debug!("[CAMERA] File stream stopped");
        }
    }
}
