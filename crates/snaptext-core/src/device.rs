use std::sync::Arc;

use async_trait::async_trait;
use image::RgbaImage;

use crate::error::{CameraError, ClipboardError};

/// Source of live video capture streams
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Request a live stream. May fail when no device exists or access is denied.
    async fn open(&self) -> Result<Arc<dyn CaptureStream>, CameraError>;
}

/// A live video capture resource
#[async_trait]
pub trait CaptureStream: Send + Sync {
    /// Copy the frame currently shown by the live view
    async fn snapshot(&self) -> Result<RgbaImage, CameraError>;

    /// Stop every constituent track and free the device
    fn stop(&self);
}

#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    async fn write_text(&self, text: String) -> Result<(), ClipboardError>;
}

/// RAII owner of a granted capture stream
///
/// The stream is stopped exactly once: either by `release` or, failing that,
/// when the handle is dropped.
pub struct CaptureHandle {
    stream: Arc<dyn CaptureStream>,
    released: bool,
}

impl CaptureHandle {
    pub fn new(stream: Arc<dyn CaptureStream>) -> Self {
        Self {
            stream,
            released: false,
        }
    }

    /// Shared reference for an in-flight snapshot; does not extend ownership
    pub fn stream(&self) -> Arc<dyn CaptureStream> {
        self.stream.clone()
    }

    pub fn release(mut self) {
        self.stop_once();
    }

    fn stop_once(&mut self) {
        if !self.released {
            self.released = true;
            self.stream.stop();
            tracing::debug!("[CAMERA] Capture handle released");
        }
    }
}

impl Drop for CaptureHandle {
    fn drop(&mut self) {
        self.stop_once();
    }
}

impl std::fmt::Debug for CaptureHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureHandle")
            .field("released", &self.released)
            .finish()
    }
}
