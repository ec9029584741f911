use image::RgbaImage;
use snaptext_types::UiEvent;

use crate::controller::CaptureController;
use crate::device::CaptureHandle;
use crate::error::{CameraError, ControllerError};
use crate::events::{Completion, Ticket};
use crate::selection;
use crate::session::Phase;

impl CaptureController {
    /// Request a live stream; the camera view goes live once it is granted
    pub async fn open_camera(&mut self) -> Result<(), ControllerError> {
        if self.session.camera_pending.is_some() {
            return Err(ControllerError::CameraPending);
        }
        if !matches!(self.session.phase, Phase::Idle | Phase::Previewing) {
            return Err(self.invalid("open camera"));
        }

        let ticket = self.session.issue_ticket();
        self.session.camera_pending = Some(ticket);
        self.emit(UiEvent::CameraStarting).await;
        tracing::info!("[CAMERA] Requesting capture stream");

        let camera = self.devices.camera.clone();
        self.spawn_completion(async move {
            let result = camera.open().await.map(CaptureHandle::new);
            Completion::CameraAcquired { ticket, result }
        });

        Ok(())
    }

    pub(crate) async fn on_camera_acquired(
        &mut self,
        ticket: Ticket,
        result: Result<CaptureHandle, CameraError>,
    ) {
        let expected = self.session.camera_pending == Some(ticket)
            && matches!(self.session.phase, Phase::Idle | Phase::Previewing);

        if !expected {
            if let Ok(handle) = result {
                tracing::info!("[CAMERA] Releasing stream granted after the view closed");
                handle.release();
            }
            return;
        }
        self.session.camera_pending = None;

        match result {
            Ok(handle) => {
                tracing::info!("[CAMERA] Live");
                self.set_phase(Phase::CameraLive {
                    handle,
                    ticket,
                    capture_pending: false,
                })
                .await;
                self.emit(UiEvent::CameraLive).await;
            }
            Err(e) => {
                tracing::warn!("[CAMERA] Acquisition failed: {}", e);
                self.emit(UiEvent::Notice(format!("Could not access the camera: {e}")))
                    .await;
                self.emit(UiEvent::CameraClosed).await;
            }
        }
    }

    /// Snapshot the live frame; the view freezes once the frame arrives
    pub async fn capture_frame(&mut self) -> Result<(), ControllerError> {
        let (stream, ticket) = match &mut self.session.phase {
            Phase::CameraLive {
                capture_pending: true,
                ..
            } => {
                tracing::debug!("[CAMERA] Capture already in progress");
                return Ok(());
            }
            Phase::CameraLive {
                handle,
                ticket,
                capture_pending,
            } => {
                *capture_pending = true;
                (handle.stream(), *ticket)
            }
            _ => return Err(self.invalid("capture")),
        };

        self.spawn_completion(async move {
            let result = stream.snapshot().await;
            Completion::FrameCaptured { ticket, result }
        });

        Ok(())
    }

    pub(crate) async fn on_frame_captured(
        &mut self,
        ticket: Ticket,
        result: Result<RgbaImage, CameraError>,
    ) {
        match std::mem::replace(&mut self.session.phase, Phase::Idle) {
            Phase::CameraLive {
                handle,
                ticket: live,
                capture_pending: true,
            } if live == ticket => match result {
                Ok(still) => {
                    let (width, height) = still.dimensions();
                    self.set_phase(Phase::CameraFrozen {
                        handle,
                        ticket,
                        still,
                    })
                    .await;
                    self.emit(UiEvent::CameraStill { width, height }).await;
                }
                Err(e) => {
                    tracing::warn!("[CAMERA] Capture failed: {}", e);
                    self.session.phase = Phase::CameraLive {
                        handle,
                        ticket,
                        capture_pending: false,
                    };
                    self.emit(UiEvent::Notice(e.to_string())).await;
                }
            },
            other => {
                self.session.phase = other;
                tracing::debug!("[CAMERA] Discarding frame for closed view {:?}", ticket);
            }
        }
    }

    /// Discard the still and resume the live view
    pub async fn retake_photo(&mut self) -> Result<(), ControllerError> {
        match std::mem::replace(&mut self.session.phase, Phase::Idle) {
            Phase::CameraFrozen { handle, ticket, .. } => {
                self.set_phase(Phase::CameraLive {
                    handle,
                    ticket,
                    capture_pending: false,
                })
                .await;
                self.emit(UiEvent::CameraLive).await;
                Ok(())
            }
            other => {
                self.session.phase = other;
                Err(self.invalid("retake"))
            }
        }
    }

    /// Encode the still, close the camera, and feed the photo into selection
    pub async fn use_photo(&mut self) -> Result<(), ControllerError> {
        let upload = self.session.upload_phase();
        let (handle, still) = match std::mem::replace(&mut self.session.phase, upload) {
            Phase::CameraFrozen { handle, still, .. } => (handle, still),
            other => {
                self.session.phase = other;
                return Err(self.invalid("use photo"));
            }
        };

        let encoded = selection::encode_still(&still, self.config.camera.jpeg_quality);
        handle.release();
        self.emit(UiEvent::CameraClosed).await;
        self.emit(UiEvent::PhaseChanged(self.session.phase())).await;

        match encoded {
            Ok(photo) => self.select_image(photo).await,
            Err(e) => {
                tracing::error!("[CAMERA] {}", e);
                self.emit(UiEvent::Notice(e.to_string())).await;
                Ok(())
            }
        }
    }

    /// Close the camera view from any camera state, releasing the device
    pub async fn close_camera(&mut self) -> Result<(), ControllerError> {
        if self.session.camera_pending.take().is_some() {
            tracing::info!("[CAMERA] Closed before the stream was granted");
            self.emit(UiEvent::CameraClosed).await;
            return Ok(());
        }

        let upload = self.session.upload_phase();
        match std::mem::replace(&mut self.session.phase, upload) {
            Phase::CameraLive { handle, .. } | Phase::CameraFrozen { handle, .. } => {
                handle.release();
                tracing::info!("[CAMERA] Closed");
                self.emit(UiEvent::CameraClosed).await;
                self.emit(UiEvent::PhaseChanged(self.session.phase())).await;
                Ok(())
            }
            other => {
                self.session.phase = other;
                Err(self.invalid("close camera"))
            }
        }
    }
}
