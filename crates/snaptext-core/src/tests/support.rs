use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use kanal::AsyncReceiver;
use snaptext_client::{ClientError, ProcessResponse, ProcessingBackend, StatusResponse};
use snaptext_config::Config;
use snaptext_types::{Command, ImageCandidate, UiEvent};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::controller::{CaptureController, Devices};
use crate::device::{CameraDevice, CaptureStream, ClipboardWriter};
use crate::error::{CameraError, ClipboardError, ControllerError};
use crate::events::ControllerEvent;
use crate::session::Session;

pub const MIB: usize = 1024 * 1024;

pub fn jpeg_candidate(size: usize) -> ImageCandidate {
    ImageCandidate::new("receipt.jpg", "image/jpeg", vec![0xAB; size])
}

pub fn png_candidate(size: usize) -> ImageCandidate {
    ImageCandidate::new("scan.png", "image/png", vec![0x42; size])
}

pub fn hello_response() -> ProcessResponse {
    ProcessResponse {
        success: Some(true),
        text: Some("Hello".to_string()),
        maritaca_response: Some("<b>Hi</b>".to_string()),
    }
}

pub enum Reply {
    Success(ProcessResponse),
    Failure { status: u16, message: String },
    /// Transport error before any HTTP status is seen
    Unreachable,
}

pub struct FakeBackend {
    reply: Mutex<Reply>,
    delay: Duration,
    calls: AtomicUsize,
    received: Mutex<Vec<Arc<ImageCandidate>>>,
}

impl FakeBackend {
    pub fn new(reply: Reply, delay: Duration) -> Self {
        Self {
            reply: Mutex::new(reply),
            delay,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<Arc<ImageCandidate>> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessingBackend for FakeBackend {
    async fn process_image(
        &self,
        image: Arc<ImageCandidate>,
    ) -> Result<ProcessResponse, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(image);
        tokio::time::sleep(self.delay).await;

        match &*self.reply.lock().unwrap() {
            Reply::Success(response) => Ok(response.clone()),
            Reply::Failure { status, message } => Err(ClientError::Backend {
                status: *status,
                message: message.clone(),
            }),
            Reply::Unreachable => {
                let err = reqwest::Client::new()
                    .get("not a url")
                    .build()
                    .unwrap_err();
                Err(ClientError::Network(err))
            }
        }
    }

    async fn status(&self) -> Result<StatusResponse, ClientError> {
        Ok(StatusResponse::default())
    }
}

pub struct FakeStream {
    frame: RgbaImage,
    stops: Arc<AtomicUsize>,
    snapshots: Arc<AtomicUsize>,
}

#[async_trait]
impl CaptureStream for FakeStream {
    async fn snapshot(&self) -> Result<RgbaImage, CameraError> {
        self.snapshots.fetch_add(1, Ordering::SeqCst);
        Ok(self.frame.clone())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FakeCamera {
    grant: bool,
    delay: Duration,
    pub opens: AtomicUsize,
    pub stops: Arc<AtomicUsize>,
    pub snapshots: Arc<AtomicUsize>,
}

impl FakeCamera {
    pub fn new(grant: bool, delay: Duration) -> Self {
        Self {
            grant,
            delay,
            opens: AtomicUsize::new(0),
            stops: Arc::new(AtomicUsize::new(0)),
            snapshots: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn snapshots(&self) -> usize {
        self.snapshots.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CameraDevice for FakeCamera {
    async fn open(&self) -> Result<Arc<dyn CaptureStream>, CameraError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        if !self.grant {
            return Err(CameraError::PermissionDenied);
        }
        Ok(Arc::new(FakeStream {
            frame: RgbaImage::from_pixel(64, 48, Rgba([90, 120, 150, 255])),
            stops: self.stops.clone(),
            snapshots: self.snapshots.clone(),
        }))
    }
}

pub struct FakeClipboard {
    fail: bool,
    written: Mutex<Vec<String>>,
}

impl FakeClipboard {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            written: Mutex::new(Vec::new()),
        }
    }

    pub fn written(&self) -> Vec<String> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClipboardWriter for FakeClipboard {
    async fn write_text(&self, text: String) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Write("denied".to_string()));
        }
        self.written.lock().unwrap().push(text);
        Ok(())
    }
}

/// A controller wired to fakes, driven one queued completion at a time
pub struct Harness {
    pub controller: CaptureController,
    pub queue: AsyncReceiver<ControllerEvent>,
    pub ui: AsyncReceiver<UiEvent>,
    pub backend: Arc<FakeBackend>,
    pub camera: Arc<FakeCamera>,
    pub clipboard: Arc<FakeClipboard>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(
            FakeBackend::new(Reply::Success(hello_response()), Duration::from_millis(1500)),
            FakeCamera::new(true, Duration::from_millis(100)),
            FakeClipboard::new(false),
        )
    }

    pub fn with(backend: FakeBackend, camera: FakeCamera, clipboard: FakeClipboard) -> Self {
        let backend = Arc::new(backend);
        let camera = Arc::new(camera);
        let clipboard = Arc::new(clipboard);
        let devices = Devices {
            backend: backend.clone(),
            camera: camera.clone(),
            clipboard: clipboard.clone(),
        };

        let (queue_tx, queue) = kanal::unbounded_async();
        let (ui_tx, ui) = kanal::unbounded_async();
        let controller = CaptureController::new(
            Config::default(),
            devices,
            queue_tx,
            ui_tx,
            CancellationToken::new(),
        );

        Self {
            controller,
            queue,
            ui,
            backend,
            camera,
            clipboard,
        }
    }

    pub fn session(&self) -> &Session {
        self.controller.session()
    }

    pub async fn command(&mut self, command: Command) -> Result<(), ControllerError> {
        self.controller.handle(command.into()).await
    }

    /// Wait for the next queued completion and handle it
    pub async fn step(&mut self) -> &'static str {
        let event = match timeout(Duration::from_secs(120), self.queue.recv()).await {
            Ok(Ok(event)) => event,
            Ok(Err(e)) => panic!("Queue error: {}", e),
            Err(_) => panic!("Timeout - no completion arrived"),
        };
        let name = match &event {
            ControllerEvent::Completion(completion) => completion.name(),
            ControllerEvent::Command(_) => "Command",
        };

        self.controller.handle(event).await.unwrap();
        name
    }

    pub async fn pump_until(&mut self, done: impl Fn(&Session) -> bool) {
        for _ in 0..1000 {
            if done(self.session()) {
                return;
            }
            self.step().await;
        }
        panic!("Session never reached the expected state");
    }

    /// Everything emitted to the front end since the last drain
    pub fn drain_ui(&self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.ui.try_recv() {
            events.push(event);
        }
        events
    }
}
