use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use snaptext_config::Config;
use snaptext_core::{ControllerEvent, Devices};
use snaptext_types::UiEvent;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::terminal::{input_loop, spawn_stdin_reader};
use crate::ui::{ViewState, ui_loop};

/// Centralized channel management
pub struct ChannelSet {
    pub to_controller: (AsyncSender<ControllerEvent>, AsyncReceiver<ControllerEvent>),
    pub to_ui: (AsyncSender<UiEvent>, AsyncReceiver<UiEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            to_controller: kanal::bounded_async(64), // commands and completions
            to_ui: kanal::bounded_async(256),        // progress bursts
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    config: Config,
    devices: Devices,
    view: Arc<RwLock<ViewState>>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(config: Config, devices: Devices) -> Self {
        Self {
            channels: ChannelSet::new(),
            config,
            devices,
            view: Arc::new(RwLock::new(ViewState::default())),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Capture controller
        tasks.spawn(event_loop(
            self.config.clone(),
            self.devices.clone(),
            self.channels.to_controller.clone(),
            self.channels.to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        // Renderer
        tasks.spawn(ui_loop(
            self.channels.to_ui.1.clone(),
            self.view.clone(),
            self.cancel_token.child_token(),
        ));

        // Terminal input
        tasks.spawn(input_loop(
            spawn_stdin_reader(),
            self.channels.to_controller.0.clone(),
            self.view.clone(),
            self.config.limits.max_image_bytes,
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
