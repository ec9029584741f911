//! Cosmetic progress indicator for an in-flight submission.
//!
//! The value is simulated from elapsed time only and says nothing about how far
//! the real request has got. It is capped below 100 until the backend answers.

use std::time::Duration;

use kanal::AsyncSender;
use snaptext_config::progress::ProgressConfig;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{Completion, ControllerEvent, Ticket};

pub const COMPLETE: u8 = 100;

#[derive(Debug, Clone)]
pub struct ProgressSimulator {
    value: u8,
    step: u8,
    cap: u8,
}

impl ProgressSimulator {
    pub fn new(step: u8, cap: u8) -> Self {
        Self {
            value: 0,
            step,
            cap: cap.min(COMPLETE - 1),
        }
    }

    pub fn from_config(config: &ProgressConfig) -> Self {
        Self::new(config.step, config.effective_cap())
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Move one step forward, never past the cap
    pub fn advance(&mut self) -> u8 {
        self.value = self.value.saturating_add(self.step).min(self.cap);
        self.value
    }
}

/// Status line keyed on the simulated value
pub fn status_text(percent: u8) -> &'static str {
    match percent {
        0..=30 => "Sending image...",
        31..=60 => "Extracting text with OCR...",
        61..=90 => "Querying the language API...",
        _ => "Finishing...",
    }
}

/// Start the recurring tick task for one submission.
///
/// The task only stops when `cancel` fires or the queue closes; the controller
/// must cancel it on every terminal transition.
pub fn spawn_progress_timer(
    ticket: Ticket,
    config: &ProgressConfig,
    cancel: CancellationToken,
    tx: AsyncSender<ControllerEvent>,
) -> JoinHandle<()> {
    let mut simulator = ProgressSimulator::from_config(config);
    let period = Duration::from_millis(config.tick_ms.max(1));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // First tick fires immediately
        interval.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    let before = simulator.value();
                    let percent = simulator.advance();
                    if percent == before {
                        continue;
                    }
                    let tick = Completion::ProgressTick { ticket, percent };
                    if tx.send(tick.into()).await.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("[PROGRESS] Timer for {:?} stopped", ticket);
    })
}
