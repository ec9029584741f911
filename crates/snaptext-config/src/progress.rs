use serde::{Deserialize, Serialize};

fn default_tick_ms() -> u64 {
    200
}

fn default_step() -> u8 {
    5
}

fn default_cap() -> u8 {
    95
}

fn default_settle_ms() -> u64 {
    500
}

/// Cosmetic progress indicator shown while a submission is in flight.
///
/// None of these values are derived from real network progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_step")]
    pub step: u8,
    /// Ceiling held until the backend answers
    #[serde(default = "default_cap")]
    pub cap: u8,
    /// Pause between the bar reaching 100 and the results appearing
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl ProgressConfig {
    /// Cap clamped so the simulated bar can never claim completion
    pub fn effective_cap(&self) -> u8 {
        self.cap.min(99)
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            step: default_step(),
            cap: default_cap(),
            settle_ms: default_settle_ms(),
        }
    }
}
