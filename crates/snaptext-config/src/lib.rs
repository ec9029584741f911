use serde::{Deserialize, Serialize};

use self::camera::CameraConfig;
use self::limits::LimitsConfig;
use self::network::NetworkConfig;
use self::progress::ProgressConfig;
use self::ui::UiConfig;

pub mod camera;
pub mod limits;
pub mod network;
pub mod progress;
pub mod ui;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub limits: LimitsConfig,
    pub progress: ProgressConfig,
    pub ui: UiConfig,
    pub camera: CameraConfig,
}

impl Config {
    pub fn new() -> Self {
        Config {
            network: NetworkConfig::new(),
            limits: LimitsConfig::default(),
            progress: ProgressConfig::default(),
            ui: UiConfig::default(),
            camera: CameraConfig::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
