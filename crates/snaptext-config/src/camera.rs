use std::env;

use serde::{Deserialize, Serialize};

pub const SOURCE_VAR: &str = "SNAPTEXT_CAMERA_SOURCE";

fn default_source() -> Option<String> {
    env::var(SOURCE_VAR).ok().filter(|s| !s.trim().is_empty())
}

fn default_jpeg_quality() -> u8 {
    95
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Image file backing the virtual camera; no camera is available when unset
    #[serde(default = "default_source")]
    pub source: Option<String>,
    /// Quality used when encoding a captured still
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl CameraConfig {
    pub fn new() -> Self {
        Self {
            source: default_source(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::new()
    }
}
