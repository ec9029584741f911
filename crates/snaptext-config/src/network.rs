use std::env;

use serde::{Deserialize, Serialize};

pub const BASE_URL_VAR: &str = "SNAPTEXT_BASE_URL";
pub const TIMEOUT_VAR: &str = "SNAPTEXT_TIMEOUT_SECONDS";

// Field defaults read the environment, also for fields missing from a partial section
fn default_base_url() -> String {
    env::var(BASE_URL_VAR).unwrap_or_else(|_| "http://localhost:5000".to_string())
}

fn default_timeout_seconds() -> u64 {
    env::var(TIMEOUT_VAR)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(60)
}

fn default_user_agent() -> String {
    concat!("snaptext/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Where the processing backend lives and how to talk to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout for image submission and status probe
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl NetworkConfig {
    pub fn new() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::new()
    }
}
