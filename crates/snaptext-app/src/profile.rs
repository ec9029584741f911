use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use snaptext_config::Config;

const LOCAL_CONFIG_FILE: &str = "snaptext.json";

/// Values given on the command line; they win over file and environment
#[derive(Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub camera_source: Option<PathBuf>,
}

/// Load the config file if one is given or found, otherwise env-backed defaults
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => read_config_file(path),
        None => {
            let local = Path::new(LOCAL_CONFIG_FILE);
            if local.exists() {
                read_config_file(local)
            } else {
                tracing::info!("No config file found, using defaults");
                Ok(Config::new())
            }
        }
    }
}

fn read_config_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from {}", path.display());
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    Ok(config)
}

pub fn apply_overrides(config: &mut Config, overrides: &Overrides) {
    if let Some(base_url) = &overrides.base_url {
        config.network.base_url = base_url.clone();
    }
    if let Some(source) = &overrides.camera_source {
        config.camera.source = Some(source.display().to_string());
    }
}
