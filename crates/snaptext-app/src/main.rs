use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use snaptext_client::HttpBackend;
use snaptext_config::Config;
use snaptext_core::Devices;
use snaptext_io::{ArboardClipboard, FileCamera};
use tracing_subscriber::EnvFilter;

use self::controller::AppController;
use self::profile::Overrides;

mod controller;
mod events;
mod profile;
mod terminal;
mod ui;


/// Pick or photograph an image and extract its text
#[derive(Parser, Debug)]
#[command(name = "snaptext", version, about)]
struct Args {
    /// JSON config file; `snaptext.json` in the working directory is used when present
    #[arg(long)]
    config: Option<PathBuf>,
    /// Processing backend base URL
    #[arg(long)]
    base_url: Option<String>,
    /// Image file served by the virtual camera
    #[arg(long)]
    camera_source: Option<PathBuf>,
    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(args.log_json);

    let mut config = profile::load_config(args.config.as_deref())?;
    profile::apply_overrides(
        &mut config,
        &Overrides {
            base_url: args.base_url,
            camera_source: args.camera_source,
        },
    );

    let devices = build_devices(&config)?;
    let app = AppController::new(config, devices);
    let mut tasks = app.spawn_tasks();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("Task finished, shutting down"),
                Ok(Err(e)) => tracing::error!("Task failed: {e}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    app.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::warn!("Task exited with error during shutdown: {e}");
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout belongs to the terminal front end
fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_devices(config: &Config) -> anyhow::Result<Devices> {
    let backend = HttpBackend::new(
        config.network.base_url.clone(),
        Duration::from_secs(config.network.timeout_seconds),
        &config.network.user_agent,
    )?;
    tracing::info!("Processing backend: {}", backend.base_url());
    let camera = FileCamera::new(config.camera.source.as_ref().map(PathBuf::from));

    Ok(Devices {
        backend: Arc::new(backend),
        camera: Arc::new(camera),
        clipboard: Arc::new(ArboardClipboard),
    })
}
