use std::sync::Arc;

use snaptext_client::ProcessingBackend;
use tokio::task::JoinHandle;

/// Fire-and-forget readiness probe; only ever logs
pub fn spawn_health_check(backend: Arc<dyn ProcessingBackend>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match backend.status().await {
            Ok(status) => {
                tracing::info!(
                    "Backend status: {} (engine: {}, version: {})",
                    status.status.as_deref().unwrap_or("unknown"),
                    status.ocr_engine.as_deref().unwrap_or("unknown"),
                    status.version.as_deref().unwrap_or("unknown"),
                );
                if !status.maritaca_api_configured {
                    tracing::warn!("Language API is not configured on the backend");
                }
            }
            Err(e) => {
                tracing::error!("Failed to check backend status: {}", e);
            }
        }
    })
}
