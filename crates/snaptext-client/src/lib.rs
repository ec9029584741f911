use std::sync::Arc;

use snaptext_types::ImageCandidate;

mod client;
mod error;
mod wire;


pub use client::HttpBackend;
pub use error::{ClientError, GENERIC_FAILURE};
pub use wire::{ProcessResponse, StatusResponse};

/// Remote processing service interface
#[async_trait::async_trait]
pub trait ProcessingBackend: Send + Sync {
    /// Upload one image and wait for the extraction result
    async fn process_image(&self, image: Arc<ImageCandidate>)
    -> Result<ProcessResponse, ClientError>;

    /// Readiness probe, used for diagnostics only
    async fn status(&self) -> Result<StatusResponse, ClientError>;
}
