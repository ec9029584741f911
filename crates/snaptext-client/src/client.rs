use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use snaptext_types::ImageCandidate;

use crate::error::{ClientError, GENERIC_FAILURE};
use crate::wire::{ErrorBody, ProcessResponse, StatusResponse};
use crate::ProcessingBackend;

/// HTTP client for the image processing backend
#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: String, timeout: Duration, user_agent: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ProcessingBackend for HttpBackend {
    async fn process_image(
        &self,
        image: Arc<ImageCandidate>,
    ) -> Result<ProcessResponse, ClientError> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.name.clone())
            .mime_str(&image.media_type)?;
        let form = Form::new().part("file", part);

        tracing::info!(
            "Submitting {} ({} bytes) for processing",
            image.name,
            image.size()
        );

        let response = self
            .client
            .post(self.endpoint("/api/process-image"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());

            tracing::warn!("Processing failed with HTTP {}: {}", status, message);
            return Err(ClientError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<ProcessResponse>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn status(&self) -> Result<StatusResponse, ClientError> {
        let response = self
            .client
            .get(self.endpoint("/api/status"))
            .send()
            .await?
            .error_for_status()?;

        response
            .json::<StatusResponse>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}
