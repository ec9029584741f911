/// Shown when a failed response carries no usable message
pub const GENERIC_FAILURE: &str = "Image processing failed";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Text suitable for the status line of the processing view
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Backend { message, .. } => message.clone(),
            ClientError::Network(e) if e.is_timeout() => {
                "The processing service did not answer in time".to_string()
            }
            ClientError::Network(_) => "Could not reach the processing service".to_string(),
            ClientError::Decode(_) => GENERIC_FAILURE.to_string(),
        }
    }
}
