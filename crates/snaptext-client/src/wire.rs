use serde::{Deserialize, Serialize};

/// Body of a `200` answer from `/api/process-image`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResponse {
    #[serde(default)]
    pub success: Option<bool>,
    /// Plain extracted text
    #[serde(default)]
    pub text: Option<String>,
    /// Markup-bearing answer from the downstream language API
    #[serde(default)]
    pub maritaca_response: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ocr_engine: Option<String>,
    #[serde(default)]
    pub maritaca_api_configured: bool,
    #[serde(default)]
    pub version: Option<String>,
}
