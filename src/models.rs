// Request and response bodies for the relay endpoints

use serde::{Deserialize, Serialize};

/// One turn of the conversation as the browser sends it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    /// Browsers may send `null` here; it counts as empty
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Some(content.into()),
        }
    }
}

// Fields are optional so that a missing field is answered with the
// endpoint's own 400 message instead of a generic body error.

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Body of `POST /api/upload`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(default)]
    pub filename: Option<String>,
    /// Base64-encoded file bytes
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Successful reply of `POST /api/upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_id: String,
    pub filename: String,
}
