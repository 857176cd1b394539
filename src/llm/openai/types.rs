//! OpenAI Responses API request and response types
//!
//! These types map directly to the `/v1/responses` wire schema. Only the
//! fields the relay reads are modelled; everything else is ignored.

use serde::{Deserialize, Serialize};

use crate::llm::core::config::{ReasoningEffort, Verbosity};

/// Body of `POST /responses`
#[derive(Debug, Clone, Serialize)]
pub struct CreateResponseRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningParam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextParam>,
    /// Always sent; empty means no hosted tools such as file search
    pub tools: Vec<serde_json::Value>,
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReasoningParam {
    pub effort: ReasoningEffort,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextParam {
    pub verbosity: Verbosity,
}

/// Streaming events, discriminated by their `type` field
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseStreamEvent {
    #[serde(rename = "response.output_text.delta")]
    OutputTextDelta { delta: String },

    #[serde(rename = "response.completed")]
    Completed { response: ResponseObject },

    #[serde(rename = "response.failed")]
    Failed { response: ResponseObject },

    #[serde(rename = "response.incomplete")]
    Incomplete { response: ResponseObject },

    #[serde(rename = "error")]
    Error {
        #[serde(default)]
        code: Option<String>,
        message: String,
    },

    /// Lifecycle and annotation events the relay does not forward
    #[serde(other)]
    Other,
}

/// A (possibly partial) response object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseObject {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<ResponseError>,
    #[serde(default)]
    pub incomplete_details: Option<IncompleteDetails>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
    #[serde(default)]
    pub usage: Option<ResponseUsage>,
}

impl ResponseObject {
    /// Concatenate every `output_text` part of every message item
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .flat_map(|item| item.content.iter())
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncompleteDetails {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Vec<OutputContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputContent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResponseUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ResponseError,
}
