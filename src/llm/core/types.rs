//! Core types for the completion API layer

use serde::{Deserialize, Serialize};

use super::config::GenerationConfig;

/// Request to generate a single response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRequest {
    /// System-level instructions
    pub instructions: Option<String>,
    /// The user turn to answer
    pub input: String,
    /// Model and generation parameters
    pub config: GenerationConfig,
}

impl ResponseRequest {
    pub fn new(input: impl Into<String>, config: GenerationConfig) -> Self {
        Self {
            instructions: None,
            input: input.into(),
            config,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }
}

/// Events emitted during streaming generation
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEvent {
    /// Incremental output text
    TextDelta(String),
    /// Response complete
    Completed { usage: Option<UsageMetadata> },
}

/// Token usage information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl UsageMetadata {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

/// A file stored with the completion provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub created_at: i64,
    pub filename: String,
    #[serde(default)]
    pub purpose: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ResponseRequest::new("Hi", GenerationConfig::new("gpt-4o"))
            .with_instructions("Be brief.");
        assert_eq!(request.input, "Hi");
        assert_eq!(request.instructions.as_deref(), Some("Be brief."));
        assert_eq!(request.config.model, "gpt-4o");
    }

    #[test]
    fn test_usage_metadata_new() {
        let usage = UsageMetadata::new(100, 50);
        assert_eq!(usage.total_tokens, 150);
    }

    #[test]
    fn test_file_object_deserialization() {
        let json = r#"{
            "id": "file-abc123",
            "object": "file",
            "bytes": 120000,
            "created_at": 1677610602,
            "filename": "notes.pdf",
            "purpose": "assistants"
        }"#;
        let file: FileObject = serde_json::from_str(json).unwrap();
        assert_eq!(file.id, "file-abc123");
        assert_eq!(file.bytes, 120000);
        assert_eq!(file.filename, "notes.pdf");
        assert_eq!(file.purpose, "assistants");
    }
}
