//! Completion API layer
//!
//! A small provider abstraction over the OpenAI Responses API, enough to
//! stream a single answer and to relay file uploads.

pub mod core;
pub mod openai;

// Re-export commonly used types
pub use self::core::{
    config::{GenerationConfig, ReasoningEffort, Verbosity},
    error::LlmError,
    provider::{CompletionProvider, ResponseStream},
    types::{FileObject, ResponseEvent, ResponseRequest, UsageMetadata},
};

pub use openai::OpenAiClient;
