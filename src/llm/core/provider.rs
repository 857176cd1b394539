//! Provider trait for completion API implementations

use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

use super::{
    error::LlmError,
    types::{FileObject, ResponseEvent, ResponseRequest},
};

/// Stream of incremental response events
pub type ResponseStream = Pin<Box<dyn Stream<Item = Result<ResponseEvent, LlmError>> + Send>>;

/// Main interface the relay uses to reach the completion API
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Stream a response for the given request
    ///
    /// Fails up front if the upstream rejects the request; failures after the
    /// stream has started are delivered as `Err` items and end the stream.
    async fn stream_response(&self, request: ResponseRequest) -> Result<ResponseStream, LlmError>;

    /// Upload a file for later use by the model
    async fn upload_file(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        purpose: &str,
    ) -> Result<FileObject, LlmError>;

    /// Fetch the provider's metadata object for a file, unmodified
    async fn retrieve_file(&self, file_id: &str) -> Result<serde_json::Value, LlmError>;
}
