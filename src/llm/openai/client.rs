//! OpenAI client implementation

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{multipart, Client, Response, StatusCode};
use std::time::Duration;

use crate::llm::core::{
    error::LlmError,
    provider::{CompletionProvider, ResponseStream},
    types::{FileObject, ResponseRequest},
};

use super::mapper::{failure_error, from_openai_event, to_openai_request};
use super::sse::parse_sse_stream;
use super::types::{ErrorEnvelope, ResponseObject};

/// Default public API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Masks an API key for logging: first 7 chars + "***" + last 4 chars.
/// Keys of 11 chars or fewer are fully hidden.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Client for the OpenAI Responses and Files APIs
#[derive(Clone)]
pub struct OpenAiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Secret API key, sent as a bearer token
    api_key: String,
    /// API root without trailing slash
    base_url: String,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        let api_key = api_key.into();
        let base_url = base_url.into().trim_end_matches('/').to_string();

        tracing::info!(
            base_url = %base_url,
            api_key = %mask_token(&api_key),
            "OpenAI client configured"
        );

        Ok(Self {
            http_client,
            api_key,
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Generate a full response without streaming and return its text
    pub async fn create_response(&self, request: ResponseRequest) -> Result<String, LlmError> {
        let body = to_openai_request(request, false);

        let response = self
            .http_client
            .post(self.endpoint("responses"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let object: ResponseObject = response.json().await?;
        match object.status.as_deref() {
            Some("failed") | Some("incomplete") => Err(failure_error(&object)),
            _ => Ok(object.output_text()),
        }
    }

    async fn make_streaming_request(
        &self,
        request: ResponseRequest,
    ) -> Result<ResponseStream, LlmError> {
        let body = to_openai_request(request, true);
        tracing::debug!(model = %body.model, "opening response stream");

        let response = self
            .http_client
            .post(self.endpoint("responses"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let sse_stream = parse_sse_stream(Box::pin(response.bytes_stream()));

        let event_stream = sse_stream.filter_map(|result| async move {
            match result {
                Ok(wire_event) => from_openai_event(wire_event),
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Box::pin(event_stream))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn stream_response(&self, request: ResponseRequest) -> Result<ResponseStream, LlmError> {
        self.make_streaming_request(request).await
    }

    async fn upload_file(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        purpose: &str,
    ) -> Result<FileObject, LlmError> {
        let size = bytes.len();
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new()
            .text("purpose", purpose.to_string())
            .part("file", part);

        let response = self
            .http_client
            .post(self.endpoint("files"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;

        let file: FileObject = response.json().await?;
        tracing::info!(file_id = %file.id, filename, size, "uploaded file");
        Ok(file)
    }

    async fn retrieve_file(&self, file_id: &str) -> Result<serde_json::Value, LlmError> {
        if file_id.is_empty() || file_id.contains('/') {
            return Err(LlmError::InvalidRequest(format!(
                "invalid file id '{}'",
                file_id
            )));
        }

        let response = self
            .http_client
            .get(self.endpoint(&format!("files/{}", file_id)))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(response.json().await?)
    }
}

/// Turn a non-2xx response into the matching `LlmError`
async fn check_status(response: Response) -> Result<Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs);

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.clone());

    Err(match status {
        StatusCode::UNAUTHORIZED => LlmError::AuthenticationError(message),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded { retry_after },
        _ => LlmError::HttpError {
            status: status.as_u16(),
            body,
        },
    })
}
