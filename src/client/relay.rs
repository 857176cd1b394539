//! Client for the relay server's own `/api/chat` and `/api/upload` endpoints

use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::StreamExt;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use crate::models::{ChatMessage, ChatRequest, UploadRequest, UploadResponse};
use crate::sse::{SseFrame, SseParser, DONE_MARKER};

use super::baas::BaasClient;
use super::error::ClientError;

pub struct RelayClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl RelayClient {
    /// `access_token` is the signed-in user's session token
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    /// Send the conversation and feed each streamed chunk to `on_chunk`
    ///
    /// Returns once the relay sends `[DONE]` or closes the stream. An error
    /// frame from the relay becomes `ClientError::Relay`.
    pub async fn stream_chat<F>(
        &self,
        messages: &[ChatMessage],
        project_id: Uuid,
        mut on_chunk: F,
    ) -> Result<(), ClientError>
    where
        F: FnMut(&str),
    {
        let body = ChatRequest {
            messages: Some(messages.to_vec()),
            project_id: Some(project_id.to_string()),
        };

        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }

        let mut parser = SseParser::new();
        let mut bytes = response.bytes_stream();

        while let Some(chunk) = bytes.next().await {
            let frames = parser
                .push(&chunk?)
                .map_err(|e| ClientError::Stream(e.to_string()))?;
            for frame in frames {
                if dispatch_frame(&frame, &mut on_chunk)? {
                    return Ok(());
                }
            }
        }

        if let Some(frame) = parser
            .finish()
            .map_err(|e| ClientError::Stream(e.to_string()))?
        {
            dispatch_frame(&frame, &mut on_chunk)?;
        }

        Ok(())
    }

    /// Upload a file through the relay and record it against the project
    pub async fn upload(
        &self,
        baas: &BaasClient,
        project_id: Uuid,
        filename: &str,
        bytes: &[u8],
    ) -> Result<UploadResponse, ClientError> {
        let body = UploadRequest {
            filename: Some(filename.to_string()),
            content: Some(STANDARD.encode(bytes)),
            project_id: Some(project_id.to_string()),
        };

        let response = self
            .http
            .post(format!("{}/api/upload", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }

        let uploaded: UploadResponse = response.json().await?;
        baas.files()
            .record(project_id, filename, &uploaded.file_id)
            .await?;
        Ok(uploaded)
    }
}

/// Handle one frame; `Ok(true)` means the stream is finished
fn dispatch_frame<F>(frame: &SseFrame, on_chunk: &mut F) -> Result<bool, ClientError>
where
    F: FnMut(&str),
{
    if frame.data == DONE_MARKER {
        return Ok(true);
    }

    // Frames that are not JSON are skipped
    let payload: Value = match serde_json::from_str(&frame.data) {
        Ok(payload) => payload,
        Err(_) => return Ok(false),
    };

    if let Some(error) = payload.get("error").and_then(Value::as_str) {
        return Err(ClientError::Relay(error.to_string()));
    }
    if let Some(content) = payload.get("content").and_then(Value::as_str) {
        if !content.is_empty() {
            on_chunk(content);
        }
    }
    Ok(false)
}
