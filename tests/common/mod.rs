//! Shared test doubles for the relay's two external seams
#![allow(dead_code)]

use async_trait::async_trait;
use chat_relay::auth::{AuthError, AuthUser, IdentityVerifier};
use chat_relay::llm::{
    CompletionProvider, FileObject, GenerationConfig, LlmError, ResponseEvent, ResponseRequest,
    ResponseStream,
};
use chat_relay::sse::SseParser;
use chat_relay::state::{AppState, ChatSettings};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const VALID_TOKEN: &str = "valid-token";

pub fn test_user() -> AuthUser {
    AuthUser {
        id: Uuid::parse_str("8d0fd2b3-9ca7-4d9e-a95f-9e13a2d7c1a1").unwrap(),
        email: Some("tester@example.com".to_string()),
    }
}

/// Accepts exactly `VALID_TOKEN`
pub struct StubVerifier;

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        if token == VALID_TOKEN {
            Ok(test_user())
        } else {
            Err(AuthError::Rejected { status: 401 })
        }
    }
}

/// One scripted upstream stream item
#[derive(Debug, Clone)]
pub enum Step {
    Text(&'static str),
    Fail(&'static str),
}

/// Scripted completion provider that records what it was asked
#[derive(Default)]
pub struct StubProvider {
    pub steps: Vec<Step>,
    pub fail_upfront: bool,
    pub fail_files: bool,
    pub requests: Mutex<Vec<ResponseRequest>>,
    pub uploads: Mutex<Vec<(String, Vec<u8>, String)>>,
}

impl StubProvider {
    pub fn streaming(steps: Vec<Step>) -> Self {
        Self {
            steps,
            ..Default::default()
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn stream_response(&self, request: ResponseRequest) -> Result<ResponseStream, LlmError> {
        self.requests.lock().unwrap().push(request);

        if self.fail_upfront {
            return Err(LlmError::HttpError {
                status: 500,
                body: "upstream down".to_string(),
            });
        }

        let mut items = Vec::new();
        let mut failed = false;
        for step in &self.steps {
            match step {
                Step::Text(text) => items.push(Ok(ResponseEvent::TextDelta(text.to_string()))),
                Step::Fail(message) => {
                    items.push(Err(LlmError::ProviderError {
                        code: "server_error".to_string(),
                        message: message.to_string(),
                    }));
                    failed = true;
                    break;
                }
            }
        }
        if !failed {
            items.push(Ok(ResponseEvent::Completed { usage: None }));
        }

        Ok(Box::pin(futures::stream::iter(items)))
    }

    async fn upload_file(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        purpose: &str,
    ) -> Result<FileObject, LlmError> {
        if self.fail_files {
            return Err(LlmError::HttpError {
                status: 500,
                body: "upstream down".to_string(),
            });
        }
        let size = bytes.len() as u64;
        self.uploads
            .lock()
            .unwrap()
            .push((filename.to_string(), bytes, purpose.to_string()));
        Ok(FileObject {
            id: "file-stub-1".to_string(),
            bytes: size,
            created_at: 1_700_000_000,
            filename: filename.to_string(),
            purpose: purpose.to_string(),
        })
    }

    async fn retrieve_file(&self, file_id: &str) -> Result<serde_json::Value, LlmError> {
        if self.fail_files {
            return Err(LlmError::HttpError {
                status: 404,
                body: "No such File object".to_string(),
            });
        }
        Ok(serde_json::json!({
            "id": file_id,
            "object": "file",
            "bytes": 11,
            "filename": "notes.txt",
            "purpose": "assistants"
        }))
    }
}

pub fn test_state(provider: Arc<StubProvider>, public_dir: PathBuf) -> Arc<AppState> {
    Arc::new(AppState {
        verifier: Arc::new(StubVerifier),
        provider,
        chat: ChatSettings {
            generation: GenerationConfig::default(),
            default_system_prompt: "You are a helpful assistant.".to_string(),
        },
        public_dir,
    })
}

/// Decode an SSE body into its data payloads
pub fn sse_data(body: &[u8]) -> Vec<String> {
    let mut parser = SseParser::new();
    let mut data: Vec<String> = parser
        .push(body)
        .unwrap()
        .into_iter()
        .map(|frame| frame.data)
        .collect();
    if let Some(frame) = parser.finish().unwrap() {
        data.push(frame.data);
    }
    data
}
