// POST /api/chat handler

use bytes::Bytes;
use futures_util::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use warp::hyper::Body;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::llm::{CompletionProvider, ResponseEvent, ResponseRequest};
use crate::models::{ChatMessage, ChatRequest};
use crate::sse::{content_event, done_event, error_event};
use crate::state::{AppState, ChatSettings};

/// Message sent to the browser when the upstream fails
const CHAT_FAILED: &str = "Chat failed";

pub async fn chat_handler(
    user: AuthUser,
    request: ChatRequest,
    state: Arc<AppState>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let project_id = request.project_id.filter(|id| !id.is_empty());
    let (messages, project_id) = match (request.messages, project_id) {
        (Some(messages), Some(project_id)) => (messages, project_id),
        _ => {
            return Err(warp::reject::custom(ApiError::BadRequest(
                "Messages and projectId required".to_string(),
            )))
        }
    };

    tracing::info!(
        user_id = %user.id,
        project_id = %project_id,
        messages = messages.len(),
        "chat request"
    );

    let upstream_request = build_response_request(&messages, &state.chat);
    let event_stream = relay_stream(state.provider.clone(), upstream_request);

    let mut response = warp::reply::Response::new(Body::wrap_stream(event_stream));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    Ok(response)
}

/// Reduce the conversation to what the Responses API call takes
///
/// Instructions come from the first system message (the default replaces an
/// empty one), the input from the last user message. Earlier turns are not
/// forwarded.
pub fn build_response_request(messages: &[ChatMessage], settings: &ChatSettings) -> ResponseRequest {
    let instructions = messages
        .iter()
        .find(|m| m.role == "system")
        .and_then(|m| m.content.as_deref())
        .filter(|content| !content.is_empty())
        .unwrap_or(settings.default_system_prompt.as_str());

    let input = messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .and_then(|m| m.content.clone())
        .unwrap_or_default();

    ResponseRequest::new(input, settings.generation.clone()).with_instructions(instructions)
}

/// Forward upstream text deltas as encoded SSE frames
///
/// Ends with `[DONE]` on success. Any upstream failure, before or during the
/// stream, produces one error frame and ends the stream without `[DONE]`.
pub fn relay_stream(
    provider: Arc<dyn CompletionProvider>,
    request: ResponseRequest,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    async_stream::stream! {
        let mut upstream = match provider.stream_response(request).await {
            Ok(upstream) => upstream,
            Err(e) => {
                tracing::error!(error = %e, "chat upstream request failed");
                yield error_event(CHAT_FAILED);
                return;
            }
        };

        while let Some(item) = upstream.next().await {
            match item {
                Ok(ResponseEvent::TextDelta(text)) => {
                    if !text.is_empty() {
                        yield content_event(&text);
                    }
                }
                Ok(ResponseEvent::Completed { usage }) => {
                    if let Some(usage) = usage {
                        tracing::debug!(
                            input_tokens = usage.input_tokens,
                            output_tokens = usage.output_tokens,
                            "chat response completed"
                        );
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "chat upstream stream failed");
                    yield error_event(CHAT_FAILED);
                    return;
                }
            }
        }

        yield done_event();
    }
}
