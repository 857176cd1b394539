//! Server-Sent Events (SSE) decoding for Responses API streams

use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use crate::llm::core::error::LlmError;
use crate::sse::{SseFrame, SseParser, DONE_MARKER};

use super::types::ResponseStreamEvent;

/// Parse a stream of bytes as Responses API events
///
/// The Responses API sends one JSON object per block:
/// ```text
/// event: response.output_text.delta
/// data: {"type":"response.output_text.delta","delta":"Hel",...}
///
/// ```
/// The `type` inside the JSON is authoritative; the `event:` line is only
/// used for error messages.
pub fn parse_sse_stream(
    mut byte_stream: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
) -> Pin<Box<dyn Stream<Item = Result<ResponseStreamEvent, LlmError>> + Send>> {
    let event_stream = async_stream::stream! {
        let mut parser = SseParser::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(bytes) => bytes,
                Err(e) => {
                    yield Err(LlmError::StreamError(e.to_string()));
                    return;
                }
            };

            match parser.push(&chunk) {
                Ok(frames) => {
                    for event in frames.into_iter().filter_map(parse_frame) {
                        yield event;
                    }
                }
                Err(e) => {
                    yield Err(invalid_utf8(e));
                    return;
                }
            }
        }

        // The last block may arrive without a closing blank line
        match parser.finish() {
            Ok(Some(frame)) => {
                if let Some(event) = parse_frame(frame) {
                    yield event;
                }
            }
            Ok(None) => {}
            Err(e) => {
                yield Err(invalid_utf8(e));
            }
        }
    };

    Box::pin(event_stream)
}

fn invalid_utf8(e: std::str::Utf8Error) -> LlmError {
    LlmError::StreamError(format!("Invalid UTF-8 in stream: {}", e))
}

fn parse_frame(frame: SseFrame) -> Option<Result<ResponseStreamEvent, LlmError>> {
    if frame.data.is_empty() || frame.data == DONE_MARKER {
        return None;
    }

    match serde_json::from_str::<ResponseStreamEvent>(&frame.data) {
        Ok(event) => Some(Ok(event)),
        Err(e) => Some(Err(LlmError::SerializationError(format!(
            "Failed to parse Responses SSE event (type: {:?}): {}. Data: {}",
            frame.event, e, frame.data
        )))),
    }
}
