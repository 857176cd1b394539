//! Conversion between the relay's request/event types and the Responses API schema

use crate::llm::core::{
    error::LlmError,
    types::{ResponseEvent, ResponseRequest, UsageMetadata},
};

use super::types::{
    CreateResponseRequest, ReasoningParam, ResponseObject, ResponseStreamEvent, ResponseUsage,
    TextParam,
};

/// Build the wire request
pub fn to_openai_request(request: ResponseRequest, stream: bool) -> CreateResponseRequest {
    let ResponseRequest {
        instructions,
        input,
        config,
    } = request;

    CreateResponseRequest {
        model: config.model,
        instructions,
        input,
        reasoning: config
            .reasoning_effort
            .map(|effort| ReasoningParam { effort }),
        text: config.verbosity.map(|verbosity| TextParam { verbosity }),
        tools: Vec::new(),
        stream,
    }
}

/// Map one wire event to at most one relay event
///
/// Returns `None` for events the relay does not care about.
pub fn from_openai_event(event: ResponseStreamEvent) -> Option<Result<ResponseEvent, LlmError>> {
    match event {
        ResponseStreamEvent::OutputTextDelta { delta } => Some(Ok(ResponseEvent::TextDelta(delta))),
        ResponseStreamEvent::Completed { response } => Some(Ok(ResponseEvent::Completed {
            usage: response.usage.map(to_usage),
        })),
        ResponseStreamEvent::Failed { response } => Some(Err(failure_error(&response))),
        ResponseStreamEvent::Incomplete { response } => {
            let reason = response
                .incomplete_details
                .and_then(|details| details.reason)
                .unwrap_or_else(|| "unknown".to_string());
            Some(Err(LlmError::ProviderError {
                code: "incomplete".to_string(),
                message: format!("Response incomplete: {}", reason),
            }))
        }
        ResponseStreamEvent::Error { code, message } => Some(Err(LlmError::ProviderError {
            code: code.unwrap_or_else(|| "error".to_string()),
            message,
        })),
        ResponseStreamEvent::Other => None,
    }
}

/// Extract the error carried by a failed response object
pub fn failure_error(response: &ResponseObject) -> LlmError {
    match &response.error {
        Some(error) => LlmError::ProviderError {
            code: error.code.clone().unwrap_or_else(|| "failed".to_string()),
            message: error.message.clone(),
        },
        None => LlmError::ProviderError {
            code: "failed".to_string(),
            message: format!(
                "Response {} ended with status {}",
                response.id,
                response.status.as_deref().unwrap_or("unknown")
            ),
        },
    }
}

fn to_usage(usage: ResponseUsage) -> UsageMetadata {
    UsageMetadata::new(usage.input_tokens, usage.output_tokens)
}
