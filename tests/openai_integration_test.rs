//! Integration tests against the real OpenAI API
//!
//! These tests make billable API calls.
//! To run them:
//! 1. Put `OPENAI_API_KEY` (and optionally `OPENAI_MODEL`) in `.env`
//! 2. Run: `cargo test --test openai_integration_test -- --ignored`

use chat_relay::llm::openai::DEFAULT_BASE_URL;
use chat_relay::llm::{
    CompletionProvider, GenerationConfig, OpenAiClient, ResponseEvent, ResponseRequest,
};
use futures::StreamExt;
use std::env;

fn create_test_client() -> OpenAiClient {
    dotenvy::dotenv().ok();

    let api_key = env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY required in .env");
    let base_url = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    OpenAiClient::new(api_key, base_url).expect("Failed to create OpenAI client")
}

fn test_config() -> GenerationConfig {
    match env::var("OPENAI_MODEL") {
        Ok(model) => GenerationConfig::new(model),
        Err(_) => GenerationConfig::default(),
    }
}

#[tokio::test]
#[ignore] // Run with --ignored flag
async fn test_openai_streamed_response() {
    let client = create_test_client();

    let request = ResponseRequest::new("What is 2+2? Answer with just the number.", test_config())
        .with_instructions("You are a calculator.");

    let mut stream = client
        .stream_response(request)
        .await
        .expect("Failed to start stream");

    let mut text = String::new();
    let mut total_tokens = 0;

    while let Some(event) = stream.next().await {
        match event.expect("Stream error") {
            ResponseEvent::TextDelta(delta) => text.push_str(&delta),
            ResponseEvent::Completed { usage } => {
                total_tokens = usage.map(|u| u.total_tokens).unwrap_or_default();
            }
        }
    }

    println!("Response: {}", text);
    println!("Total tokens: {}", total_tokens);

    assert!(text.contains('4'));
    assert!(total_tokens > 0);
}

#[tokio::test]
#[ignore] // Run with --ignored flag
async fn test_openai_file_round_trip() {
    let client = create_test_client();

    let file = client
        .upload_file("relay-test.txt", b"The relay test file.".to_vec(), "assistants")
        .await
        .expect("Upload failed");
    println!("Uploaded {}", file.id);

    let fetched = client
        .retrieve_file(&file.id)
        .await
        .expect("Retrieve failed");

    assert_eq!(fetched["id"], file.id.as_str());
    assert_eq!(fetched["filename"], "relay-test.txt");
}
