//! Checks which models the configured API key can use with the Responses API.
//! Utility binary; the server does not depend on it.

use chat_relay::llm::openai::{mask_token, DEFAULT_BASE_URL};
use chat_relay::llm::{GenerationConfig, OpenAiClient, ReasoningEffort, ResponseRequest, Verbosity};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| "OPENAI_API_KEY is not set")?;
    let base_url = std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    println!("Using key {} against {}\n", mask_token(&api_key), base_url);

    let client = OpenAiClient::new(api_key, base_url)?;

    let tuned = |model: &str| {
        GenerationConfig::new(model)
            .with_reasoning_effort(ReasoningEffort::Minimal)
            .with_verbosity(Verbosity::Low)
    };
    let attempts = [
        (tuned("gpt-5-mini"), "Say \"GPT-5 is working!\""),
        (tuned("gpt-4o"), "Say \"GPT-4o with Responses API is working!\""),
        (
            GenerationConfig::new("gpt-4o-mini"),
            "Say \"Basic Responses API is working!\"",
        ),
    ];

    for (i, (config, prompt)) in attempts.into_iter().enumerate() {
        let model = config.model.clone();
        println!("{}. Testing {} with the Responses API...", i + 1, model);

        match client.create_response(ResponseRequest::new(prompt, config)).await {
            Ok(text) => {
                println!("   ✓ {} works", model);
                println!("   Response: {}", text.trim());
                return Ok(());
            }
            Err(e) => {
                eprintln!("   ✗ {} failed: {}\n", model, e);
            }
        }
    }

    eprintln!("No model answered; check the key's model access and the base URL.");
    Err("all probes failed".into())
}
