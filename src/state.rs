//! Shared, read-only server state

use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::{IdentityVerifier, SupabaseAuth};
use crate::config::RelayConfig;
use crate::error::Error;
use crate::llm::{CompletionProvider, GenerationConfig, OpenAiClient};

/// How chat requests are shaped before they go upstream
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub generation: GenerationConfig,
    pub default_system_prompt: String,
}

/// Everything a handler needs; built once at startup
pub struct AppState {
    pub verifier: Arc<dyn IdentityVerifier>,
    pub provider: Arc<dyn CompletionProvider>,
    pub chat: ChatSettings,
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn from_config(config: &RelayConfig) -> Result<Self, Error> {
        let provider = OpenAiClient::new(&config.openai_api_key, &config.openai_base_url)?;
        let verifier = SupabaseAuth::new(&config.supabase_url, &config.supabase_service_key)?;

        Ok(Self {
            verifier: Arc::new(verifier),
            provider: Arc::new(provider),
            chat: ChatSettings {
                generation: config.generation.clone(),
                default_system_prompt: config.default_system_prompt.clone(),
            },
            public_dir: config.public_dir.clone(),
        })
    }
}
