//! Configuration types.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::llm::openai::DEFAULT_BASE_URL;
use crate::llm::{GenerationConfig, ReasoningEffort, Verbosity};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Relay server configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Listen address.
    pub host: IpAddr,
    /// Listen port.
    pub port: u16,
    /// Completion API secret key.
    pub openai_api_key: String,
    /// Completion API root.
    pub openai_base_url: String,
    /// Model and generation parameters for chat.
    pub generation: GenerationConfig,
    /// Instructions used when the conversation has no system message.
    pub default_system_prompt: String,
    /// Backend-as-a-service project URL.
    pub supabase_url: String,
    /// Service role key used to verify user tokens.
    pub supabase_service_key: String,
    /// Directory holding the static pages.
    pub public_dir: PathBuf,
}

impl RelayConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key =
            get("OPENAI_API_KEY").ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".into()))?;

        let host = parse_or("HOST", get("HOST"), IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port = parse_or("PORT", get("PORT"), 3000u16)?;

        let reasoning_effort: ReasoningEffort =
            parse_or("OPENAI_REASONING_EFFORT", get("OPENAI_REASONING_EFFORT"), ReasoningEffort::Minimal)?;
        let verbosity: Verbosity = parse_or("OPENAI_VERBOSITY", get("OPENAI_VERBOSITY"), Verbosity::Low)?;

        let generation = GenerationConfig::new(
            get("OPENAI_MODEL").unwrap_or_else(|| "gpt-5-mini".to_string()),
        )
        .with_reasoning_effort(reasoning_effort)
        .with_verbosity(verbosity);

        Ok(Self {
            host,
            port,
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            generation,
            default_system_prompt: get("DEFAULT_SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            supabase_url: get("SUPABASE_URL")
                .unwrap_or_else(|| "https://placeholder.supabase.co".to_string()),
            supabase_service_key: get("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|| "placeholder-key".to_string()),
            public_dir: PathBuf::from(get("PUBLIC_DIR").unwrap_or_else(|| "public".to_string())),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{}': {}", raw, e),
        }),
    }
}
