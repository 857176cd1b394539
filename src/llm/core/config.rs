//! Generation configuration parameters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much hidden reasoning the model may spend before answering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

/// How long the visible answer should be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Low,
    Medium,
    High,
}

/// Error returned when a level name is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLevel(pub String);

impl fmt::Display for UnknownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown level '{}'", self.0)
    }
}

impl std::error::Error for UnknownLevel {}

impl FromStr for ReasoningEffort {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(ReasoningEffort::Minimal),
            "low" => Ok(ReasoningEffort::Low),
            "medium" => Ok(ReasoningEffort::Medium),
            "high" => Ok(ReasoningEffort::High),
            other => Err(UnknownLevel(other.to_string())),
        }
    }
}

impl FromStr for Verbosity {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Verbosity::Low),
            "medium" => Ok(Verbosity::Medium),
            "high" => Ok(Verbosity::High),
            other => Err(UnknownLevel(other.to_string())),
        }
    }
}

/// Parameters for controlling text generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model identifier, e.g. `gpt-5-mini`
    pub model: String,
    /// Reasoning budget (reasoning models only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<ReasoningEffort>,
    /// Output length hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<Verbosity>,
}

impl GenerationConfig {
    /// Create a new configuration for the given model with no extra parameters
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            reasoning_effort: None,
            verbosity: None,
        }
    }

    /// Set the reasoning effort
    pub fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = Some(effort);
        self
    }

    /// Set the verbosity
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = Some(verbosity);
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new("gpt-5-mini")
            .with_reasoning_effort(ReasoningEffort::Minimal)
            .with_verbosity(Verbosity::Low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = GenerationConfig::new("gpt-4o-mini");
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.reasoning_effort.is_none());
        assert!(config.verbosity.is_none());
    }

    #[test]
    fn test_config_default() {
        let config = GenerationConfig::default();
        assert_eq!(config.model, "gpt-5-mini");
        assert_eq!(config.reasoning_effort, Some(ReasoningEffort::Minimal));
        assert_eq!(config.verbosity, Some(Verbosity::Low));
    }

    #[test]
    fn test_config_serialization_skips_unset_fields() {
        let json = serde_json::to_string(&GenerationConfig::new("gpt-4o")).unwrap();
        assert!(json.contains("\"model\":\"gpt-4o\""));
        assert!(!json.contains("reasoning_effort"));
        assert!(!json.contains("verbosity"));
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("minimal".parse::<ReasoningEffort>(), Ok(ReasoningEffort::Minimal));
        assert_eq!(" HIGH ".parse::<ReasoningEffort>(), Ok(ReasoningEffort::High));
        assert_eq!("medium".parse::<Verbosity>(), Ok(Verbosity::Medium));
        assert!("minimal".parse::<Verbosity>().is_err());
        assert!("extreme".parse::<ReasoningEffort>().is_err());
    }
}
