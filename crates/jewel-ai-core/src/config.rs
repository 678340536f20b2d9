//! Configuration values for the pipeline and the HTTP client
//!
//! Everything here is a plain value passed in at construction. Sources, in
//! increasing priority: defaults, a TOML file, `JEWEL_AI_*` environment
//! variables.
//!
//! ```toml
//! [client]
//! endpoint = "http://localhost:8080/v1/generate"
//! timeout_ms = 30000
//!
//! [generation]
//! model = "jewel-design"
//! temperature = 0.7
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

const DEFAULT_ENDPOINT: &str = "http://localhost:8080/v1/generate";
const DEFAULT_MODEL: &str = "jewel-design";

/// Per-request generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Model identifier
    pub model: String,
    /// Sampling temperature in `[0, 1]`
    pub temperature: f32,
    /// Completion length limit, greater than zero
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

impl GenerationSettings {
    /// Replace the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Replace the token limit
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("generation.model", "must not be empty"));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::invalid(
                "generation.temperature",
                format!("{} is outside [0, 1]", self.temperature),
            ));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::invalid("generation.max_tokens", "must be positive"));
        }
        Ok(())
    }

    /// Overlay `JEWEL_AI_MODEL`, `JEWEL_AI_TEMPERATURE` and `JEWEL_AI_MAX_TOKENS`
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    fn overlay_env(mut self) -> Self {
        if let Ok(model) = std::env::var("JEWEL_AI_MODEL") {
            self.model = model;
        }
        self.temperature = env_parse("JEWEL_AI_TEMPERATURE", self.temperature);
        self.max_tokens = env_parse("JEWEL_AI_MAX_TOKENS", self.max_tokens);
        self
    }
}

/// Connection settings for [`HttpGenerationClient`](crate::client::HttpGenerationClient)
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// URL the generation request is posted to
    pub endpoint: String,
    /// Bearer token, if the service wants one
    pub api_key: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// First retry delay in milliseconds
    pub initial_backoff_ms: u64,
    /// Upper bound on the retry delay
    pub max_backoff_ms: u64,
    /// Delay growth factor between retries
    pub backoff_multiplier: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_ms: 30000,
            max_retries: 2,
            initial_backoff_ms: 250,
            max_backoff_ms: 4000,
            backoff_multiplier: 2.0,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .field("initial_backoff_ms", &self.initial_backoff_ms)
            .field("max_backoff_ms", &self.max_backoff_ms)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    fn overlay_env(mut self) -> Self {
        if let Ok(endpoint) = std::env::var("JEWEL_AI_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(key) = std::env::var("JEWEL_AI_API_KEY") {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }
        self.timeout_ms = env_parse("JEWEL_AI_TIMEOUT_MS", self.timeout_ms);
        self.max_retries = env_parse("JEWEL_AI_MAX_RETRIES", self.max_retries);
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "client.endpoint",
                format!("'{}' is not an http(s) URL", self.endpoint),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid("client.timeout_ms", "must be positive"));
        }
        if self.backoff_multiplier < 1.0 {
            return Err(ConfigError::invalid(
                "client.backoff_multiplier",
                "must be at least 1.0",
            ));
        }
        Ok(())
    }
}

/// Builder for [`ClientConfig`]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Set the endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the bearer token
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the timeout in milliseconds
    pub fn timeout_ms(mut self, timeout: u64) -> Self {
        self.config.timeout_ms = timeout;
        self
    }

    /// Set retry policy
    pub fn retries(mut self, max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        self.config.max_retries = max_retries;
        self.config.initial_backoff_ms = initial_backoff_ms;
        self.config.max_backoff_ms = max_backoff_ms;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Combined file configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client section
    pub client: ClientConfig,
    /// Generation defaults section
    pub generation: GenerationSettings,
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Defaults overlaid with environment variables
    pub fn from_env() -> Self {
        Self {
            client: ClientConfig::from_env(),
            generation: GenerationSettings::from_env(),
        }
    }

    /// Overlay environment variables on values already loaded
    pub fn with_env_overrides(self) -> Result<Self> {
        let config = Self {
            client: self.client.overlay_env(),
            generation: self.generation.overlay_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate both sections
    pub fn validate(&self) -> Result<()> {
        self.client.validate()?;
        self.generation.validate()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.client.timeout_ms, 30000);
        assert_eq!(config.client.max_retries, 2);
        assert!(config.client.api_key.is_none());
        assert_eq!(config.generation.max_tokens, 2048);
    }

    #[test]
    fn test_settings_validation() {
        assert!(GenerationSettings::default().with_temperature(1.5).validate().is_err());
        assert!(GenerationSettings::default().with_temperature(-0.1).validate().is_err());
        assert!(GenerationSettings::default().with_max_tokens(0).validate().is_err());
        assert!(GenerationSettings::default().with_model(" ").validate().is_err());
        assert!(GenerationSettings::default().with_temperature(0.0).validate().is_ok());
    }

    #[test]
    fn test_toml_partial_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [client]
            endpoint = "https://llm.internal/generate"
            api_key = "k"

            [generation]
            temperature = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(config.client.endpoint, "https://llm.internal/generate");
        assert_eq!(config.client.api_key.as_deref(), Some("k"));
        assert_eq!(config.client.timeout_ms, ClientConfig::default().timeout_ms);
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_toml_rejects_bad_values() {
        let err = AppConfig::from_toml_str("[generation]\ntemperature = 3.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        let err = AppConfig::from_toml_str("[client\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jewel-ai.toml");
        std::fs::write(&path, "[generation]\nmodel = \"ring-v2\"\n").unwrap();
        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.generation.model, "ring-v2");
        assert!(matches!(
            AppConfig::from_file(dir.path().join("missing.toml")),
            Err(ConfigError::File(_))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::builder().api_key("super-secret").build();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
