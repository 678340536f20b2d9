//! Generation service clients
//!
//! The pipeline only needs [`GenerationClient::generate`]: send a request,
//! get raw text back or a [`TransportError`]. Retry and timeout policy live
//! in the implementation, never in the pipeline.

pub mod http;

pub use http::{HttpGenerationClient, HttpGenerationClientBuilder};

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::config::GenerationSettings;
use crate::error::{ConfigError, TransportError};
use crate::prompt::CompiledPrompt;

/// Wire payload sent to the generation service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    /// System prompt
    pub system: String,
    /// User prompt
    pub prompt: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature in `[0, 1]`
    pub temperature: f32,
    /// Completion length limit
    pub max_tokens: u32,
}

impl GenerationRequest {
    /// Build a request from a compiled prompt and settings
    ///
    /// Settings outside their allowed ranges are rejected, so no request
    /// with a temperature outside `[0, 1]` or a zero token limit is ever sent.
    pub fn new(prompt: CompiledPrompt, settings: &GenerationSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            system: prompt.system_prompt,
            prompt: prompt.user_prompt,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }
}

/// A text completion service
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send `request` and return the raw reply text
    async fn generate(&self, request: &GenerationRequest) -> Result<String, TransportError>;
}

#[async_trait]
impl<C: GenerationClient + ?Sized> GenerationClient for Arc<C> {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, TransportError> {
        (**self).generate(request).await
    }
}

#[async_trait]
impl<C: GenerationClient + ?Sized> GenerationClient for Box<C> {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, TransportError> {
        (**self).generate(request).await
    }
}
