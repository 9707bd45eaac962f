//! Generation client: one instruction in, one block of text out.

use async_trait::async_trait;
use claude::{Claude, ClientOptions, Message, Request, StopReason};
use std::time::Duration;
use thiserror::Error;

/// Errors from the generation service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("No API key configured - set ANTHROPIC_API_KEY environment variable")]
    NoApiKey,

    #[error("generation service unreachable: {0}")]
    Unreachable(String),

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("generation service returned an error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("unexpected response from generation service: {0}")]
    InvalidResponse(String),

    #[error("generation service returned no text")]
    EmptyResponse,

    #[error("generation cancelled")]
    Cancelled,

    #[error("invalid generator configuration: {0}")]
    Config(String),
}

impl From<claude::Error> for GenerationError {
    fn from(e: claude::Error) -> Self {
        match e {
            claude::Error::NoApiKey => GenerationError::NoApiKey,
            claude::Error::Network(msg) => GenerationError::Unreachable(msg),
            claude::Error::Timeout(after) => GenerationError::Timeout(after),
            claude::Error::Api { status, message } => GenerationError::Service { status, message },
            claude::Error::Parse(msg) => GenerationError::InvalidResponse(msg),
            claude::Error::Config(msg) => GenerationError::Config(msg),
        }
    }
}

/// Anything that can turn an instruction into generated text.
///
/// Implementations make exactly one upstream call per invocation and never
/// retry on their own.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, instruction: &str) -> Result<String, GenerationError>;
}

/// Model settings for [`ClaudeGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// The model to use (defaults to the client's model).
    pub model: Option<String>,

    /// Maximum tokens for responses.
    pub max_tokens: usize,

    /// Temperature for generation.
    pub temperature: Option<f32>,

    /// Upper bound on one generation call.
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 4096,
            temperature: Some(0.8),
            timeout: Duration::from_secs(120),
        }
    }
}

/// [`TextGenerator`] backed by the Claude Messages API.
#[derive(Debug, Clone)]
pub struct ClaudeGenerator {
    client: Claude,
    config: GeneratorConfig,
}

impl ClaudeGenerator {
    /// Create a generator with an API key.
    pub fn new(api_key: impl Into<String>, config: GeneratorConfig) -> Result<Self, GenerationError> {
        let options = ClientOptions::default().with_timeout(config.timeout);
        let client = Claude::with_options(api_key, options)?;
        Ok(Self { client, config })
    }

    /// Create a generator from the ANTHROPIC_API_KEY environment variable.
    pub fn from_env(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let options = ClientOptions::default().with_timeout(config.timeout);
        let client = Claude::from_env_with_options(options)?;
        Ok(Self { client, config })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: Claude, config: GeneratorConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn build_request(&self, instruction: &str) -> Request {
        let mut request =
            Request::new(vec![Message::user(instruction)]).with_max_tokens(self.config.max_tokens);

        if let Some(ref model) = self.config.model {
            request = request.with_model(model);
        }

        if let Some(temp) = self.config.temperature {
            request = request.with_temperature(temp);
        }

        request
    }
}

#[async_trait]
impl TextGenerator for ClaudeGenerator {
    async fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        let request = self.build_request(instruction);

        let response = self.client.complete(request).await.map_err(|e| {
            tracing::warn!(error = %e, "generation call failed");
            GenerationError::from(e)
        })?;

        if response.stop_reason == StopReason::MaxTokens {
            tracing::warn!(
                max_tokens = self.config.max_tokens,
                "generation stopped at the token limit"
            );
        }

        let text = response.text();
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        tracing::info!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "generation complete"
        );
        Ok(text)
    }
}
