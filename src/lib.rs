//! OpenRouter Client
//!
//! Typed async client for an OpenRouter-compatible chat-completion API, with
//! a pull-based decoder for streamed responses.
//!
//! ```no_run
//! use openrouter_client::{ChatCompletionRequest, Message, OpenRouterClient};
//!
//! # async fn run() -> openrouter_client::Result<()> {
//! let client = OpenRouterClient::from_env()?;
//! let request = ChatCompletionRequest::new("openai/gpt-4o", vec![Message::user("Hello!")]);
//!
//! let mut stream = client.create_chat_completion_stream(&request).await?;
//! while let Some(chunk) = stream.recv().await? {
//!     print!("{}", chunk.content().unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;

pub use api::*;
pub use client::{ChatCompletionStream, RequestOptions};
pub use config::{ClientConfig, ConfigLoader};
pub use error::{ApiError, Error, ErrorKind, Result, TransportError};

use api::models::{GenerationResponse, KeyCheckResponse};
use client::HttpClient;
use std::path::Path;

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
const MODELS_PATH: &str = "models";
const GENERATION_PATH: &str = "generation";
const AUTH_KEY_PATH: &str = "auth/key";

/// The main API client
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: HttpClient,
}

impl OpenRouterClient {
    /// Create a client for the public API with the given key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Create a client from `.env`, config files and `OPENROUTER_*` variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(ConfigLoader::new()?.into_config()?)
    }

    /// Create a client with a custom config path
    pub fn with_config_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(ConfigLoader::from_path(path)?.into_config()?)
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            http: HttpClient::new(&config)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Make a non-streaming chat completion request
    pub async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.create_chat_completion_with_options(request, &RequestOptions::default())
            .await
    }

    /// Make a non-streaming chat completion request with cancellation or a deadline
    pub async fn create_chat_completion_with_options(
        &self,
        request: &ChatCompletionRequest,
        options: &RequestOptions,
    ) -> Result<ChatCompletionResponse> {
        if request.stream {
            return Err(Error::Validation(
                "request has stream set; use create_chat_completion_stream".to_string(),
            ));
        }

        let body = request.encode(false)?;
        tracing::debug!(model = %request.model, messages = request.messages.len(), "creating chat completion");

        self.http
            .post_json(CHAT_COMPLETIONS_PATH, &body, options)
            .await
    }

    /// Start a streaming chat completion
    ///
    /// The request is always sent with `stream: true`. The returned stream
    /// owns the connection until it is closed or dropped.
    pub async fn create_chat_completion_stream(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionStream> {
        self.create_chat_completion_stream_with_options(request, &RequestOptions::default())
            .await
    }

    /// Start a streaming chat completion; the token also aborts later reads
    pub async fn create_chat_completion_stream_with_options(
        &self,
        request: &ChatCompletionRequest,
        options: &RequestOptions,
    ) -> Result<ChatCompletionStream> {
        let body = request.encode(true)?;
        tracing::debug!(model = %request.model, messages = request.messages.len(), "creating chat completion stream");

        let reader = self
            .http
            .post_stream(CHAT_COMPLETIONS_PATH, &body, options)
            .await?;

        let stream = ChatCompletionStream::from_reader(reader);
        Ok(match &options.cancel {
            Some(token) => stream.with_cancellation(token.clone()),
            None => stream,
        })
    }

    /// List the models available to this key
    pub async fn list_models(&self) -> Result<ModelsList> {
        self.http
            .get_json(MODELS_PATH, &[], &RequestOptions::default())
            .await
    }

    /// Fetch statistics for a finished generation by its id
    pub async fn get_generation(&self, id: &str) -> Result<Generation> {
        if id.is_empty() {
            return Err(Error::Validation("generation id is empty".to_string()));
        }

        let resp: GenerationResponse = self
            .http
            .get_json(GENERATION_PATH, &[("id", id)], &RequestOptions::default())
            .await?;
        Ok(resp.data)
    }

    /// Fetch credit usage and limit for the current key
    pub async fn check_credits(&self) -> Result<KeyData> {
        let resp: KeyCheckResponse = self
            .http
            .get_json(AUTH_KEY_PATH, &[], &RequestOptions::default())
            .await?;
        Ok(resp.data)
    }
}
