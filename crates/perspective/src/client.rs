//! Chat-completion client for the remote summarization API
//!
//! [`ChatClient`] is the seam the summarizer talks through. [`OpenAiClient`]
//! is the production implementation; tests substitute their own.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
  #[error("Summarization API returned HTTP {status}: {body}")]
  Status { status: u16, retry_after: Option<Duration>, body: String },

  #[error("Summarization API request failed: {message}")]
  Network { message: String },

  #[error("Summarization API response was missing content")]
  MissingContent,

  #[error("Summarization API response could not be decoded: {message}")]
  InvalidResponse { message: String },

  #[error("Summarization API client could not be created: {message}")]
  Setup { message: String },
}

impl ChatError {
  pub fn status(status: u16, retry_after: Option<Duration>, body: impl Into<String>) -> Self {
    Self::Status { status, retry_after, body: body.into() }
  }

  pub fn network(message: impl Into<String>) -> Self {
    Self::Network { message: message.into() }
  }

  pub fn invalid_response(message: impl Into<String>) -> Self {
    Self::InvalidResponse { message: message.into() }
  }

  /// Rate limiting and server errors are worth another attempt.
  pub fn is_retryable(&self) -> bool {
    match self {
      ChatError::Status { status, .. } => StatusCode::from_u16(*status).is_ok_and(is_retryable_status),
      _ => false,
    }
  }

  /// Delay the server asked for, if any.
  pub fn retry_after(&self) -> Option<Duration> {
    match self {
      ChatError::Status { retry_after, .. } => *retry_after,
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role: String,
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self { role: "system".to_string(), content: content.into() }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self { role: "user".to_string(), content: content.into() }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
  pub model: String,
  pub messages: Vec<ChatMessage>,
  pub temperature: f32,
}

/// Text and model name from a successful completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
  pub content: String,
  pub model: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
  #[serde(default)]
  model: Option<String>,
  #[serde(default)]
  choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
  #[serde(default)]
  message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
  #[serde(default)]
  content: Option<String>,
}

/// One attempt at a chat completion; retries live in [`crate::retry`].
#[async_trait]
pub trait ChatClient: Send + Sync {
  async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, ChatError>;
}

/// OpenAI-compatible `/chat/completions` client
pub struct OpenAiClient {
  http: reqwest::Client,
  base_url: String,
  api_key: String,
}

impl OpenAiClient {
  pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ChatError> {
    let http = reqwest::Client::builder()
      .connect_timeout(CONNECT_TIMEOUT)
      .build()
      .map_err(|e| ChatError::Setup { message: e.to_string() })?;

    Ok(Self { http, base_url: base_url.into().trim_end_matches('/').to_string(), api_key: api_key.into() })
  }

  fn endpoint(&self) -> String {
    format!("{}/chat/completions", self.base_url)
  }
}

#[async_trait]
impl ChatClient for OpenAiClient {
  async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, ChatError> {
    let response = self
      .http
      .post(self.endpoint())
      .bearer_auth(&self.api_key)
      .json(request)
      .send()
      .await
      .map_err(|e| ChatError::network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let retry_after = parse_retry_after(response.headers());
      let body = response.text().await.unwrap_or_default();
      return Err(ChatError::status(status.as_u16(), retry_after, body));
    }

    let body: CompletionResponse = response.json().await.map_err(|e| ChatError::invalid_response(e.to_string()))?;
    completion_from(body, &request.model)
  }
}

fn completion_from(body: CompletionResponse, requested_model: &str) -> Result<ChatCompletion, ChatError> {
  let content = body
    .choices
    .into_iter()
    .next()
    .and_then(|choice| choice.message)
    .and_then(|message| message.content)
    .filter(|content| !content.trim().is_empty())
    .ok_or(ChatError::MissingContent)?;

  let model = body.model.filter(|m| !m.is_empty()).unwrap_or_else(|| requested_model.to_string());
  Ok(ChatCompletion { content, model })
}

/// `retry-after` in whole or fractional seconds; HTTP-date values are ignored.
///
/// Values too large for a `Duration` saturate; the retry policy caps them.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
  headers
    .get(RETRY_AFTER)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.trim().parse::<f64>().ok())
    .filter(|secs| secs.is_finite() && *secs >= 0.0)
    .map(|secs| Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}

/// Whether an HTTP status is one the retry loop should try again on.
pub fn is_retryable_status(status: StatusCode) -> bool {
  status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
