//! Summarizer settings
//!
//! Every value can come from the environment; unset, empty, unparsable or
//! zero numeric values fall back to the defaults below.

use std::env;
use std::str::FromStr;

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "OPENAI_MODEL";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const MAX_GROUPS_ENV: &str = "THREADLENS_MAX_GROUPS";
pub const CONCURRENCY_ENV: &str = "THREADLENS_CONCURRENCY";
pub const MAX_ATTEMPTS_ENV: &str = "THREADLENS_MAX_ATTEMPTS";
pub const CACHE_CAPACITY_ENV: &str = "THREADLENS_CACHE_CAPACITY";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAX_GROUPS: usize = 8;
pub const DEFAULT_CONCURRENCY: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizerConfig {
  /// Credential for the remote API; `None` keeps everything heuristic
  pub api_key: Option<String>,
  pub model: String,
  pub base_url: String,
  /// Largest homework and model groups summarized remotely, per dimension
  pub max_groups: usize,
  /// Remote calls in flight at once during grouped summarization
  pub concurrency: usize,
  pub retry: RetryPolicy,
  pub cache_capacity: usize,
}

impl Default for SummarizerConfig {
  fn default() -> Self {
    Self {
      api_key: None,
      model: DEFAULT_MODEL.to_string(),
      base_url: DEFAULT_BASE_URL.to_string(),
      max_groups: DEFAULT_MAX_GROUPS,
      concurrency: DEFAULT_CONCURRENCY,
      retry: RetryPolicy::default(),
      cache_capacity: DEFAULT_CACHE_CAPACITY,
    }
  }
}

impl SummarizerConfig {
  pub fn from_env() -> Self {
    Self {
      api_key: env_string(API_KEY_ENV),
      model: env_string(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
      base_url: env_string(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
      max_groups: env_positive(MAX_GROUPS_ENV).unwrap_or(DEFAULT_MAX_GROUPS),
      concurrency: env_positive(CONCURRENCY_ENV).unwrap_or(DEFAULT_CONCURRENCY),
      retry: RetryPolicy::default().with_max_attempts(env_positive(MAX_ATTEMPTS_ENV).unwrap_or(DEFAULT_MAX_ATTEMPTS)),
      cache_capacity: env_positive(CACHE_CAPACITY_ENV).unwrap_or(DEFAULT_CACHE_CAPACITY),
    }
  }

  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.api_key = Some(api_key.into());
    self
  }

  pub fn has_credential(&self) -> bool {
    self.api_key.is_some()
  }
}

fn env_string(name: &str) -> Option<String> {
  env::var(name).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn env_positive<T: FromStr + PartialOrd + Default>(name: &str) -> Option<T> {
  env_string(name).and_then(|value| value.parse::<T>().ok()).filter(|value| *value > T::default())
}
