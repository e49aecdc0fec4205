//! Retry with backoff around single chat-completion attempts

use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

use crate::client::{ChatClient, ChatCompletion, ChatError, ChatRequest};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(600);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);
pub const DEFAULT_JITTER: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total attempts including the first one
  pub max_attempts: u32,
  /// Delay after the first failed attempt; doubles per attempt
  pub base_delay: Duration,
  /// Upper bound for any single wait, `retry-after` included
  pub max_delay: Duration,
  /// Random spread applied in both directions to computed backoff
  pub jitter: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: DEFAULT_MAX_ATTEMPTS,
      base_delay: DEFAULT_BASE_DELAY,
      max_delay: DEFAULT_MAX_DELAY,
      jitter: DEFAULT_JITTER,
    }
  }
}

impl RetryPolicy {
  pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
    self.max_attempts = max_attempts;
    self
  }

  /// Backoff before attempt `attempt + 1`, without jitter.
  pub fn backoff(&self, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(31);
    self.base_delay.saturating_mul(1u32 << exponent).min(self.max_delay)
  }

  /// Wait after failed attempt number `attempt` (1-based).
  pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
    if let Some(requested) = retry_after {
      return requested.min(self.max_delay);
    }

    let base = self.backoff(attempt);
    let spread = self.jitter.as_millis() as i64;
    if spread == 0 {
      return base;
    }

    let offset = rand::rng().random_range(-spread..=spread);
    let millis = (base.as_millis() as i64 + offset).max(0) as u64;
    Duration::from_millis(millis)
  }
}

/// Run `request` until it succeeds, fails terminally, or attempts run out.
pub async fn complete_with_retry(
  client: &dyn ChatClient,
  request: &ChatRequest,
  policy: &RetryPolicy,
) -> Result<ChatCompletion, ChatError> {
  let max_attempts = policy.max_attempts.max(1);
  let mut attempt = 1;

  loop {
    match client.complete(request).await {
      Ok(completion) => return Ok(completion),
      Err(e) if e.is_retryable() && attempt < max_attempts => {
        let delay = policy.delay_for(attempt, e.retry_after());
        tracing::warn!("Attempt {attempt}/{max_attempts} failed ({e}); retrying in {}ms", delay.as_millis());
        sleep(delay).await;
        attempt += 1;
      }
      Err(e) => {
        tracing::debug!("Giving up after attempt {attempt}/{max_attempts}: {e}");
        return Err(e);
      }
    }
  }
}
