//! Summary cache shared across requests
//!
//! Keys are content hashes of the request inputs, so identical inputs reuse a
//! summary instead of calling the remote API again. The cache is handed to the
//! summarizer explicitly rather than living in a global.

use lru::LruCache;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::types::{AIPerspective, GroupSummary};

pub const DEFAULT_CACHE_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedSummary {
  Perspective(AIPerspective),
  Group(GroupSummary),
}

pub trait SummaryCache: Send + Sync {
  fn get(&self, key: &str) -> Option<CachedSummary>;
  fn set(&self, key: String, value: CachedSummary);
}

/// Bounded cache evicting the least recently used entry
pub struct LruSummaryCache {
  entries: Mutex<LruCache<String, CachedSummary>>,
}

impl LruSummaryCache {
  pub fn new(capacity: usize) -> Self {
    let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
    Self { entries: Mutex::new(LruCache::new(capacity)) }
  }

  pub fn len(&self) -> usize {
    self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl Default for LruSummaryCache {
  fn default() -> Self {
    Self::new(DEFAULT_CACHE_CAPACITY)
  }
}

impl SummaryCache for LruSummaryCache {
  fn get(&self, key: &str) -> Option<CachedSummary> {
    let mut entries = self.entries.lock().ok()?;
    entries.get(key).cloned()
  }

  fn set(&self, key: String, value: CachedSummary) {
    if let Ok(mut entries) = self.entries.lock() {
      entries.put(key, value);
    }
  }
}

#[derive(Serialize)]
struct CacheKeyInput<'a, T: Serialize> {
  purpose: &'a str,
  model: &'a str,
  input: &'a T,
}

/// SHA-256 over the JSON serialization of `{purpose, model, input}`.
pub fn cache_key<T: Serialize>(purpose: &str, model: &str, input: &T) -> String {
  let payload = serde_json::to_string(&CacheKeyInput { purpose, model, input }).unwrap_or_default();
  format!("{:x}", Sha256::digest(payload.as_bytes()))
}
