//! Bucketing posts by homework number and by model name
//!
//! Existing tags always win over text detection. Text detection runs on the
//! lowercased title, body and tags of a post.

use ingest::Post;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Model buckets smaller than this are treated as noise and dropped.
pub const MIN_MODEL_GROUP_SIZE: usize = 2;

pub const HW_PREFIX: &str = "hw:";
pub const MODEL_PREFIX: &str = "model:";

// Tried in order; the first numeric capture decides the homework number.
static HOMEWORK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
  [
    r"\bhw\s*#?\s*(\d+)\b",
    r"\bhw\s*-\s*(\d+)\b",
    r"\bhomework\s*[#-]?\s*(\d+)\b",
    r"\bassignment\s*[#-]?\s*(\d+)\b",
    r"\bproject\s*[#-]?\s*(\d+)\b",
  ]
  .iter()
  .filter_map(|pattern| Regex::new(pattern).ok())
  .collect()
});

struct KnownModel {
  key: &'static str,
  label: &'static str,
  pattern: Regex,
}

static KNOWN_MODELS: Lazy<Vec<KnownModel>> = Lazy::new(|| {
  [
    ("gpt-4o-mini", "GPT-4o mini", r"\bgpt[-\s]?4o[-\s]?mini\b"),
    ("gpt-4o", "GPT-4o", r"\bgpt[-\s]?4o\b"),
    ("o1", "o1", r"\bo1(?:[-\s]?(?:mini|preview|pro))?\b"),
    ("claude", "Claude", r"\bclaude\b"),
    ("gemini", "Gemini", r"\bgemini\b"),
    ("llama", "Llama", r"\bllama"),
    ("mistral", "Mistral", r"\bmistral\b"),
    ("deepseek", "DeepSeek", r"\bdeepseek"),
    ("qwen", "Qwen", r"\bqwen"),
    ("grok", "Grok", r"\bgrok\b"),
  ]
  .into_iter()
  .filter_map(|(key, label, pattern)| Regex::new(pattern).ok().map(|pattern| KnownModel { key, label, pattern }))
  .collect()
});

static GENERIC_MODEL: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\bmodel:\s*([a-z0-9][a-z0-9._-]*)").ok());

/// Posts sharing one grouping key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBucket {
  pub key: String,
  pub label: String,
  pub posts: Vec<Post>,
}

impl PostBucket {
  fn new(key: String, label: String) -> Self {
    Self { key, label, posts: Vec::new() }
  }

  pub fn len(&self) -> usize {
    self.posts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.posts.is_empty()
  }

  /// Numeric part of an `hw:<n>` key.
  pub fn homework_number(&self) -> Option<u64> {
    self.key.strip_prefix(HW_PREFIX).and_then(|n| n.parse().ok())
  }

  fn add(&mut self, post: &Post) {
    if !self.posts.iter().any(|p| p.id == post.id) {
      self.posts.push(post.clone());
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostGroups {
  pub homework: BTreeMap<String, PostBucket>,
  pub models: BTreeMap<String, PostBucket>,
}

pub fn group_posts(posts: &[Post]) -> PostGroups {
  let mut groups = PostGroups::default();

  for post in posts {
    let text = searchable_text(post);

    if let Some(number) = homework_number(post, &text) {
      let key = format!("{HW_PREFIX}{number}");
      groups.homework.entry(key.clone()).or_insert_with(|| PostBucket::new(key, format!("Homework {number}"))).add(post);
    }

    for (key, label) in model_keys(post, &text) {
      groups.models.entry(key.clone()).or_insert_with(|| PostBucket::new(key, label)).add(post);
    }
  }

  groups.models.retain(|_, bucket| bucket.len() >= MIN_MODEL_GROUP_SIZE);
  tracing::debug!("Grouped posts into {} homework and {} model buckets", groups.homework.len(), groups.models.len());
  groups
}

/// Lowercased title, body and tags joined for pattern scanning.
pub fn searchable_text(post: &Post) -> String {
  format!("{} {} {}", post.title, post.body, post.tags.join(" ")).to_lowercase()
}

fn homework_number(post: &Post, text: &str) -> Option<String> {
  if let Some(value) = post.tag_value("hw") {
    return Some(normalize_number(value));
  }

  HOMEWORK_PATTERNS.iter().find_map(|pattern| pattern.captures(text)).and_then(|caps| caps.get(1)).map(|m| normalize_number(m.as_str()))
}

fn normalize_number(value: &str) -> String {
  value.parse::<u64>().map(|n| n.to_string()).unwrap_or_else(|_| value.to_string())
}

/// Every `(key, label)` model bucket a post belongs to.
///
/// A text scan can hit several dictionary entries, and the post then joins
/// each of those buckets.
fn model_keys(post: &Post, text: &str) -> Vec<(String, String)> {
  if let Some(base) = post.tag_value("base_model") {
    return vec![(format!("{MODEL_PREFIX}{}", base.to_lowercase()), base.to_string())];
  }

  let mut keys: Vec<(String, String)> = Vec::new();
  let mut push = |key: String, label: String| {
    if !keys.iter().any(|(k, _)| *k == key) {
      keys.push((key, label));
    }
  };

  for model in KNOWN_MODELS.iter().filter(|model| model.pattern.is_match(text)) {
    push(format!("{MODEL_PREFIX}{}", model.key), model.label.to_string());
  }

  if let Some(generic) = GENERIC_MODEL.as_ref() {
    for caps in generic.captures_iter(text) {
      if let Some(token) = caps.get(1) {
        let token = token.as_str().trim_end_matches(['.', '-', '_']);
        if !token.is_empty() {
          push(format!("{MODEL_PREFIX}{token}"), token.to_string());
        }
      }
    }
  }

  keys
}
