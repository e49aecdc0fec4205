//! Normalized post records

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Provenance marker stamped on every post loaded from the thread export.
pub const POST_TYPE: &str = "ed_thread";

pub const UNTITLED: &str = "Untitled thread";
pub const ANONYMOUS: &str = "Anonymous";

/// Column names understood by the loader.
pub mod columns {
  pub const THREAD_ID: &str = "thread_id";
  pub const TITLE_CLEAN: &str = "title_clean";
  pub const TITLE_RAW: &str = "title_raw";
  pub const HW_NUMBER: &str = "hw_number";
  pub const MODEL: &str = "model";
  pub const BASE_MODEL: &str = "base_model";
  pub const VERSION: &str = "version";
  pub const NAME: &str = "name";
  pub const TEXT: &str = "text";
  pub const URL: &str = "url";
}

/// One discussion post as consumed by grouping and presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
  pub id: String,
  pub title: String,
  #[serde(default)]
  pub body: String,
  pub author: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(rename = "type")]
  pub kind: String,

  // Source-specific extras, carried through for display and grouping
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub model: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub base_model: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub hw_number: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title_raw: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub thread_id: Option<String>,
}

impl Post {
  /// Build a post with the given id and title and every optional field empty.
  pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      title: title.into(),
      body: String::new(),
      author: ANONYMOUS.to_string(),
      url: None,
      tags: Vec::new(),
      kind: POST_TYPE.to_string(),
      model: None,
      base_model: None,
      version: None,
      hw_number: None,
      name: None,
      title_raw: None,
      thread_id: None,
    }
  }

  pub fn with_body(mut self, body: impl Into<String>) -> Self {
    self.body = body.into();
    self
  }

  /// Append a tag unless the post already carries it.
  pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
    push_unique(&mut self.tags, tag.into());
    self
  }

  pub fn has_tag(&self, tag: &str) -> bool {
    self.tags.iter().any(|t| t == tag)
  }

  /// Value of the first tag with the given `key:` prefix.
  pub fn tag_value(&self, key: &str) -> Option<&str> {
    self.tags.iter().find_map(|tag| {
      tag.strip_prefix(key).and_then(|rest| rest.strip_prefix(':')).map(str::trim).filter(|v| !v.is_empty())
    })
  }

  /// Normalize one header-keyed CSV record.
  pub fn from_record(record: &HashMap<String, String>) -> Self {
    let field = |key: &str| record.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string);

    let thread_id = field(columns::THREAD_ID);
    let title_raw = field(columns::TITLE_RAW);
    let hw_number = field(columns::HW_NUMBER);
    let model = field(columns::MODEL);
    let base_model = field(columns::BASE_MODEL);
    let version = field(columns::VERSION);
    let name = field(columns::NAME);

    let id = thread_id.clone().unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let title = field(columns::TITLE_CLEAN).or_else(|| title_raw.clone()).unwrap_or_else(|| UNTITLED.to_string());

    let mut tags = Vec::new();
    for (key, value) in [("hw", &hw_number), ("model", &model), ("base_model", &base_model), ("version", &version)] {
      if let Some(value) = value {
        push_unique(&mut tags, format!("{key}:{value}"));
      }
    }

    Self {
      id,
      title,
      body: field(columns::TEXT).unwrap_or_default(),
      author: name.clone().unwrap_or_else(|| ANONYMOUS.to_string()),
      url: field(columns::URL),
      tags,
      kind: POST_TYPE.to_string(),
      model,
      base_model,
      version,
      hw_number,
      name,
      title_raw,
      thread_id,
    }
  }
}

fn push_unique(tags: &mut Vec<String>, tag: String) {
  if !tags.contains(&tag) {
    tags.push(tag);
  }
}
