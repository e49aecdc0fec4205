//! Loading posts from the configured CSV export
//!
//! Loading never fails outward: read and parse problems become a warning
//! string next to an empty post list so callers can always render something.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::IngestConfig;
use crate::csv::{parse_csv, Row};
use crate::post::Post;

#[derive(Error, Debug)]
pub enum IngestError {
  #[error("Failed to read posts file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Posts file {path} is empty")]
  Empty { path: PathBuf },
}

impl IngestError {
  pub fn read(path: &Path, source: std::io::Error) -> Self {
    Self::Read { path: path.to_path_buf(), source }
  }

  pub fn empty(path: &Path) -> Self {
    Self::Empty { path: path.to_path_buf() }
  }
}

/// Result of loading every post
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostLoad {
  pub posts: Vec<Post>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub warning: Option<String>,
}

/// Result of looking up a single post
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostLookup {
  pub post: Option<Post>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub warning: Option<String>,
}

pub fn load_posts(config: &IngestConfig) -> PostLoad {
  match try_load_posts(&config.csv_path) {
    Ok(posts) => {
      tracing::debug!("Loaded {} posts from {}", posts.len(), config.csv_path.display());
      PostLoad { posts, warning: None }
    }
    Err(e) => {
      tracing::warn!("{e}");
      PostLoad { posts: Vec::new(), warning: Some(e.to_string()) }
    }
  }
}

/// Load everything and scan for a post with exactly this id.
pub fn load_post_by_id(config: &IngestConfig, id: &str) -> PostLookup {
  let PostLoad { posts, warning } = load_posts(config);
  let post = posts.into_iter().find(|post| post.id == id);
  PostLookup { post, warning }
}

fn try_load_posts(path: &Path) -> Result<Vec<Post>, IngestError> {
  let bytes = fs::read(path).map_err(|e| IngestError::read(path, e))?;
  let text = String::from_utf8(bytes)
    .map_err(|e| IngestError::read(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
  posts_from_csv(&text).ok_or_else(|| IngestError::empty(path))
}

/// Turn CSV text into deduplicated posts. `None` when there is not even a header row.
pub fn posts_from_csv(text: &str) -> Option<Vec<Post>> {
  let mut rows = parse_csv(text.strip_prefix('\u{feff}').unwrap_or(text)).into_iter();
  let header: Vec<String> = rows.next()?.into_iter().map(|name| name.trim().to_string()).collect();

  let posts = rows.map(|row| Post::from_record(&to_record(&header, row)));
  Some(dedupe_by_id(posts))
}

fn to_record(header: &[String], row: Row) -> HashMap<String, String> {
  header.iter().cloned().zip(row).collect()
}

/// Keep the first post seen for every id, preserving order.
pub fn dedupe_by_id(posts: impl IntoIterator<Item = Post>) -> Vec<Post> {
  let mut seen = HashSet::new();
  posts.into_iter().filter(|post| seen.insert(post.id.clone())).collect()
}
