//! Filtering and pagination over loaded posts

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::post::Post;

pub const DEFAULT_PER_PAGE: usize = 20;
pub const MAX_PER_PAGE: usize = 100;

/// List view options; every filter is optional and filters are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostQuery {
  /// Exact tag to match, e.g. `hw:3`
  #[serde(default)]
  pub tag: Option<String>,

  /// Case-insensitive text matched against title, body and author
  #[serde(default)]
  pub search: Option<String>,

  /// 1-based page number
  #[serde(default)]
  pub page: Option<usize>,

  #[serde(default)]
  pub per_page: Option<usize>,
}

/// One page of the filtered post list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
  pub posts: Vec<Post>,
  pub page: usize,
  pub per_page: usize,
  pub total: usize,
  pub total_pages: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub warning: Option<String>,
}

impl PostQuery {
  pub fn matches(&self, post: &Post) -> bool {
    let tag_ok = self.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()).map_or(true, |tag| post.has_tag(tag));

    let search_ok = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()).map_or(true, |needle| {
      let needle = needle.to_lowercase();
      [&post.title, &post.body, &post.author].iter().any(|field| field.to_lowercase().contains(&needle))
    });

    tag_ok && search_ok
  }

  fn resolved_page(&self) -> usize {
    self.page.unwrap_or(1).max(1)
  }

  fn resolved_per_page(&self) -> usize {
    self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
  }
}

pub fn query_posts(posts: &[Post], query: &PostQuery) -> PostPage {
  let matching: Vec<&Post> = posts.iter().filter(|post| query.matches(post)).collect();
  let page = query.resolved_page();
  let per_page = query.resolved_per_page();
  let total = matching.len();

  let posts = matching.into_iter().skip((page - 1).saturating_mul(per_page)).take(per_page).cloned().collect();

  PostPage { posts, page, per_page, total, total_pages: total.div_ceil(per_page), warning: None }
}

/// Count tags across posts, most frequent first (ties alphabetical).
pub fn tag_counts(posts: &[Post]) -> Vec<(String, usize)> {
  let mut counts: HashMap<&str, usize> = HashMap::new();
  for tag in posts.iter().flat_map(|post| post.tags.iter()) {
    *counts.entry(tag.as_str()).or_default() += 1;
  }

  let mut counts: Vec<(String, usize)> = counts.into_iter().map(|(tag, n)| (tag.to_string(), n)).collect();
  counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
  counts
}
