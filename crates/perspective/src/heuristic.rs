//! Local-only summaries built from tag counts and text patterns

use ingest::Post;
use std::collections::HashMap;

use crate::grouping::{group_posts, PostBucket, PostGroups};
use crate::types::{AIPerspective, Cluster, GroupSummary, GroupedAIPerspective, PerspectiveMode, PostTakeaway, NO_MODEL};

pub const NO_POSTS_SUMMARY: &str = "No posts are available yet. Load a thread export to see an overview.";
pub const UNTAGGED: &str = "untagged";
pub const EMPTY_TAKEAWAY: &str = "No description provided.";

/// Most clusters the heuristic overview shows.
pub const MAX_HEURISTIC_CLUSTERS: usize = 4;

/// Posts listed per group, and the sample size sent for remote group summaries.
pub const GROUP_POST_LIMIT: usize = 12;

/// Characters of body text kept for a heuristic takeaway.
pub const TAKEAWAY_CHARS: usize = 120;

const SUMMARY_TAGS: usize = 5;
const OVERVIEW_TAGS: usize = 3;

pub fn build_heuristic_perspective(posts: &[Post], note: Option<&str>) -> AIPerspective {
  let note = note.map(str::trim).filter(|n| !n.is_empty());

  if posts.is_empty() {
    return AIPerspective {
      summary: NO_POSTS_SUMMARY.to_string(),
      clusters: Vec::new(),
      mode: PerspectiveMode::Heuristic,
      model_used: NO_MODEL.to_string(),
      note: note.map(str::to_string),
    };
  }

  let counts = tag_frequency(posts);

  let clusters = counts
    .iter()
    .take(MAX_HEURISTIC_CLUSTERS)
    .map(|(tag, size)| {
      let mut description = format!("{} tagged {tag}.", plural(*size, "thread"));
      if let Some(note) = note {
        description.push(' ');
        description.push_str(note);
      }
      let tags = if tag == UNTAGGED { Vec::new() } else { vec![tag.clone()] };
      Cluster { title: tag.clone(), description, tags, size: *size }
    })
    .collect();

  let top = counts.iter().take(SUMMARY_TAGS).map(|(tag, n)| format!("{tag}: {n}")).collect::<Vec<_>>().join(", ");

  AIPerspective {
    summary: format!("{} detected. Top tags: {top}.", plural(posts.len(), "thread")),
    clusters,
    mode: PerspectiveMode::Heuristic,
    model_used: NO_MODEL.to_string(),
    note: note.map(str::to_string),
  }
}

pub fn build_heuristic_grouped_perspective(posts: &[Post], note: Option<&str>) -> GroupedAIPerspective {
  heuristic_grouped_from(&group_posts(posts), note)
}

/// Heuristic grouped perspective over buckets the caller already built.
pub fn heuristic_grouped_from(groups: &PostGroups, note: Option<&str>) -> GroupedAIPerspective {
  let mut homework: Vec<&PostBucket> = groups.homework.values().collect();
  homework.sort_by(|a, b| {
    a.homework_number().unwrap_or(u64::MAX).cmp(&b.homework_number().unwrap_or(u64::MAX)).then_with(|| a.key.cmp(&b.key))
  });

  let mut models: Vec<&PostBucket> = groups.models.values().collect();
  models.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.key.cmp(&b.key)));

  GroupedAIPerspective {
    homework_groups: homework.into_iter().map(heuristic_group_summary).collect(),
    model_groups: models.into_iter().map(heuristic_group_summary).collect(),
    mode: PerspectiveMode::Heuristic,
    model_used: NO_MODEL.to_string(),
    note: note.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string),
  }
}

/// Templated summary for one bucket
pub fn heuristic_group_summary(bucket: &PostBucket) -> GroupSummary {
  GroupSummary {
    key: bucket.key.clone(),
    label: bucket.label.clone(),
    count: bucket.len(),
    overview: heuristic_overview(bucket),
    posts: bucket.posts.iter().take(GROUP_POST_LIMIT).map(heuristic_takeaway).collect(),
    mode: PerspectiveMode::Heuristic,
  }
}

pub fn heuristic_overview(bucket: &PostBucket) -> String {
  let verb = if bucket.len() == 1 { "references" } else { "reference" };
  let mut overview = format!("{} {verb} {}.", plural(bucket.len(), "thread"), bucket.label);

  let related: Vec<String> = tag_frequency(&bucket.posts)
    .into_iter()
    .filter(|(tag, _)| tag != UNTAGGED && *tag != bucket.key && !tag.starts_with("base_model:"))
    .take(OVERVIEW_TAGS)
    .map(|(tag, _)| tag)
    .collect();
  if !related.is_empty() {
    overview.push_str(&format!(" Frequent tags: {}.", related.join(", ")));
  }

  if let Some(first) = bucket.posts.first() {
    overview.push_str(&format!(" Example thread: \"{}\".", first.title));
  }
  overview
}

pub fn heuristic_takeaway(post: &Post) -> PostTakeaway {
  PostTakeaway { id: post.id.clone(), title: post.title.clone(), takeaway: body_takeaway(&post.body) }
}

/// First [`TAKEAWAY_CHARS`] characters of the body with whitespace collapsed.
pub fn body_takeaway(body: &str) -> String {
  let collapsed = collapse_whitespace(body);
  if collapsed.is_empty() {
    return EMPTY_TAKEAWAY.to_string();
  }
  truncate_chars(&collapsed, TAKEAWAY_CHARS)
}

/// Cut to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate_chars(text: &str, max: usize) -> String {
  if text.chars().count() <= max {
    return text.to_string();
  }
  let cut: String = text.chars().take(max).collect();
  format!("{}…", cut.trim_end())
}

pub fn collapse_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tag counts, most frequent first; posts without tags count as [`UNTAGGED`].
fn tag_frequency(posts: &[Post]) -> Vec<(String, usize)> {
  let mut counts: HashMap<&str, usize> = HashMap::new();
  for post in posts {
    if post.tags.is_empty() {
      *counts.entry(UNTAGGED).or_default() += 1;
    }
    for tag in &post.tags {
      *counts.entry(tag.as_str()).or_default() += 1;
    }
  }

  let mut counts: Vec<(String, usize)> = counts.into_iter().map(|(tag, n)| (tag.to_string(), n)).collect();
  counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
  counts
}

fn plural(n: usize, noun: &str) -> String {
  if n == 1 {
    format!("1 {noun}")
  } else {
    format!("{n} {noun}s")
  }
}
