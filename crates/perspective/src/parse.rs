//! Tolerant parsing of free-form model output
//!
//! Nothing here fails: unusable output degrades to a fallback value and the
//! caller patches the gaps with heuristic content.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::types::Cluster;

/// Most clusters kept from a model reply.
pub const MAX_LLM_CLUSTERS: usize = 5;

pub const FALLBACK_CLUSTER_TITLE: &str = "General discussion";

// "Title - description (3 items)", optionally bulleted or numbered
static CLUSTER_LINE: Lazy<Option<Regex>> = Lazy::new(|| {
  Regex::new(
    r"^\s*(?:[-*•]\s+|\d+[.)]\s+)?(?P<title>.+?)\s+[-–—]\s+(?P<desc>.+?)\s*\(\s*(?P<n>\d+)\s*(?:items?|threads?|posts?)?\s*\)\s*\.?\s*$",
  )
  .ok()
});

static SUMMARY_LINE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)^\s*\**summary\**\s*:\s*(?P<rest>.*)$").ok());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedClusters {
  Clusters(Vec<Cluster>),
  Fallback(Cluster),
}

impl ParsedClusters {
  pub fn into_clusters(self) -> Vec<Cluster> {
    match self {
      ParsedClusters::Clusters(clusters) => clusters,
      ParsedClusters::Fallback(cluster) => vec![cluster],
    }
  }

  pub fn is_fallback(&self) -> bool {
    matches!(self, ParsedClusters::Fallback(_))
  }
}

/// Summary text plus whatever clusters could be read from an overview reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOverview {
  pub summary: String,
  pub clusters: ParsedClusters,
}

/// Read a `Summary:` line and `Title - description (N items)` lines.
///
/// `post_count` sizes the fallback cluster when no cluster line parses.
pub fn parse_overview(text: &str, post_count: usize) -> ParsedOverview {
  let mut summary: Option<String> = None;
  let mut loose_lines: Vec<&str> = Vec::new();
  let mut clusters: Vec<Cluster> = Vec::new();

  for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
    if let Some(rest) = SUMMARY_LINE.as_ref().and_then(|re| re.captures(line)).and_then(|caps| caps.name("rest")) {
      let rest = rest.as_str().trim();
      if summary.is_none() && !rest.is_empty() {
        summary = Some(rest.to_string());
      }
      continue;
    }

    if let Some(cluster) = parse_cluster_line(line) {
      if clusters.len() < MAX_LLM_CLUSTERS {
        clusters.push(cluster);
      }
      continue;
    }

    if !line.ends_with(':') {
      loose_lines.push(line);
    }
  }

  let summary = summary.or_else(|| loose_lines.first().map(|line| line.trim_start_matches(['#', '*', ' ']).to_string())).unwrap_or_default();

  let clusters = if clusters.is_empty() {
    let description =
      if summary.is_empty() { "The model reply did not list distinct themes.".to_string() } else { summary.clone() };
    ParsedClusters::Fallback(Cluster {
      title: FALLBACK_CLUSTER_TITLE.to_string(),
      description,
      tags: Vec::new(),
      size: post_count,
    })
  } else {
    ParsedClusters::Clusters(clusters)
  };

  ParsedOverview { summary, clusters }
}

fn parse_cluster_line(line: &str) -> Option<Cluster> {
  let caps = CLUSTER_LINE.as_ref()?.captures(line)?;
  let title = caps.name("title")?.as_str().trim().trim_matches(['*', '_', '"']).trim();
  let description = caps.name("desc")?.as_str().trim();
  let size = caps.name("n")?.as_str().parse().ok()?;

  if title.is_empty() || description.is_empty() {
    return None;
  }
  Some(Cluster { title: title.to_string(), description: description.to_string(), tags: Vec::new(), size })
}

/// First balanced `{...}` span, skipping braces inside JSON strings.
pub fn extract_json_object(text: &str) -> Option<&str> {
  let start = text.find('{')?;
  let mut depth = 0usize;
  let mut in_string = false;
  let mut escaped = false;

  for (offset, c) in text[start..].char_indices() {
    if in_string {
      match c {
        _ if escaped => escaped = false,
        '\\' => escaped = true,
        '"' => in_string = false,
        _ => {}
      }
      continue;
    }

    match c {
      '"' => in_string = true,
      '{' => depth += 1,
      '}' => {
        depth -= 1;
        if depth == 0 {
          return Some(&text[start..start + offset + c.len_utf8()]);
        }
      }
      _ => {}
    }
  }
  None
}

/// JSON payload requested for a group summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GroupReply {
  #[serde(default)]
  pub overview: String,
  #[serde(default)]
  pub posts: Vec<ReplyPost>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplyPost {
  #[serde(default, deserialize_with = "lenient_string")]
  pub id: String,
  #[serde(default, deserialize_with = "lenient_string")]
  pub title: String,
  #[serde(default, deserialize_with = "lenient_string")]
  pub takeaway: String,
}

/// Decode the first JSON object in a group reply, if there is a usable one.
pub fn parse_group_reply(text: &str) -> Option<GroupReply> {
  let json = extract_json_object(text)?;
  match serde_json::from_str::<GroupReply>(json) {
    Ok(reply) => Some(reply),
    Err(e) => {
      tracing::debug!("Group reply was not valid JSON: {e}");
      None
    }
  }
}

// Models sometimes emit ids as numbers or nulls
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  Ok(match serde_json::Value::deserialize(deserializer)? {
    serde_json::Value::String(s) => s,
    serde_json::Value::Number(n) => n.to_string(),
    serde_json::Value::Bool(b) => b.to_string(),
    _ => String::new(),
  })
}
