//! Perspective types handed to the presentation layer

use serde::{Deserialize, Serialize};

/// Where a summary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerspectiveMode {
  Heuristic,
  Llm,
}

impl std::fmt::Display for PerspectiveMode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PerspectiveMode::Heuristic => write!(f, "heuristic"),
      PerspectiveMode::Llm => write!(f, "llm"),
    }
  }
}

/// `modelUsed` value for results that never touched a remote model.
pub const NO_MODEL: &str = "none";

/// A themed slice of posts shown in the ungrouped overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
  pub title: String,
  pub description: String,
  #[serde(default)]
  pub tags: Vec<String>,
  pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AIPerspective {
  pub summary: String,
  pub clusters: Vec<Cluster>,
  pub mode: PerspectiveMode,
  pub model_used: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note: Option<String>,
}

/// One line of a group listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTakeaway {
  pub id: String,
  pub title: String,
  pub takeaway: String,
}

/// Summary of one homework or model bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
  pub key: String,
  pub label: String,
  pub count: usize,
  pub overview: String,
  pub posts: Vec<PostTakeaway>,
  pub mode: PerspectiveMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedAIPerspective {
  pub homework_groups: Vec<GroupSummary>,
  pub model_groups: Vec<GroupSummary>,
  pub mode: PerspectiveMode,
  pub model_used: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note: Option<String>,
}

impl GroupedAIPerspective {
  pub fn groups(&self) -> impl Iterator<Item = &GroupSummary> {
    self.homework_groups.iter().chain(self.model_groups.iter())
  }
}
