//! REST API response types

use ingest::Post;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Base Response Structure
// ======================

/// Envelope shared by every endpoint
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<T> {
  pub versioning: VersionInfo,

  /// Transaction ID for logging correlation
  pub transaction_id: Uuid,

  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,

  #[serde(flatten)]
  pub data: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionInfo {
  pub latest: String,
  pub resolved: String,
}

/// API error information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
  /// Error key, unique to the error source
  pub key: String,

  /// Human readable error message
  pub message: String,
}

impl<T> BaseResponse<T> {
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    Self { versioning: VersionInfo::current(), transaction_id, errors: Vec::new(), data }
  }

  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> BaseResponse<()> {
    BaseResponse { versioning: VersionInfo::current(), transaction_id, errors, data: () }
  }
}

impl VersionInfo {
  fn current() -> Self {
    let version = env!("CARGO_PKG_VERSION");
    Self { latest: version.to_string(), resolved: version.to_string() }
  }
}

impl ApiError {
  pub fn new(key: &str, message: &str) -> Self {
    Self { key: key.to_string(), message: message.to_string() }
  }
}

pub const CSV_UNAVAILABLE: &str = "csv_unavailable";
pub const POST_NOT_FOUND: &str = "post_not_found";

// Status Endpoint
// ===============

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
  pub status: String,
  pub version: String,
  pub csv_path: String,
  /// Whether perspectives can use the remote model
  pub remote_summaries: bool,
  pub model: String,
}

// Post Endpoints
// ==============

#[derive(Debug, Serialize, Deserialize)]
pub struct PostResponse {
  pub post: Post,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
  pub tag: String,
  pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TagsResponse {
  pub tags: Vec<TagCount>,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub warning: Option<String>,
}

// Perspective Endpoints
// =====================

/// A perspective plus the ingestion warning of the posts it was built from
#[derive(Debug, Serialize, Deserialize)]
pub struct PerspectiveResponse<T> {
  #[serde(flatten)]
  pub perspective: T,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub warning: Option<String>,
}
