//! Ingestion settings

use std::env;
use std::path::PathBuf;

/// Environment variable that overrides the CSV location.
pub const CSV_PATH_ENV: &str = "THREADLENS_CSV";

/// CSV file read when nothing else is configured, relative to the working directory.
pub const DEFAULT_CSV_PATH: &str = "posts.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
  pub csv_path: PathBuf,
}

impl Default for IngestConfig {
  fn default() -> Self {
    Self { csv_path: PathBuf::from(DEFAULT_CSV_PATH) }
  }
}

impl IngestConfig {
  pub fn new(csv_path: impl Into<PathBuf>) -> Self {
    Self { csv_path: csv_path.into() }
  }

  /// Resolve the CSV path from `THREADLENS_CSV`, falling back to the default.
  pub fn from_env() -> Self {
    match env::var(CSV_PATH_ENV) {
      Ok(path) if !path.trim().is_empty() => Self::new(path.trim()),
      _ => Self::default(),
    }
  }
}
