//! One-shot CLI commands; each prints JSON to stdout

use anyhow::{anyhow, Result};
use ingest::{load_post_by_id, load_posts, query_posts, IngestConfig, PostLoad, PostPage, PostQuery};
use perspective::Summarizer;
use serde::Serialize;
use serde_json::Value;

use crate::server::types::PerspectiveResponse;

/// Filtered page of posts, carrying any ingestion warning.
pub fn posts_page(config: &IngestConfig, query: &PostQuery) -> PostPage {
  let PostLoad { posts, warning } = load_posts(config);
  let mut page = query_posts(&posts, query);
  page.warning = warning;
  page
}

pub fn list_posts(config: &IngestConfig, query: &PostQuery) -> Result<()> {
  print_json(&posts_page(config, query))
}

pub fn show_post(config: &IngestConfig, id: &str) -> Result<()> {
  let lookup = load_post_by_id(config, id);
  match lookup.post {
    Some(post) => print_json(&post),
    None => match lookup.warning {
      Some(warning) => Err(anyhow!("Post {id} not found: {warning}")),
      None => Err(anyhow!("Post {id} not found in {}", config.csv_path.display())),
    },
  }
}

/// Perspective JSON in the same shape the server returns, ingestion warning included.
pub async fn perspective_report(config: &IngestConfig, summarizer: &Summarizer, grouped: bool) -> Result<Value> {
  let PostLoad { posts, warning } = load_posts(config);
  let report = if grouped {
    let perspective = summarizer.build_grouped_ai_perspective(&posts).await;
    serde_json::to_value(PerspectiveResponse { perspective, warning })?
  } else {
    let perspective = summarizer.build_ai_perspective(&posts).await;
    serde_json::to_value(PerspectiveResponse { perspective, warning })?
  };
  Ok(report)
}

pub async fn show_perspective(config: &IngestConfig, summarizer: &Summarizer, grouped: bool) -> Result<()> {
  print_json(&perspective_report(config, summarizer, grouped).await?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
