//! Shared handler state

use ingest::{load_post_by_id, load_posts, IngestConfig, PostLoad, PostLookup};
use perspective::Summarizer;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub ingest: IngestConfig,
  pub summarizer: Arc<Summarizer>,
}

impl AppState {
  pub fn new(ingest: IngestConfig, summarizer: Summarizer) -> Self {
    Self { ingest, summarizer: Arc::new(summarizer) }
  }

  /// Read the CSV on the blocking pool; every request sees the file as it is now.
  pub async fn load_posts(&self) -> PostLoad {
    let config = self.ingest.clone();
    match tokio::task::spawn_blocking(move || load_posts(&config)).await {
      Ok(load) => load,
      Err(e) => {
        tracing::error!("Post loading task failed: {e}");
        PostLoad { posts: Vec::new(), warning: Some(format!("Failed to load posts: {e}")) }
      }
    }
  }

  pub async fn find_post(&self, id: String) -> PostLookup {
    let config = self.ingest.clone();
    match tokio::task::spawn_blocking(move || load_post_by_id(&config, &id)).await {
      Ok(lookup) => lookup,
      Err(e) => {
        tracing::error!("Post lookup task failed: {e}");
        PostLookup { post: None, warning: Some(format!("Failed to load posts: {e}")) }
      }
    }
  }
}
