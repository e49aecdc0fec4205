#[cfg(test)]
mod api_tests {
  use async_trait::async_trait;
  use axum::body::{to_bytes, Body};
  use axum::http::{Request, StatusCode};
  use axum::Router;
  use dashboard::server::{routing::create_router, state::AppState};
  use ingest::IngestConfig;
  use perspective::{
    ChatClient, ChatCompletion, ChatError, ChatRequest, LruSummaryCache, Summarizer, SummarizerConfig,
  };
  use serde_json::Value;
  use std::fs;
  use std::path::Path;
  use std::sync::Arc;
  use tempfile::TempDir;
  use tower::ServiceExt;

  const CSV: &str = "\u{feff}thread_id,title_clean,title_raw,hw_number,model,base_model,version,name,text,url\n\
    101,Attention NaNs,,1,,,,Ada,\"Softmax overflows, see gpt-4o output\",https://forum.example/101\n\
    102,Tokenizer mismatch,,1,,,,Grace,gpt-4o splits differently,\n\
    103,,Regrade request,2,,,,,\"Line one\nline two\",\n";

  fn write_csv(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("posts.csv");
    fs::write(&path, CSV).unwrap();
    path
  }

  fn heuristic_app(csv: &Path) -> Router {
    let summarizer = Summarizer::new(SummarizerConfig::default(), Arc::new(LruSummaryCache::default()));
    create_router(AppState::new(IngestConfig::new(csv), summarizer))
  }

  async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn test_status() {
    let temp = TempDir::new().unwrap();
    let csv = write_csv(&temp);
    let (status, json) = get(heuristic_app(&csv), "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["remoteSummaries"], false);
    assert_eq!(json["model"], "gpt-4o-mini");
    assert!(json["transactionId"].is_string());
    assert!(json.get("errors").is_none());
  }

  #[tokio::test]
  async fn test_list_posts_with_filters() {
    let temp = TempDir::new().unwrap();
    let csv = write_csv(&temp);

    let (status, json) = get(heuristic_app(&csv), "/posts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 3);
    assert_eq!(json["posts"][0]["id"], "101");
    assert_eq!(json["posts"][0]["type"], "ed_thread");
    assert_eq!(json["posts"][2]["title"], "Regrade request");
    assert!(json.get("warning").is_none());

    let (_, json) = get(heuristic_app(&csv), "/posts?tag=hw:1&perPage=1&page=2").await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["totalPages"], 2);
    assert_eq!(json["posts"].as_array().unwrap().len(), 1);
    assert_eq!(json["posts"][0]["id"], "102");

    let (_, json) = get(heuristic_app(&csv), "/posts?search=SOFTMAX").await;
    assert_eq!(json["total"], 1);
  }

  #[tokio::test]
  async fn test_missing_csv_is_a_warning_not_an_error() {
    let temp = TempDir::new().unwrap();
    let (status, json) = get(heuristic_app(&temp.path().join("absent.csv")), "/posts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 0);
    assert!(json["warning"].as_str().unwrap().contains("absent.csv"));
  }

  #[tokio::test]
  async fn test_get_post() {
    let temp = TempDir::new().unwrap();
    let csv = write_csv(&temp);

    let (status, json) = get(heuristic_app(&csv), "/posts/103").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["post"]["body"], "Line one\nline two");
    assert_eq!(json["post"]["author"], "Anonymous");

    let (status, json) = get(heuristic_app(&csv), "/posts/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["errors"][0]["key"], "post_not_found");
  }

  #[tokio::test]
  async fn test_tags() {
    let temp = TempDir::new().unwrap();
    let csv = write_csv(&temp);
    let (_, json) = get(heuristic_app(&csv), "/tags").await;

    assert_eq!(json["tags"][0]["tag"], "hw:1");
    assert_eq!(json["tags"][0]["count"], 2);
    assert_eq!(json["tags"][1]["tag"], "hw:2");
  }

  #[tokio::test]
  async fn test_heuristic_perspectives() {
    let temp = TempDir::new().unwrap();
    let csv = write_csv(&temp);

    let (status, json) = get(heuristic_app(&csv), "/perspective").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mode"], "heuristic");
    assert_eq!(json["modelUsed"], "none");
    assert!(json["summary"].as_str().unwrap().starts_with("3 threads detected."));

    let (_, json) = get(heuristic_app(&csv), "/perspective/grouped").await;
    assert_eq!(json["homeworkGroups"][0]["key"], "hw:1");
    assert_eq!(json["homeworkGroups"][0]["count"], 2);
    assert_eq!(json["homeworkGroups"][1]["key"], "hw:2");
    assert_eq!(json["modelGroups"][0]["key"], "model:gpt-4o");
  }

  struct FixedReply;

  #[async_trait]
  impl ChatClient for FixedReply {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, ChatError> {
      Ok(ChatCompletion {
        content: "Summary: Attention and grading.\nAttention - Numerical issues (2 items)".to_string(),
        model: request.model.clone(),
      })
    }
  }

  #[tokio::test]
  async fn test_llm_perspective() {
    let temp = TempDir::new().unwrap();
    let csv = write_csv(&temp);
    let summarizer = Summarizer::with_client(
      SummarizerConfig::default(),
      Arc::new(FixedReply),
      Arc::new(LruSummaryCache::default()),
    );
    let app = create_router(AppState::new(IngestConfig::new(&csv), summarizer));

    let (_, json) = get(app, "/perspective").await;
    assert_eq!(json["mode"], "llm");
    assert_eq!(json["modelUsed"], "gpt-4o-mini");
    assert_eq!(json["summary"], "Attention and grading.");
    assert_eq!(json["clusters"][0]["size"], 2);
  }
}
