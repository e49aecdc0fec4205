#[cfg(test)]
mod openai_client_tests {
  use mockito::Matcher;
  use perspective::{
    complete_with_retry, ChatClient, ChatError, ChatMessage, ChatRequest, LruSummaryCache, OpenAiClient,
    PerspectiveMode, RetryPolicy, Summarizer, SummarizerConfig,
  };
  use ingest::Post;
  use serde_json::json;
  use std::sync::Arc;
  use std::time::Duration;

  fn request() -> ChatRequest {
    ChatRequest {
      model: "gpt-4o-mini".to_string(),
      messages: vec![ChatMessage::system("You summarize."), ChatMessage::user("Summarize this.")],
      temperature: 0.2,
    }
  }

  fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
      max_attempts,
      base_delay: Duration::from_millis(1),
      max_delay: Duration::from_millis(5),
      jitter: Duration::ZERO,
    }
  }

  fn completion_body(content: &str) -> String {
    json!({
      "model": "gpt-4o-mini-2024-07-18",
      "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
    .to_string()
  }

  #[tokio::test]
  async fn test_successful_completion() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/chat/completions")
      .match_header("authorization", "Bearer sk-test")
      .match_body(Matcher::PartialJson(json!({"model": "gpt-4o-mini"})))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(completion_body("Hello there"))
      .create_async()
      .await;

    let client = OpenAiClient::new(server.url(), "sk-test").unwrap();
    let completion = client.complete(&request()).await.unwrap();

    assert_eq!(completion.content, "Hello there");
    assert_eq!(completion.model, "gpt-4o-mini-2024-07-18");
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_trailing_slash_in_base_url() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/chat/completions")
      .with_status(200)
      .with_body(completion_body("ok"))
      .create_async()
      .await;

    let client = OpenAiClient::new(format!("{}/", server.url()), "sk-test").unwrap();
    assert!(client.complete(&request()).await.is_ok());
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_rate_limit_reports_retry_after() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/chat/completions")
      .with_status(429)
      .with_header("retry-after", "1.5")
      .with_body("slow down")
      .create_async()
      .await;

    let client = OpenAiClient::new(server.url(), "sk-test").unwrap();
    let err = client.complete(&request()).await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(err.retry_after(), Some(Duration::from_millis(1500)));
    assert!(matches!(err, ChatError::Status { status: 429, .. }));
  }

  #[tokio::test]
  async fn test_huge_retry_after_is_capped_not_fatal() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/chat/completions")
      .with_status(429)
      .with_header("retry-after", "1e30")
      .with_body("slow down")
      .create_async()
      .await;

    let client = OpenAiClient::new(server.url(), "sk-test").unwrap();
    let err = client.complete(&request()).await.unwrap_err();

    assert_eq!(err.retry_after(), Some(Duration::MAX));
    assert_eq!(fast_policy(2).delay_for(1, err.retry_after()), Duration::from_millis(5));
  }

  #[tokio::test]
  async fn test_server_errors_are_retried_until_exhausted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/chat/completions")
      .with_status(503)
      .with_header("retry-after", "0")
      .with_body("unavailable")
      .expect(3)
      .create_async()
      .await;

    let client = OpenAiClient::new(server.url(), "sk-test").unwrap();
    let err = complete_with_retry(&client, &request(), &fast_policy(3)).await.unwrap_err();

    assert!(matches!(err, ChatError::Status { status: 503, .. }));
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_client_errors_are_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/chat/completions")
      .with_status(400)
      .with_body("bad request")
      .expect(1)
      .create_async()
      .await;

    let client = OpenAiClient::new(server.url(), "sk-test").unwrap();
    let err = complete_with_retry(&client, &request(), &fast_policy(5)).await.unwrap_err();

    assert_eq!(err, ChatError::status(400, None, "bad request"));
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_missing_content_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/chat/completions")
      .with_status(200)
      .with_body(json!({"model": "gpt-4o-mini", "choices": []}).to_string())
      .create_async()
      .await;

    let client = OpenAiClient::new(server.url(), "sk-test").unwrap();
    assert_eq!(client.complete(&request()).await.unwrap_err(), ChatError::MissingContent);
  }

  #[tokio::test]
  async fn test_undecodable_body_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server.mock("POST", "/chat/completions").with_status(200).with_body("<html>").create_async().await;

    let client = OpenAiClient::new(server.url(), "sk-test").unwrap();
    let err = client.complete(&request()).await.unwrap_err();
    assert!(matches!(err, ChatError::InvalidResponse { .. }));
  }

  #[tokio::test]
  async fn test_summarizer_against_http_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/chat/completions")
      .with_status(200)
      .with_body(completion_body("Summary: Mostly grading questions.\nRegrades - Requests for regrading (2 items)"))
      .expect(1)
      .create_async()
      .await;

    let config = SummarizerConfig { base_url: server.url(), ..SummarizerConfig::default().with_api_key("sk-test") };
    let summarizer = Summarizer::new(config, Arc::new(LruSummaryCache::default()));
    let posts = vec![Post::new("1", "Regrade hw1"), Post::new("2", "Regrade hw2")];

    let first = summarizer.build_ai_perspective(&posts).await;
    let second = summarizer.build_ai_perspective(&posts).await;

    assert_eq!(first.mode, PerspectiveMode::Llm);
    assert_eq!(first.summary, "Mostly grading questions.");
    assert_eq!(first.clusters[0].size, 2);
    assert_eq!(first, second);
    mock.assert_async().await;
  }
}
