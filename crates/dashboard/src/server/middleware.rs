//! Per-request context injected into every handler

use axum::{
  extract::Request,
  http::{Method, Uri},
  middleware::Next,
  response::Response,
};
use std::time::Instant;
use uuid::Uuid;

/// Request metadata; `request_id` doubles as the response transaction id
#[derive(Debug, Clone)]
pub struct RequestContext {
  pub request_id: Uuid,
  pub method: Method,
  pub uri: Uri,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri) -> Self {
    Self { request_id: Uuid::new_v4(), method, uri }
  }
}

pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
  let context = RequestContext::new(request.method().clone(), request.uri().clone());
  let start_time = Instant::now();
  tracing::debug!("[{}] {} {} - Request started", context.request_id, context.method, context.uri.path());

  request.extensions_mut().insert(context.clone());
  let response = next.run(request).await;

  tracing::info!(
    "[{}] {} {} - {} in {:.2}ms",
    context.request_id,
    context.method,
    context.uri.path(),
    response.status().as_u16(),
    start_time.elapsed().as_secs_f64() * 1000.0
  );
  response
}
