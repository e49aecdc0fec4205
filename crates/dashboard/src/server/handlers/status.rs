//! Health endpoint handler

use axum::{extract::State, response::Json, Extension};

use crate::server::middleware::RequestContext;
use crate::server::state::AppState;
use crate::server::types::{BaseResponse, StatusResponse};

/// GET /status - Health check endpoint
pub async fn status(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
) -> Json<BaseResponse<StatusResponse>> {
  let response = StatusResponse {
    status: "healthy".to_string(),
    version: env!("CARGO_PKG_VERSION").to_string(),
    csv_path: state.ingest.csv_path.to_string_lossy().to_string(),
    remote_summaries: state.summarizer.remote_enabled(),
    model: state.summarizer.config().model.clone(),
  };

  Json(BaseResponse::success(response, context.request_id))
}
