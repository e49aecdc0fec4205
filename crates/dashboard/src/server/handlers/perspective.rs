//! Summary handlers; these never fail, falling back to heuristic content

use axum::{extract::State, response::Json, Extension};
use ingest::PostLoad;
use perspective::{AIPerspective, GroupedAIPerspective};

use crate::server::middleware::RequestContext;
use crate::server::state::AppState;
use crate::server::types::{BaseResponse, PerspectiveResponse};

/// GET /perspective - Overview with themed clusters
pub async fn overview(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
) -> Json<BaseResponse<PerspectiveResponse<AIPerspective>>> {
  let PostLoad { posts, warning } = state.load_posts().await;
  let perspective = state.summarizer.build_ai_perspective(&posts).await;

  Json(BaseResponse::success(PerspectiveResponse { perspective, warning }, context.request_id))
}

/// GET /perspective/grouped - Homework and model groups
pub async fn grouped(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
) -> Json<BaseResponse<PerspectiveResponse<GroupedAIPerspective>>> {
  let PostLoad { posts, warning } = state.load_posts().await;
  let perspective = state.summarizer.build_grouped_ai_perspective(&posts).await;

  Json(BaseResponse::success(PerspectiveResponse { perspective, warning }, context.request_id))
}
