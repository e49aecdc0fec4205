//! Post browsing handlers

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::Json,
  Extension,
};
use ingest::{query_posts, tag_counts, PostLoad, PostLookup, PostPage, PostQuery};

use crate::server::middleware::RequestContext;
use crate::server::state::AppState;
use crate::server::types::{
  ApiError, BaseResponse, PostResponse, TagCount, TagsResponse, CSV_UNAVAILABLE, POST_NOT_FOUND,
};

/// GET /posts - Filtered, paginated post list
pub async fn list_posts(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Query(query): Query<PostQuery>,
) -> Json<BaseResponse<PostPage>> {
  let PostLoad { posts, warning } = state.load_posts().await;
  let mut page = query_posts(&posts, &query);
  page.warning = warning;

  Json(BaseResponse::success(page, context.request_id))
}

/// GET /posts/{id} - A single post
pub async fn get_post(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Path(id): Path<String>,
) -> Result<Json<BaseResponse<PostResponse>>, (StatusCode, Json<BaseResponse<()>>)> {
  let PostLookup { post, warning } = state.find_post(id.clone()).await;

  match post {
    Some(post) => Ok(Json(BaseResponse::success(PostResponse { post, warning }, context.request_id))),
    None => {
      let mut errors = vec![ApiError::new(POST_NOT_FOUND, &format!("No post with id {id}"))];
      if let Some(warning) = warning {
        errors.push(ApiError::new(CSV_UNAVAILABLE, &warning));
      }
      Err((StatusCode::NOT_FOUND, Json(BaseResponse::<()>::error(errors, context.request_id))))
    }
  }
}

/// GET /tags - Tag counts, most frequent first
pub async fn list_tags(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
) -> Json<BaseResponse<TagsResponse>> {
  let PostLoad { posts, warning } = state.load_posts().await;
  let tags = tag_counts(&posts).into_iter().map(|(tag, count)| TagCount { tag, count }).collect();

  Json(BaseResponse::success(TagsResponse { tags, warning }, context.request_id))
}
