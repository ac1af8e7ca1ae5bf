//! Content Handlers
//!
//! Wellness site posts and discounts. Upstream failures show up as empty
//! lists rather than errors.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::AppState;
use crate::content::Post;
use crate::error::{GatewayError, Result};
use crate::models::{DiscountsResponse, PostsResponse};

/// Handler for GET /api/content/posts
pub async fn posts_handler(State(state): State<AppState>) -> Json<PostsResponse> {
    Json(PostsResponse {
        posts: state.content.posts().await,
    })
}

/// Handler for GET /api/content/posts/:slug
pub async fn post_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Post>> {
    state
        .content
        .post_by_slug(&slug)
        .await
        .map(Json)
        .ok_or_else(|| GatewayError::NotFound("Post not found".to_string()))
}

/// Handler for GET /api/content/discounts
pub async fn discounts_handler(State(state): State<AppState>) -> Json<DiscountsResponse> {
    Json(DiscountsResponse {
        discounts: state.content.discounts().await,
    })
}
