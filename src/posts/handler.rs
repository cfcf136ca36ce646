use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::jwt,
    engine::{
        aggregate::{self, SortMode},
        toggle, EngineError, LikeState,
    },
    error::AppError,
    posts::{CreatePost, LikeActionResponse, PostFilter},
    response::ApiResponse,
    store::{self, Store},
};

/// POST /api/posts
pub async fn create_post(
    State(store): State<Store>,
    claims: jwt::Claims,
    Json(payload): Json<CreatePost>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let author = store
        .run(store::users::find_by_id(store.pool(), claims.sub))
        .await?
        .ok_or(AppError::Unauthorized)?;

    let post = store
        .run(store::posts::insert(
            store.pool(),
            &payload.title,
            &payload.content,
            &author.username,
            Utc::now(),
        ))
        .await?;

    tracing::info!(post_id = %post.id, author = %author.username, "post created");

    Ok(ApiResponse::success(post).created())
}

/// GET /api/posts?sort=latest|oldest|likes
pub async fn get_feed(
    State(store): State<Store>,
    Query(filter): Query<PostFilter>,
) -> Result<impl IntoResponse, AppError> {
    let mode = SortMode::from_param(filter.sort.as_deref());
    let posts = aggregate::list_posts(&store, mode).await?;

    Ok(ApiResponse::success(posts))
}

/// GET /api/posts/:id
pub async fn get_post(
    State(store): State<Store>,
    claims: Option<jwt::Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let post = store
        .run(store::posts::find_by_id(store.pool(), id))
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    let view = aggregate::build_post_view(&store, post, claims.map(|c| c.sub)).await?;

    Ok(ApiResponse::success(view))
}

/// Delete a post; only its author may do this
/// DELETE /api/posts/:id
pub async fn delete_post(
    State(store): State<Store>,
    claims: jwt::Claims,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    store
        .bounded(async {
            let mut tx = store.begin_write().await?;

            let viewer = store::users::find_by_id(&mut *tx, claims.sub)
                .await?
                .ok_or(EngineError::Unauthenticated)?;

            let post = store::posts::find_by_id(&mut *tx, id)
                .await?
                .ok_or(EngineError::NotFound("post"))?;

            if post.author_username != viewer.username {
                return Err(EngineError::Forbidden("only the author can delete a post"));
            }

            store::posts::delete(&mut *tx, post.id).await?;
            tx.commit().await?;

            Ok::<_, EngineError>(())
        })
        .await?;

    tracing::info!(post_id = %id, "post deleted");

    Ok(ApiResponse::ok("Post deleted".to_string()))
}

/// POST /api/posts/:id/like
pub async fn like_post(
    State(store): State<Store>,
    claims: Option<jwt::Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    set_like(&store, claims, id, LikeState::Liked).await
}

/// DELETE /api/posts/:id/like
pub async fn unlike_post(
    State(store): State<Store>,
    claims: Option<jwt::Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    set_like(&store, claims, id, LikeState::Unliked).await
}

async fn set_like(
    store: &Store,
    claims: Option<jwt::Claims>,
    id: Uuid,
    desired: LikeState,
) -> Result<ApiResponse<LikeActionResponse>, AppError> {
    let outcome = toggle::set_like(store, claims.map(|c| c.sub), id, desired).await?;

    Ok(ApiResponse::success(LikeActionResponse {
        liked: outcome.liked,
        like_count: outcome.like_count,
    }))
}
