use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    auth::jwt,
    engine::{toggle, FollowState},
    error::AppError,
    follows::FollowActionResponse,
    response::ApiResponse,
    store::{self, Store},
};

/// Follow a user
/// POST /api/users/:username/follow
pub async fn follow_user(
    State(store): State<Store>,
    claims: Option<jwt::Claims>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    set_follow(&store, claims, &username, FollowState::Followed).await
}

/// Unfollow a user
/// DELETE /api/users/:username/follow
pub async fn unfollow_user(
    State(store): State<Store>,
    claims: Option<jwt::Claims>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    set_follow(&store, claims, &username, FollowState::Unfollowed).await
}

async fn set_follow(
    store: &Store,
    claims: Option<jwt::Claims>,
    username: &str,
    desired: FollowState,
) -> Result<ApiResponse<FollowActionResponse>, AppError> {
    let outcome = toggle::set_follow(store, claims.map(|c| c.sub), username, desired).await?;

    Ok(ApiResponse::success(FollowActionResponse {
        following: outcome.following,
        followers_count: outcome.follower_count,
    }))
}

/// Get a user's followers
/// GET /api/users/:username/followers
pub async fn get_followers(
    State(store): State<Store>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    ensure_user(&store, &username).await?;

    let users = store
        .run(store::follows::followers_of(store.pool(), &username))
        .await?;

    Ok(ApiResponse::success(users))
}

/// Get users that a user is following
/// GET /api/users/:username/following
pub async fn get_following(
    State(store): State<Store>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    ensure_user(&store, &username).await?;

    let users = store
        .run(store::follows::following_of(store.pool(), &username))
        .await?;

    Ok(ApiResponse::success(users))
}

async fn ensure_user(store: &Store, username: &str) -> Result<(), AppError> {
    store
        .run(store::users::find_by_username(store.pool(), username))
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;
    Ok(())
}
