use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::{
    auth::jwt,
    avatar::{self, AVATAR_SIZE},
    engine::aggregate,
    error::AppError,
    response::ApiResponse,
    store::{self, Store},
    users::UserProfileResponse,
};

/// Get user profile with follow stats and posts
/// GET /api/users/:username
pub async fn get_user_profile(
    State(store): State<Store>,
    claims: Option<jwt::Claims>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = store
        .run(store::users::find_by_username(store.pool(), &username))
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let is_following = match claims {
        Some(claims) => {
            store
                .run(store::follows::is_following(
                    store.pool(),
                    claims.sub,
                    &user.username,
                ))
                .await?
        }
        None => false,
    };

    let posts = aggregate::list_posts_by_author(&store, &user.username).await?;

    Ok(ApiResponse::success(UserProfileResponse {
        username: user.username,
        avatar_url: user.avatar_url,
        member_since: user.member_since,
        followers_count: user.follower_count,
        is_following,
        posts,
    }))
}

/// Letter avatar for a username
/// GET /api/users/:username/avatar
pub async fn get_avatar(Path(username): Path<String>) -> Result<impl IntoResponse, AppError> {
    let png = avatar::generate_avatar(avatar::initial(&username), AVATAR_SIZE, AVATAR_SIZE)
        .map_err(|e| {
            tracing::error!("Avatar encoding error: {:?}", e);
            AppError::InternalServerError
        })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
