use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::jwt,
    comments::CreateComment,
    engine::EngineError,
    error::AppError,
    response::ApiResponse,
    store::{self, Store},
};

/// Create a new comment on a post
/// POST /api/posts/:id/comments
pub async fn create_comment(
    State(store): State<Store>,
    claims: jwt::Claims,
    Path(post_id): Path<Uuid>,
    Json(payload): Json<CreateComment>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let comment = store
        .bounded(async {
            // Existence check and insert share one write transaction.
            let mut tx = store.begin_write().await?;

            let author = store::users::find_by_id(&mut *tx, claims.sub)
                .await?
                .ok_or(EngineError::Unauthenticated)?;

            store::posts::find_by_id(&mut *tx, post_id)
                .await?
                .ok_or(EngineError::NotFound("post"))?;

            let comment = store::comments::insert(
                &mut *tx,
                post_id,
                &author.username,
                &payload.content,
                Utc::now(),
            )
            .await?;
            tx.commit().await?;

            Ok::<_, EngineError>(comment)
        })
        .await?;

    Ok(ApiResponse::success(comment).created())
}
