use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use validator::Validate;

use crate::{
    auth::{
        avatar_path, identity::hash_identity, jwt, AuthResponse, LoginUser, RegisterUser,
        UserResponse,
    },
    config::settings::Settings,
    error::AppError,
    response::ApiResponse,
    store::{self, users::Taken, Store},
};

/// Claim a username for a first-time external identity
/// POST /api/auth/sign-up
pub async fn signup(
    State(store): State<Store>,
    State(settings): State<Settings>,
    Json(payload): Json<RegisterUser>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let identity_hash = hash_identity(&payload.identity);

    if store
        .run(store::users::find_by_identity_hash(store.pool(), &identity_hash))
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "An account already exists for this identity".to_string(),
        ));
    }

    let avatar_url = avatar_path(&payload.username);
    let user = store
        .bounded(async {
            store::users::insert(
                store.pool(),
                &payload.username,
                &identity_hash,
                Some(avatar_url.as_str()),
                Utc::now(),
            )
            .await
            .map_err(|e| match store::users::taken_by(&e) {
                Some(Taken::Username) => AppError::Conflict("Username already taken".to_string()),
                Some(Taken::Identity) => AppError::Conflict(
                    "An account already exists for this identity".to_string(),
                ),
                None => AppError::from(e),
            })
        })
        .await?;

    tracing::info!(username = %user.username, "user registered");

    let token = jwt::create_token(user.id, &settings.jwt_secret, settings.token_ttl_hours)
        .map_err(|_| AppError::InternalServerError)?;

    Ok(ApiResponse::success(AuthResponse {
        token,
        user: UserResponse::from(user),
    })
    .created())
}

/// Log in with an external identity that already claimed a username
/// POST /api/auth/sign-in
pub async fn login(
    State(store): State<Store>,
    State(settings): State<Settings>,
    Json(payload): Json<LoginUser>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let user = store
        .run(store::users::find_by_identity_hash(
            store.pool(),
            &hash_identity(&payload.identity),
        ))
        .await?
        .ok_or(AppError::NotFound(
            "No account for this identity, sign up to claim a username".to_string(),
        ))?;

    let token = jwt::create_token(user.id, &settings.jwt_secret, settings.token_ttl_hours)
        .map_err(|_| AppError::InternalServerError)?;

    Ok(ApiResponse::success(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// GET /api/auth/me
pub async fn get_me(
    State(store): State<Store>,
    claims: jwt::Claims,
) -> Result<impl IntoResponse, AppError> {
    let user = store
        .run(store::users::find_by_id(store.pool(), claims.sub))
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(ApiResponse::success(UserResponse::from(user)))
}
