use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::engine::EngineError;
use crate::store::StoreError;

#[derive(Debug)]
pub enum AppError {
    InternalServerError,
    Unauthorized,
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    UnprocessableEntity(String),
    ServiceUnavailable,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::ServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable".to_string(),
            ),
        };

        // Standardized failure response matching ApiResponse structure
        let body = Json(json!({
            "success": false,
            "message": error_message,
            "data": null
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Store error: {:?}", err);
        AppError::ServiceUnavailable
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::from(StoreError::Sqlx(err))
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Unauthenticated => AppError::Unauthorized,
            EngineError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
            EngineError::Forbidden(reason) => AppError::Forbidden(reason.to_string()),
            e @ (EngineError::AlreadyFollowing | EngineError::NotFollowing) => {
                AppError::Conflict(e.to_string())
            }
            EngineError::StoreUnavailable(e) => AppError::from(e),
        }
    }
}
