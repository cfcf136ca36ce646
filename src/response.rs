use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// A standardized response wrapper for the API.
/// This ensures consistent JSON structure across all endpoints.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    /// Indicates if the request was successful.
    pub success: bool,
    /// A message describing the result (mostly for confirmations).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The actual data payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Creates a success response with data.
    /// Status code defaults to 200 OK.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Shorthand for 201 Created response.
    /// Usage: `ApiResponse::success(data).created()`
    pub fn created(self) -> ApiResponseWithStatus<T> {
        ApiResponseWithStatus {
            status: StatusCode::CREATED,
            response: self,
        }
    }
}

/// Helper struct for responses without data (e.g., just a message)
#[derive(Serialize)]
pub struct EmptyData;

impl ApiResponse<EmptyData> {
    /// Creates a success response with just a message.
    pub fn ok(message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: None,
        }
    }
}

/// A wrapper that pairs an ApiResponse with a custom StatusCode.
pub struct ApiResponseWithStatus<T> {
    status: StatusCode,
    response: ApiResponse<T>,
}

impl<T> IntoResponse for ApiResponseWithStatus<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

/// Defaults to 200 OK. For 201 use `.created()`.
impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
