//! HTTP request handlers and the error-to-response translation.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::de::DeserializeOwned;
use tracing::error;

use crate::app::AppState;
use crate::domain::{
    ApiResponse, AppError, CreateUserRequest, DatabaseError, UpdateUserRequest, UserId,
    UserResponse,
};

/// Body of a successful DELETE.
pub const DELETED_MESSAGE: &str = "Deleted successfully";

/// Create a new user
///
/// `POST /api/users`
pub async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let payload: CreateUserRequest = decode_body(&body)?;
    let user = state.service.create(payload).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// Rename an existing user
///
/// `PUT /api/users/{userId}`. The path id is checked before the body is
/// decoded, and wins over any id in the body.
pub async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    body: Bytes,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let id = parse_user_id(&user_id)?;
    let mut payload: UpdateUserRequest = decode_body(&body)?;
    payload.id = id;

    let user = state.service.update(payload).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// `DELETE /api/users/{userId}`
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    let id = parse_user_id(&user_id)?;
    state.service.delete(id).await?;
    Ok(Json(ApiResponse::ok(DELETED_MESSAGE)))
}

/// `GET /api/users/{userId}`
pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let id = parse_user_id(&user_id)?;
    let user = state.service.find_by_id(id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// `GET /api/users`
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let users = state.service.find_all().await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// Decode a JSON body regardless of the request's content type.
fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::Deserialization(e.to_string()))
}

fn parse_user_id(raw: &str) -> Result<UserId, AppError> {
    raw.parse().map_err(|_| AppError::InvalidParameter {
        name: "userId".to_string(),
        value: raw.to_string(),
    })
}

impl AppError {
    /// Transport status for this error. First matching kind wins.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(DatabaseError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::Deserialization(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        let data = match &self {
            AppError::Validation(err) => Some(err.messages()),
            AppError::Authentication(_) | AppError::Timeout => None,
            _ => Some(self.to_string()),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }

        let body = ApiResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            data,
        );

        (status, Json(body)).into_response()
    }
}
