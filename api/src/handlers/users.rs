//! User handlers
//!
//! Endpoint for user registration.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Role;
use crate::error::AppError;
use crate::handlers::json_body;
use crate::AppState;

/// Request body for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub user_name: String,
    pub role: Role,
}

/// Response body for user registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub user_name: String,
    pub role: Role,
    /// API key for API calls (Authorization: Bearer <api_key>)
    pub api_key: String,
    pub message: String,
}

/// POST /auth/register
///
/// Register a new user. Returns the API key (only shown once).
pub async fn register(
    State(state): State<AppState>,
    request: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let request = json_body(request)?;
    let (user, api_key) = state
        .user_service
        .register(&request.user_name, request.role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id.to_string(),
            user_name: user.user_name,
            role: user.role,
            api_key,
            message: "Save this API key - it won't be shown again.".to_string(),
        }),
    ))
}
