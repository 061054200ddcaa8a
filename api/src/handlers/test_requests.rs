//! Test request handlers
//!
//! Patient registration of test requests and request lookups.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::app::CreateTestRequest;
use crate::auth::require_role;
use crate::domain::entities::{RequestStatus, Role, TestRequest, TestRequestId, User};
use crate::error::AppError;
use crate::handlers::json_body;
use crate::AppState;

/// POST /test-requests
pub async fn create_request(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<CreateTestRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TestRequest>), AppError> {
    require_role(&user, Role::User)?;
    let payload = json_body(payload)?;

    let request = state
        .test_request_service
        .create_request(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /test-requests
///
/// Requests registered by the caller.
pub async fn request_history(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<TestRequest>>, AppError> {
    require_role(&user, Role::User)?;

    Ok(Json(state.test_request_service.history_for(&user).await?))
}

/// GET /test-requests/:id
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TestRequest>, AppError> {
    let request = state
        .test_request_service
        .get_by_id(TestRequestId(id))
        .await?;

    Ok(Json(request))
}

/// GET /test-requests/status/:status
pub async fn list_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<TestRequest>>, AppError> {
    let status: RequestStatus = status.parse().map_err(AppError::BadRequest)?;

    Ok(Json(
        state.test_request_service.find_by_status(status).await?,
    ))
}
