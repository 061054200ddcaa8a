//! Lab handlers
//!
//! Tester endpoints: the INITIATED queue, assignment and result entry.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::app::CreateLabResult;
use crate::auth::require_role;
use crate::domain::entities::{Role, TestRequest, TestRequestId, User};
use crate::error::AppError;
use crate::handlers::optional_json_body;
use crate::AppState;

/// GET /lab/requests
pub async fn lab_queue(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<TestRequest>>, AppError> {
    require_role(&user, Role::Tester)?;

    Ok(Json(state.lab_service.pending_requests().await?))
}

/// GET /lab/requests/mine
pub async fn my_lab_tests(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<TestRequest>>, AppError> {
    require_role(&user, Role::Tester)?;

    Ok(Json(state.lab_service.assigned_to(&user).await?))
}

/// PUT /lab/assign/:id
pub async fn assign_for_lab_test(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<TestRequest>, AppError> {
    require_role(&user, Role::Tester)?;

    let request = state
        .lab_service
        .assign_for_lab_test(TestRequestId(id), &user)
        .await?;

    Ok(Json(request))
}

/// PUT /lab/update/:id
///
/// A request without a JSON body reaches the service as `None`; a body
/// that does not deserialize is a validation error naming the problem.
pub async fn update_lab_test(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    payload: Result<Json<CreateLabResult>, JsonRejection>,
) -> Result<Json<TestRequest>, AppError> {
    require_role(&user, Role::Tester)?;

    let request = state
        .lab_service
        .update_lab_test(TestRequestId(id), optional_json_body(payload)?, &user)
        .await?;

    Ok(Json(request))
}
