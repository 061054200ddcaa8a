//! Consultation handlers
//!
//! Doctor endpoints: the LAB_TEST_COMPLETED queue, assignment and outcome
//! entry.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::app::CreateConsultationRequest;
use crate::auth::require_role;
use crate::domain::entities::{Role, TestRequest, TestRequestId, User};
use crate::error::AppError;
use crate::handlers::optional_json_body;
use crate::AppState;

/// GET /consultations/in-queue
pub async fn consultation_queue(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<TestRequest>>, AppError> {
    require_role(&user, Role::Doctor)?;

    Ok(Json(state.consultation_service.in_queue().await?))
}

/// GET /consultations/mine
pub async fn my_consultations(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<TestRequest>>, AppError> {
    require_role(&user, Role::Doctor)?;

    Ok(Json(state.consultation_service.assigned_to(&user).await?))
}

/// PUT /consultations/assign/:id
pub async fn assign_for_consultation(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<TestRequest>, AppError> {
    require_role(&user, Role::Doctor)?;

    let request = state
        .consultation_service
        .assign_for_consultation(TestRequestId(id), &user)
        .await?;

    Ok(Json(request))
}

/// PUT /consultations/update/:id
pub async fn update_consultation(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    payload: Result<Json<CreateConsultationRequest>, JsonRejection>,
) -> Result<Json<TestRequest>, AppError> {
    require_role(&user, Role::Doctor)?;

    let request = state
        .consultation_service
        .update_consultation(TestRequestId(id), optional_json_body(payload)?, &user)
        .await?;

    Ok(Json(request))
}
