//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::{AppError, DomainError};

pub mod consultations;
pub mod lab;
pub mod test_requests;
pub mod users;

pub use consultations::{
    assign_for_consultation, consultation_queue, my_consultations, update_consultation,
};
pub use lab::{assign_for_lab_test, lab_queue, my_lab_tests, update_lab_test};
pub use test_requests::{create_request, get_request, list_by_status, request_history};
pub use users::register;

/// Unwrap a JSON body, reporting rejections as a 400 error response
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Unwrap a JSON body that services treat as optional.
///
/// A request without a JSON body yields `None`; a body that fails to parse
/// or deserialize is a validation error carrying the reason.
pub(crate) fn optional_json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<Option<T>, AppError> {
    match payload {
        Ok(Json(value)) => Ok(Some(value)),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(None),
        Err(rejection) => Err(DomainError::Validation(rejection.body_text()).into()),
    }
}
