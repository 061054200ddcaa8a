//! Consultation service
//!
//! Doctor-facing side of the workflow:
//! - LAB_TEST_COMPLETED → DIAGNOSIS_IN_PROCESS (assign consultation)
//! - DIAGNOSIS_IN_PROCESS → COMPLETED (record suggestion)

use std::sync::Arc;

use serde::Deserialize;

use super::test_request_service::load_request;
use crate::domain::entities::{
    DoctorSuggestion, NewConsultation, RequestStatus, StatusChange, TestRequest, TestRequestId,
    Transition, User,
};
use crate::domain::ports::TestRequestRepository;
use crate::error::{AppError, DomainError};

/// Consultation outcome submitted by a doctor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateConsultationRequest {
    pub suggestion: Option<DoctorSuggestion>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Service for consultation assignment and outcome entry
pub struct ConsultationService<TR>
where
    TR: TestRequestRepository + ?Sized,
{
    requests: Arc<TR>,
}

impl<TR> ConsultationService<TR>
where
    TR: TestRequestRepository + ?Sized,
{
    pub fn new(requests: Arc<TR>) -> Self {
        Self { requests }
    }

    /// Requests whose lab test is done and that wait for a doctor
    pub async fn in_queue(&self) -> Result<Vec<TestRequest>, AppError> {
        Ok(self
            .requests
            .find_by_status(RequestStatus::LabTestCompleted)
            .await?)
    }

    /// Requests this doctor has been assigned
    pub async fn assigned_to(&self, doctor: &User) -> Result<Vec<TestRequest>, AppError> {
        Ok(self.requests.find_by_doctor(&doctor.id).await?)
    }

    /// Assign a request with a completed lab test to a doctor
    pub async fn assign_for_consultation(
        &self,
        id: TestRequestId,
        doctor: &User,
    ) -> Result<TestRequest, AppError> {
        let request = load_request(self.requests.as_ref(), id).await?;
        request.status.apply(Transition::AssignConsultation)?;

        let updated = self
            .requests
            .apply_change(&id, &StatusChange::AssignConsultation { doctor: doctor.id })
            .await?
            .ok_or(DomainError::InvalidId(id))?;

        tracing::info!(
            request_id = %id,
            doctor_id = %doctor.id,
            status = %updated.status,
            "Assigned consultation"
        );

        Ok(updated)
    }

    /// Record the doctor's suggestion and complete the request
    pub async fn update_consultation(
        &self,
        id: TestRequestId,
        payload: Option<CreateConsultationRequest>,
        doctor: &User,
    ) -> Result<TestRequest, AppError> {
        let request = load_request(self.requests.as_ref(), id).await?;

        let payload = payload.ok_or_else(|| {
            DomainError::Validation("Consultation payload is required".to_string())
        })?;
        let suggestion = payload
            .suggestion
            .ok_or_else(|| DomainError::Validation("Suggestion is required".to_string()))?;

        request.status.apply(Transition::SubmitConsultation)?;

        if request.doctor_id != Some(doctor.id) {
            return Err(AppError::Domain(DomainError::Forbidden(format!(
                "Request {} is assigned to another doctor",
                id
            ))));
        }

        let consultation = NewConsultation {
            suggestion,
            comments: payload.comments,
            doctor_id: doctor.id,
        };

        let updated = self
            .requests
            .apply_change(&id, &StatusChange::CompleteConsultation(consultation))
            .await?
            .ok_or(DomainError::InvalidId(id))?;

        tracing::info!(
            request_id = %id,
            doctor_id = %doctor.id,
            suggestion = %suggestion,
            "Recorded consultation"
        );

        Ok(updated)
    }
}
