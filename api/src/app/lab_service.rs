//! Lab service
//!
//! Tester-facing side of the workflow:
//! - INITIATED → LAB_TEST_IN_PROGRESS (assign lab test)
//! - LAB_TEST_IN_PROGRESS → LAB_TEST_COMPLETED (record lab result)

use std::sync::Arc;

use serde::Deserialize;

use super::test_request_service::load_request;
use crate::domain::entities::{
    NewLabResult, RequestStatus, StatusChange, TestRequest, TestRequestId, TestStatus, Transition,
    User,
};
use crate::domain::ports::TestRequestRepository;
use crate::error::{AppError, DomainError};

/// Lab result submitted by a tester
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLabResult {
    #[serde(default)]
    pub blood_pressure: String,
    #[serde(default)]
    pub heart_beat: String,
    #[serde(default)]
    pub temperature: String,
    #[serde(default)]
    pub oxygen_level: String,
    #[serde(default)]
    pub comments: String,
    pub result: Option<TestStatus>,
}

/// Service for lab test assignment and result entry
pub struct LabService<TR>
where
    TR: TestRequestRepository + ?Sized,
{
    requests: Arc<TR>,
}

impl<TR> LabService<TR>
where
    TR: TestRequestRepository + ?Sized,
{
    pub fn new(requests: Arc<TR>) -> Self {
        Self { requests }
    }

    /// Requests waiting for a tester
    pub async fn pending_requests(&self) -> Result<Vec<TestRequest>, AppError> {
        Ok(self.requests.find_by_status(RequestStatus::Initiated).await?)
    }

    /// Requests this tester has been assigned
    pub async fn assigned_to(&self, tester: &User) -> Result<Vec<TestRequest>, AppError> {
        Ok(self.requests.find_by_tester(&tester.id).await?)
    }

    /// Assign a request to a tester for a lab test
    pub async fn assign_for_lab_test(
        &self,
        id: TestRequestId,
        tester: &User,
    ) -> Result<TestRequest, AppError> {
        let request = load_request(self.requests.as_ref(), id).await?;
        request.status.apply(Transition::AssignLabTest)?;

        let updated = self
            .requests
            .apply_change(&id, &StatusChange::AssignLabTest { tester: tester.id })
            .await?
            .ok_or(DomainError::InvalidId(id))?;

        tracing::info!(
            request_id = %id,
            tester_id = %tester.id,
            status = %updated.status,
            "Assigned lab test"
        );

        Ok(updated)
    }

    /// Record the lab result for a request in progress
    ///
    /// A missing payload or missing result is a validation error, and only
    /// the tester assigned to the request may submit it.
    pub async fn update_lab_test(
        &self,
        id: TestRequestId,
        payload: Option<CreateLabResult>,
        tester: &User,
    ) -> Result<TestRequest, AppError> {
        let request = load_request(self.requests.as_ref(), id).await?;

        let payload = payload.ok_or_else(|| {
            DomainError::Validation("Lab result payload is required".to_string())
        })?;
        let result = payload
            .result
            .ok_or_else(|| DomainError::Validation("Lab result is required".to_string()))?;

        request.status.apply(Transition::SubmitLabResult)?;

        if request.tester_id != Some(tester.id) {
            return Err(AppError::Domain(DomainError::Forbidden(format!(
                "Request {} is assigned to another tester",
                id
            ))));
        }

        let lab_result = NewLabResult {
            blood_pressure: payload.blood_pressure,
            heart_beat: payload.heart_beat,
            temperature: payload.temperature,
            oxygen_level: payload.oxygen_level,
            comments: payload.comments,
            result,
            tester_id: tester.id,
        };

        let updated = self
            .requests
            .apply_change(&id, &StatusChange::CompleteLabTest(lab_result))
            .await?
            .ok_or(DomainError::InvalidId(id))?;

        tracing::info!(
            request_id = %id,
            tester_id = %tester.id,
            result = %result,
            "Recorded lab result"
        );

        Ok(updated)
    }
}
