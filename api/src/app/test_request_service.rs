//! Test request service
//!
//! Registers new test requests and answers lookups by id, status and
//! creator.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Deserialize;

use crate::domain::entities::{
    Gender, NewTestRequest, RequestStatus, TestRequest, TestRequestId, User,
};
use crate::domain::ports::TestRequestRepository;
use crate::error::{AppError, DomainError};

/// Patient data submitted when registering a test request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTestRequest {
    pub name: String,
    pub gender: Gender,
    pub age: i32,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub pin_code: i32,
}

impl CreateTestRequest {
    /// Check presence and format of the patient fields
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("Name is required".to_string()));
        }
        if !(1..=150).contains(&self.age) {
            return Err(DomainError::Validation(
                "Age must be between 1 and 150".to_string(),
            ));
        }
        if !email_regex().is_match(self.email.trim()) {
            return Err(DomainError::Validation(format!(
                "Invalid email address: {}",
                self.email
            )));
        }
        let phone = self.phone_number.trim();
        if !(6..=15).contains(&phone.len()) || !phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::Validation(
                "Phone number must be 6 to 15 digits".to_string(),
            ));
        }
        if self.address.trim().is_empty() {
            return Err(DomainError::Validation("Address is required".to_string()));
        }
        if !(100_000..=999_999).contains(&self.pin_code) {
            return Err(DomainError::Validation(
                "Pin code must have 6 digits".to_string(),
            ));
        }
        Ok(())
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Load a request, mapping unknown and non-positive ids to `InvalidId`
pub(crate) async fn load_request<R>(
    requests: &R,
    id: TestRequestId,
) -> Result<TestRequest, DomainError>
where
    R: TestRequestRepository + ?Sized,
{
    if !id.is_valid() {
        return Err(DomainError::InvalidId(id));
    }
    requests
        .find_by_id(&id)
        .await?
        .ok_or(DomainError::InvalidId(id))
}

/// Service for registering and querying test requests
pub struct TestRequestService<TR>
where
    TR: TestRequestRepository + ?Sized,
{
    requests: Arc<TR>,
}

impl<TR> TestRequestService<TR>
where
    TR: TestRequestRepository + ?Sized,
{
    pub fn new(requests: Arc<TR>) -> Self {
        Self { requests }
    }

    /// Register a new test request for a patient
    ///
    /// Rejected while another request with the same email or phone number
    /// is still in progress.
    pub async fn create_request(
        &self,
        user: &User,
        payload: CreateTestRequest,
    ) -> Result<TestRequest, AppError> {
        payload.validate()?;

        let email = payload.email.trim().to_lowercase();
        let phone_number = payload.phone_number.trim().to_string();

        let new_request = NewTestRequest {
            created_by: user.id,
            name: payload.name.trim().to_string(),
            gender: payload.gender,
            age: payload.age,
            email,
            phone_number,
            address: payload.address.trim().to_string(),
            pin_code: payload.pin_code,
        };

        let request = self.requests.create(&new_request).await?;
        tracing::info!(
            request_id = %request.request_id,
            user_id = %user.id,
            "Registered test request"
        );

        Ok(request)
    }

    /// Find a request by id; unknown and non-positive ids yield `None`
    pub async fn find_by_id(&self, id: TestRequestId) -> Result<Option<TestRequest>, AppError> {
        if !id.is_valid() {
            return Ok(None);
        }
        Ok(self.requests.find_by_id(&id).await?)
    }

    /// Get a request by id or fail with `InvalidId`
    pub async fn get_by_id(&self, id: TestRequestId) -> Result<TestRequest, AppError> {
        Ok(load_request(self.requests.as_ref(), id).await?)
    }

    /// All requests currently in exactly this status
    pub async fn find_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<TestRequest>, AppError> {
        Ok(self.requests.find_by_status(status).await?)
    }

    /// Requests the user has registered
    pub async fn history_for(&self, user: &User) -> Result<Vec<TestRequest>, AppError> {
        Ok(self.requests.find_by_creator(&user.id).await?)
    }
}
