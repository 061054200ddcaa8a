//! Test request domain entity
//!
//! A single patient's test-to-diagnosis workflow instance, plus the fixed
//! status state machine that drives it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::consultation::{Consultation, NewConsultation};
use super::lab_result::{LabResult, NewLabResult};
use super::user::UserId;
use crate::error::DomainError;

/// Unique identifier for a test request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestRequestId(pub i64);

impl TestRequestId {
    /// Ids are assigned by the store starting at 1
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl From<i64> for TestRequestId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TestRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Workflow status of a test request
///
/// Declared in workflow order; the derived `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Initiated,
    LabTestInProgress,
    LabTestCompleted,
    DiagnosisInProcess,
    Completed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Initiated,
        RequestStatus::LabTestInProgress,
        RequestStatus::LabTestCompleted,
        RequestStatus::DiagnosisInProcess,
        RequestStatus::Completed,
    ];

    pub fn is_terminal(self) -> bool {
        self == RequestStatus::Completed
    }

    /// Statuses of requests that are still in progress
    pub fn active() -> impl Iterator<Item = RequestStatus> {
        Self::ALL.into_iter().filter(|s| !s.is_terminal())
    }

    /// Apply a workflow transition, returning the resulting status.
    ///
    /// Fails with a validation error unless the request is in exactly the
    /// state the transition starts from.
    pub fn apply(self, transition: Transition) -> Result<RequestStatus, DomainError> {
        if self != transition.from() {
            return Err(DomainError::Validation(format!(
                "Cannot {}: request is {}, expected {}",
                transition,
                self,
                transition.from()
            )));
        }
        Ok(transition.to())
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Initiated => write!(f, "INITIATED"),
            RequestStatus::LabTestInProgress => write!(f, "LAB_TEST_IN_PROGRESS"),
            RequestStatus::LabTestCompleted => write!(f, "LAB_TEST_COMPLETED"),
            RequestStatus::DiagnosisInProcess => write!(f, "DIAGNOSIS_IN_PROCESS"),
            RequestStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INITIATED" => Ok(RequestStatus::Initiated),
            "LAB_TEST_IN_PROGRESS" => Ok(RequestStatus::LabTestInProgress),
            "LAB_TEST_COMPLETED" => Ok(RequestStatus::LabTestCompleted),
            "DIAGNOSIS_IN_PROCESS" => Ok(RequestStatus::DiagnosisInProcess),
            "COMPLETED" => Ok(RequestStatus::Completed),
            _ => Err(format!("Unknown request status: {}", s)),
        }
    }
}

/// The four operations that advance a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    AssignLabTest,
    SubmitLabResult,
    AssignConsultation,
    SubmitConsultation,
}

impl Transition {
    pub fn from(self) -> RequestStatus {
        match self {
            Transition::AssignLabTest => RequestStatus::Initiated,
            Transition::SubmitLabResult => RequestStatus::LabTestInProgress,
            Transition::AssignConsultation => RequestStatus::LabTestCompleted,
            Transition::SubmitConsultation => RequestStatus::DiagnosisInProcess,
        }
    }

    pub fn to(self) -> RequestStatus {
        match self {
            Transition::AssignLabTest => RequestStatus::LabTestInProgress,
            Transition::SubmitLabResult => RequestStatus::LabTestCompleted,
            Transition::AssignConsultation => RequestStatus::DiagnosisInProcess,
            Transition::SubmitConsultation => RequestStatus::Completed,
        }
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::AssignLabTest => write!(f, "assign lab test"),
            Transition::SubmitLabResult => write!(f, "submit lab result"),
            Transition::AssignConsultation => write!(f, "assign consultation"),
            Transition::SubmitConsultation => write!(f, "submit consultation"),
        }
    }
}

/// Patient gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "MALE"),
            Gender::Female => write!(f, "FEMALE"),
            Gender::Other => write!(f, "OTHER"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            "OTHER" => Ok(Gender::Other),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// A patient's test request
#[derive(Debug, Clone, Serialize)]
pub struct TestRequest {
    pub request_id: TestRequestId,
    pub created_by: UserId,
    pub name: String,
    pub gender: Gender,
    pub age: i32,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub pin_code: i32,
    pub status: RequestStatus,
    /// Tester assigned when the lab test started
    pub tester_id: Option<UserId>,
    /// Doctor assigned when the consultation started
    pub doctor_id: Option<UserId>,
    pub lab_result: Option<LabResult>,
    pub consultation: Option<Consultation>,
    pub created_at: DateTime<Utc>,
}

impl TestRequest {
    /// Apply a status change in place.
    ///
    /// The state machine is checked first; nothing is modified on failure.
    pub fn apply(&mut self, change: &StatusChange) -> Result<(), DomainError> {
        let next = self.status.apply(change.transition())?;

        match change {
            StatusChange::AssignLabTest { tester } => self.tester_id = Some(*tester),
            StatusChange::CompleteLabTest(result) => {
                self.lab_result = Some(result.clone().into_lab_result(Utc::now()))
            }
            StatusChange::AssignConsultation { doctor } => self.doctor_id = Some(*doctor),
            StatusChange::CompleteConsultation(consultation) => {
                if self.lab_result.is_none() {
                    return Err(DomainError::Validation(format!(
                        "Request {} has no lab result",
                        self.request_id
                    )));
                }
                self.consultation = Some(consultation.clone().into_consultation(Utc::now()))
            }
        }

        self.status = next;
        Ok(())
    }
}

/// Data needed to register a new test request
#[derive(Debug, Clone)]
pub struct NewTestRequest {
    pub created_by: UserId,
    pub name: String,
    pub gender: Gender,
    pub age: i32,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub pin_code: i32,
}

/// A status transition together with the record it attaches
#[derive(Debug, Clone)]
pub enum StatusChange {
    AssignLabTest { tester: UserId },
    CompleteLabTest(NewLabResult),
    AssignConsultation { doctor: UserId },
    CompleteConsultation(NewConsultation),
}

impl StatusChange {
    pub fn transition(&self) -> Transition {
        match self {
            StatusChange::AssignLabTest { .. } => Transition::AssignLabTest,
            StatusChange::CompleteLabTest(_) => Transition::SubmitLabResult,
            StatusChange::AssignConsultation { .. } => Transition::AssignConsultation,
            StatusChange::CompleteConsultation(_) => Transition::SubmitConsultation,
        }
    }
}
