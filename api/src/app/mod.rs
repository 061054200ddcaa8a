//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and ports.

pub mod consultation_service;
pub mod lab_service;
pub mod test_request_service;
pub mod user_service;

pub use consultation_service::{ConsultationService, CreateConsultationRequest};
pub use lab_service::{CreateLabResult, LabService};
pub use test_request_service::{CreateTestRequest, TestRequestService};
pub use user_service::{hash_api_key, UserService};
