//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod consultation;
pub mod lab_result;
pub mod test_request;
pub mod user;

pub use consultation::{Consultation, DoctorSuggestion, NewConsultation};
pub use lab_result::{LabResult, NewLabResult, TestStatus};
pub use test_request::{
    Gender, NewTestRequest, RequestStatus, StatusChange, TestRequest, TestRequestId, Transition,
};
pub use user::{NewUser, Role, User, UserId};
