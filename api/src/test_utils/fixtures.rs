//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Contact details are unique per call so registrations never collide.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use uuid::Uuid;

use super::mocks::InMemoryTestRequestRepository;
use crate::app::{hash_api_key, CreateConsultationRequest, CreateLabResult, CreateTestRequest};
use crate::domain::entities::{
    DoctorSuggestion, Gender, NewConsultation, NewLabResult, NewTestRequest, RequestStatus, Role,
    StatusChange, TestRequest, TestStatus, User, UserId,
};
use crate::domain::ports::TestRequestRepository;

static NEXT_PHONE: AtomicU32 = AtomicU32::new(100_000);

fn unique_phone_number() -> String {
    NEXT_PHONE.fetch_add(1, Ordering::SeqCst).to_string()
}

fn unique_email() -> String {
    format!("someone{}@somedomain.com", Uuid::new_v4())
}

/// Create a test user with the given role
pub fn test_user(role: Role) -> User {
    let name = format!("{}-{}", role.to_string().to_lowercase(), Uuid::new_v4());
    User {
        id: UserId::new(),
        api_key_hash: format!("hash-{}", name),
        user_name: name,
        role,
        created_at: Utc::now(),
    }
}

/// Create a test user together with the API key that authenticates it
pub fn test_user_with_key(role: Role) -> (User, String) {
    let api_key = format!("uk-test-{}", Uuid::new_v4().simple());
    let mut user = test_user(role);
    user.api_key_hash = hash_api_key(&api_key);
    (user, api_key)
}

/// Patient payload accepted by request registration
pub fn create_test_request_payload() -> CreateTestRequest {
    CreateTestRequest {
        name: "someuser".to_string(),
        gender: Gender::Male,
        age: 98,
        email: unique_email(),
        phone_number: unique_phone_number(),
        address: "some Address".to_string(),
        pin_code: 716768,
    }
}

/// Repository-level request data for a creator
pub fn new_test_request(created_by: UserId) -> NewTestRequest {
    NewTestRequest {
        created_by,
        name: "someuser".to_string(),
        gender: Gender::Female,
        age: 42,
        email: unique_email(),
        phone_number: unique_phone_number(),
        address: "some Address".to_string(),
        pin_code: 716768,
    }
}

/// Lab result payload with placeholder vitals
pub fn create_lab_result_payload(result: TestStatus) -> CreateLabResult {
    CreateLabResult {
        blood_pressure: "N/A".to_string(),
        heart_beat: "N/A".to_string(),
        temperature: "N/A".to_string(),
        oxygen_level: "N/A".to_string(),
        comments: "N/A".to_string(),
        result: Some(result),
    }
}

/// Consultation payload matching the request's lab result
pub fn consultation_payload_for(request: &TestRequest) -> CreateConsultationRequest {
    let suggestion = match request.lab_result.as_ref().map(|r| r.result) {
        Some(TestStatus::Positive) => DoctorSuggestion::HomeQuarantine,
        _ => DoctorSuggestion::NoIssues,
    };
    CreateConsultationRequest {
        suggestion: Some(suggestion),
        comments: Some("Consulted".to_string()),
    }
}

/// Store a fresh INITIATED request
pub async fn seed_request(repo: &InMemoryTestRequestRepository) -> TestRequest {
    repo.create(&new_test_request(UserId::new())).await.unwrap()
}

/// Store a request and walk it through the workflow up to `status`
pub async fn seed_request_with_status(
    repo: &InMemoryTestRequestRepository,
    status: RequestStatus,
    result: TestStatus,
) -> TestRequest {
    let mut request = seed_request(repo).await;
    let tester = UserId::new();
    let doctor = UserId::new();

    while request.status < status {
        let change = match request.status {
            RequestStatus::Initiated => StatusChange::AssignLabTest { tester },
            RequestStatus::LabTestInProgress => StatusChange::CompleteLabTest(NewLabResult {
                blood_pressure: "120/80".to_string(),
                heart_beat: "72".to_string(),
                temperature: "98.6".to_string(),
                oxygen_level: "98".to_string(),
                comments: "seeded".to_string(),
                result,
                tester_id: tester,
            }),
            RequestStatus::LabTestCompleted => StatusChange::AssignConsultation { doctor },
            RequestStatus::DiagnosisInProcess => {
                StatusChange::CompleteConsultation(NewConsultation {
                    suggestion: DoctorSuggestion::NoIssues,
                    comments: None,
                    doctor_id: doctor,
                })
            }
            RequestStatus::Completed => break,
        };
        request = repo
            .apply_change(&request.request_id, &change)
            .await
            .unwrap()
            .unwrap();
    }

    request
}
