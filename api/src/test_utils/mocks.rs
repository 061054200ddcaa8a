//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    NewTestRequest, NewUser, RequestStatus, StatusChange, TestRequest, TestRequestId, User,
    UserId,
};
use crate::domain::ports::{TestRequestRepository, UserRepository};
use crate::error::DomainError;

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.users.write().unwrap().insert(user.id, user);
        self
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.get(id).cloned())
    }

    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.api_key_hash == hash).cloned())
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.user_name == user_name).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DomainError> {
        let user = User {
            id: UserId::new(),
            user_name: new_user.user_name.clone(),
            role: new_user.role,
            api_key_hash: new_user.api_key_hash.clone(),
            created_at: Utc::now(),
        };

        self.users.write().unwrap().insert(user.id, user.clone());
        Ok(user)
    }
}

// ============================================================================
// In-Memory Test Request Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryTestRequestRepository {
    requests: Arc<RwLock<HashMap<TestRequestId, TestRequest>>>,
    last_id: AtomicI64,
}

impl InMemoryTestRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a stored request directly, bypassing the port
    pub fn get(&self, id: &TestRequestId) -> Option<TestRequest> {
        self.requests.read().unwrap().get(id).cloned()
    }

    /// Overwrite a stored status without going through the state machine
    pub fn force_status(&self, id: &TestRequestId, status: RequestStatus) {
        if let Some(request) = self.requests.write().unwrap().get_mut(id) {
            request.status = status;
        }
    }

    fn filtered(&self, predicate: impl Fn(&TestRequest) -> bool) -> Vec<TestRequest> {
        let requests = self.requests.read().unwrap();
        let mut found: Vec<_> = requests.values().filter(|r| predicate(r)).cloned().collect();
        found.sort_by_key(|r| r.request_id.0);
        found
    }
}

#[async_trait]
impl TestRequestRepository for InMemoryTestRequestRepository {
    async fn find_by_id(&self, id: &TestRequestId) -> Result<Option<TestRequest>, DomainError> {
        Ok(self.get(id))
    }

    async fn find_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<TestRequest>, DomainError> {
        Ok(self.filtered(|r| r.status == status))
    }

    async fn find_by_creator(&self, user_id: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        Ok(self.filtered(|r| r.created_by == *user_id))
    }

    async fn find_by_tester(&self, tester_id: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        Ok(self.filtered(|r| r.tester_id == Some(*tester_id)))
    }

    async fn find_by_doctor(&self, doctor_id: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        Ok(self.filtered(|r| r.doctor_id == Some(*doctor_id)))
    }

    async fn create(&self, new_request: &NewTestRequest) -> Result<TestRequest, DomainError> {
        let mut requests = self.requests.write().unwrap();
        if let Some(existing) = requests
            .values()
            .filter(|r| {
                !r.status.is_terminal()
                    && (r.email == new_request.email || r.phone_number == new_request.phone_number)
            })
            .min_by_key(|r| r.request_id.0)
        {
            return Err(DomainError::contact_in_use(existing.request_id));
        }

        let id = TestRequestId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let request = TestRequest {
            request_id: id,
            created_by: new_request.created_by,
            name: new_request.name.clone(),
            gender: new_request.gender,
            age: new_request.age,
            email: new_request.email.clone(),
            phone_number: new_request.phone_number.clone(),
            address: new_request.address.clone(),
            pin_code: new_request.pin_code,
            status: RequestStatus::Initiated,
            tester_id: None,
            doctor_id: None,
            lab_result: None,
            consultation: None,
            created_at: Utc::now(),
        };

        requests.insert(id, request.clone());
        Ok(request)
    }

    async fn apply_change(
        &self,
        id: &TestRequestId,
        change: &StatusChange,
    ) -> Result<Option<TestRequest>, DomainError> {
        let mut requests = self.requests.write().unwrap();
        match requests.get_mut(id) {
            Some(request) => {
                request.apply(change)?;
                Ok(Some(request.clone()))
            }
            None => Ok(None),
        }
    }
}

// ============================================================================
// Failing Test Request Repository
// ============================================================================

/// Repository whose every call fails like a lost database connection
pub struct FailingTestRequestRepository;

fn unavailable() -> DomainError {
    DomainError::Database("connection refused".to_string())
}

#[async_trait]
impl TestRequestRepository for FailingTestRequestRepository {
    async fn find_by_id(&self, _id: &TestRequestId) -> Result<Option<TestRequest>, DomainError> {
        Err(unavailable())
    }

    async fn find_by_status(
        &self,
        _status: RequestStatus,
    ) -> Result<Vec<TestRequest>, DomainError> {
        Err(unavailable())
    }

    async fn find_by_creator(&self, _user_id: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        Err(unavailable())
    }

    async fn find_by_tester(&self, _tester_id: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        Err(unavailable())
    }

    async fn find_by_doctor(&self, _doctor_id: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        Err(unavailable())
    }

    async fn create(&self, _request: &NewTestRequest) -> Result<TestRequest, DomainError> {
        Err(unavailable())
    }

    async fn apply_change(
        &self,
        _id: &TestRequestId,
        _change: &StatusChange,
    ) -> Result<Option<TestRequest>, DomainError> {
        Err(unavailable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{new_test_request, test_user};
    use crate::domain::entities::Role;

    #[tokio::test]
    async fn ids_are_positive_and_increasing() {
        let repo = InMemoryTestRequestRepository::new();
        let creator = test_user(Role::User).id;

        let first = repo.create(&new_test_request(creator)).await.unwrap();
        let second = repo.create(&new_test_request(creator)).await.unwrap();

        assert_eq!(first.request_id, TestRequestId(1));
        assert_eq!(second.request_id, TestRequestId(2));
    }

    #[tokio::test]
    async fn apply_change_on_missing_request_returns_none() {
        let repo = InMemoryTestRequestRepository::new();

        let result = repo
            .apply_change(
                &TestRequestId(9),
                &StatusChange::AssignLabTest {
                    tester: UserId::new(),
                },
            )
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn apply_change_rechecks_status() {
        let repo = InMemoryTestRequestRepository::new();
        let created = repo
            .create(&new_test_request(UserId::new()))
            .await
            .unwrap();
        let change = StatusChange::AssignLabTest {
            tester: UserId::new(),
        };

        repo.apply_change(&created.request_id, &change)
            .await
            .unwrap();
        let second = repo.apply_change(&created.request_id, &change).await;

        assert!(matches!(second, Err(DomainError::Validation(_))));
    }
}
