//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;

use crate::domain::entities::{
    NewTestRequest, NewUser, RequestStatus, StatusChange, TestRequest, TestRequestId, User,
    UserId,
};
use crate::error::DomainError;

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by API key hash
    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by user name
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;
}

/// Repository for TestRequest entities
///
/// Returned requests always carry their lab result and consultation, if any.
#[async_trait]
pub trait TestRequestRepository: Send + Sync {
    /// Find a request by ID
    async fn find_by_id(&self, id: &TestRequestId) -> Result<Option<TestRequest>, DomainError>;

    /// Find requests currently in the given status
    async fn find_by_status(&self, status: RequestStatus)
        -> Result<Vec<TestRequest>, DomainError>;

    /// Find requests created by a user
    async fn find_by_creator(&self, user_id: &UserId) -> Result<Vec<TestRequest>, DomainError>;

    /// Find requests a tester was assigned to
    async fn find_by_tester(&self, tester_id: &UserId) -> Result<Vec<TestRequest>, DomainError>;

    /// Find requests a doctor was assigned to
    async fn find_by_doctor(&self, doctor_id: &UserId) -> Result<Vec<TestRequest>, DomainError>;

    /// Create a new request in the INITIATED status.
    ///
    /// Fails with `AlreadyExists` while a request that is not yet completed
    /// shares the email or phone number. The check and the insert are atomic.
    async fn create(&self, request: &NewTestRequest) -> Result<TestRequest, DomainError>;

    /// Atomically apply a status change.
    ///
    /// The current status is re-checked against the change under the same
    /// lock/transaction that writes it. Returns `Ok(None)` when the request
    /// does not exist.
    async fn apply_change(
        &self,
        id: &TestRequestId,
        change: &StatusChange,
    ) -> Result<Option<TestRequest>, DomainError>;
}
