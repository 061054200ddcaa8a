//! User service
//!
//! Handles user registration and API key authentication.

use std::sync::Arc;

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::domain::entities::{NewUser, Role, User, UserId};
use crate::domain::ports::UserRepository;
use crate::error::{AppError, DomainError};

/// Service for managing users
pub struct UserService<UR>
where
    UR: UserRepository + ?Sized,
{
    users: Arc<UR>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository + ?Sized,
{
    pub fn new(users: Arc<UR>) -> Self {
        Self { users }
    }

    /// Register a new user with the given role
    ///
    /// Returns (user, api_key) - the key is only shown once
    pub async fn register(&self, user_name: &str, role: Role) -> Result<(User, String), AppError> {
        let user_name = user_name.trim();
        if user_name.is_empty() || user_name.len() > 50 {
            return Err(AppError::BadRequest(
                "User name must be between 1 and 50 characters".to_string(),
            ));
        }

        if self.users.find_by_user_name(user_name).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "User with name '{}' already exists",
                user_name
            ))));
        }

        let api_key = generate_api_key();
        let new_user = NewUser {
            user_name: user_name.to_string(),
            role,
            api_key_hash: hash_api_key(&api_key),
        };

        let user = self.users.create(&new_user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "Registered user");

        Ok((user, api_key))
    }

    /// Find a user by their API key hash
    pub async fn find_by_api_key(&self, api_key_hash: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.find_by_api_key_hash(api_key_hash).await?)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AppError> {
        Ok(self.users.find_by_id(id).await?)
    }
}

/// Generate a random API key
fn generate_api_key() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    format!("uk-{}", hex::encode(bytes))
}

/// Hash an API key for storage
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_user, InMemoryUserRepository};

    fn create_service(users: InMemoryUserRepository) -> UserService<InMemoryUserRepository> {
        UserService::new(Arc::new(users))
    }

    #[test]
    fn test_api_key_generation() {
        let key = generate_api_key();
        assert!(key.starts_with("uk-"));
        assert_eq!(key.len(), 3 + 64); // "uk-" + 32 bytes hex
        assert_ne!(key, generate_api_key());
    }

    #[test]
    fn test_api_key_hashing() {
        let key = "uk-test123";
        let hash1 = hash_api_key(key);
        let hash2 = hash_api_key(key);
        assert_eq!(hash1, hash2);
        assert_ne!(hash1, key);
        assert_eq!(hash1.len(), 64);
    }

    #[tokio::test]
    async fn register_success() {
        let service = create_service(InMemoryUserRepository::new());

        let (user, api_key) = service.register("lab-tester", Role::Tester).await.unwrap();

        assert_eq!(user.user_name, "lab-tester");
        assert_eq!(user.role, Role::Tester);
        assert_eq!(user.api_key_hash, hash_api_key(&api_key));
    }

    #[tokio::test]
    async fn registered_key_resolves_to_user() {
        let service = create_service(InMemoryUserRepository::new());
        let (user, api_key) = service.register("doctor", Role::Doctor).await.unwrap();

        let found = service
            .find_by_api_key(&hash_api_key(&api_key))
            .await
            .unwrap();

        assert_eq!(found.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn register_fails_with_empty_name() {
        let service = create_service(InMemoryUserRepository::new());

        let result = service.register("   ", Role::User).await;

        let err = result.unwrap_err().to_string();
        assert!(err.contains("between 1 and 50"));
    }

    #[tokio::test]
    async fn register_fails_with_long_name() {
        let service = create_service(InMemoryUserRepository::new());

        let result = service.register(&"a".repeat(51), Role::User).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn register_fails_with_duplicate_name() {
        let existing = test_user(Role::User);
        let service = create_service(InMemoryUserRepository::new().with_user(existing.clone()));

        let result = service.register(&existing.user_name, Role::Doctor).await;

        let err = result.unwrap_err().to_string();
        assert!(err.contains("already exists"));
    }

    #[tokio::test]
    async fn find_by_id_not_found() {
        let service = create_service(InMemoryUserRepository::new());

        let found = service.find_by_id(&UserId::new()).await.unwrap();

        assert!(found.is_none());
    }
}
