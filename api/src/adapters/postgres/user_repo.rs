//! PostgreSQL adapter for UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::parse_column;
use crate::domain::entities::{NewUser, User, UserId};
use crate::domain::ports::UserRepository;
use crate::entity::users;
use crate::error::DomainError;

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(User::try_from).transpose()
    }

    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find()
            .filter(users::Column::ApiKeyHash.eq(hash))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(User::try_from).transpose()
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find()
            .filter(users::Column::UserName.eq(user_name))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(User::try_from).transpose()
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let model = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_name: Set(user.user_name.clone()),
            role: Set(user.role.to_string()),
            api_key_hash: Set(user.api_key_hash.clone()),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        User::try_from(result)
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<users::Model> for User {
    type Error = DomainError;

    fn try_from(model: users::Model) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(model.id),
            user_name: model.user_name,
            role: parse_column(&model.role)?,
            api_key_hash: model.api_key_hash,
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}
