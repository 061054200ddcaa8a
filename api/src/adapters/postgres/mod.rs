//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod schema;
pub mod test_request_repo;
pub mod user_repo;


pub use schema::ensure_schema;
pub use test_request_repo::PostgresTestRequestRepository;
pub use user_repo::PostgresUserRepository;

use crate::error::DomainError;

/// Parse an enum stored as text, treating unknown values as corruption
pub(crate) fn parse_column<T>(value: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e: String| DomainError::Internal(format!("Corrupt column value: {}", e)))
}
