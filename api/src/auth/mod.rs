//! Authentication and role checks
//!
//! Requests carry `Authorization: Bearer <api_key>`; the middleware resolves
//! the key to a `User` and handlers gate operations on the user's role.

mod api_key;

pub use api_key::auth_middleware;

use crate::domain::entities::{Role, User};
use crate::error::AppError;

/// Fail with 403 unless the user has the given role
pub fn require_role(user: &User, role: Role) -> Result<(), AppError> {
    if user.has_role(role) {
        Ok(())
    } else {
        tracing::debug!(user_id = %user.id, role = %user.role, required = %role, "Role check failed");
        Err(AppError::Forbidden)
    }
}
