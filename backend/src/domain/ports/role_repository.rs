//! Port for role assignments.

use async_trait::async_trait;

use crate::domain::{Role, RoleSet, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by role repository adapters.
    pub enum RoleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "role repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "role repository query failed: {message}",
    }
}

/// Read access to roles plus the out-of-band grant used at bootstrap.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// All roles held by `user_id`.
    async fn roles_for(&self, user_id: &UserId) -> Result<RoleSet, RoleRepositoryError>;

    /// Whether `user_id` holds `role`.
    async fn has_role(&self, user_id: &UserId, role: Role) -> Result<bool, RoleRepositoryError>;

    /// Grant `role`; granting an existing role is a no-op.
    async fn grant(&self, user_id: &UserId, role: Role) -> Result<(), RoleRepositoryError>;
}
