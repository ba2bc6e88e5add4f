//! Port for member profiles.

use async_trait::async_trait;

use crate::domain::{Profile, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "profile repository query failed: {message}",
    }
}

/// Storage contract for profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile owned by `user_id`.
    async fn find(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Store a completed profile if the stored row is still incomplete.
    ///
    /// Returns `false` when the profile was already completed or is missing.
    async fn complete(&self, profile: &Profile) -> Result<bool, ProfileRepositoryError>;
}
