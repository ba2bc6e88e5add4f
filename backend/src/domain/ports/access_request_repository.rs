//! Port for access request persistence.
//!
//! Status changes go through [`AccessRequestRepository::transition`], a
//! compare-and-set on the current status. Two admins deciding the same
//! request race on that write and exactly one of them observes `true`.

use async_trait::async_trait;

use crate::domain::{AccessRequest, AccessRequestId, AccessRequestStatus, StatusTransition};

use super::define_port_error;

define_port_error! {
    /// Errors raised by access request repository adapters.
    pub enum AccessRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "access request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "access request repository query failed: {message}",
    }
}

/// Storage contract for access requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessRequestRepository: Send + Sync {
    /// Persist a new request.
    async fn insert(&self, request: &AccessRequest) -> Result<(), AccessRequestRepositoryError>;

    /// Fetch a request by id.
    async fn find(
        &self,
        id: &AccessRequestId,
    ) -> Result<Option<AccessRequest>, AccessRequestRepositoryError>;

    /// List requests, newest first, optionally filtered by status.
    async fn list(
        &self,
        status: Option<AccessRequestStatus>,
    ) -> Result<Vec<AccessRequest>, AccessRequestRepositoryError>;

    /// Apply `transition` only if the stored status equals `transition.from`.
    ///
    /// Returns `false` when the status had already moved on or the request
    /// does not exist.
    async fn transition(
        &self,
        transition: &StatusTransition,
    ) -> Result<bool, AccessRequestRepositoryError>;
}
