//! Driving port for the access request workflow.
//!
//! Public submission plus the admin-only listing, decision and direct
//! provisioning use-cases. Implementations check the admin role server-side
//! before touching any request.

use async_trait::async_trait;

use crate::domain::{
    AccessRequest, AccessRequestId, AccessRequestStatus, Account, DecisionOutcome, EmailAddress,
    Error, FullName, NewAccessRequest, TemporaryCredential, UserId,
};

/// Result of a successful decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionReceipt {
    /// The request as the decision left it. `provisioning` means the
    /// account exists but the final status write failed.
    pub request: AccessRequest,
    /// Issued only on approval; shown to the admin once.
    pub temporary_password: Option<TemporaryCredential>,
}

/// An account created by provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedAccount {
    /// The new account.
    pub account: Account,
    /// Its initial password.
    pub temporary_password: TemporaryCredential,
}

/// Access request use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessRequestsCommand: Send + Sync {
    /// Record a request from an unauthenticated visitor.
    async fn submit(&self, request: NewAccessRequest) -> Result<AccessRequest, Error>;

    /// List requests for an admin, optionally filtered by status.
    async fn list(
        &self,
        actor: &UserId,
        status: Option<AccessRequestStatus>,
    ) -> Result<Vec<AccessRequest>, Error>;

    /// Approve or reject a pending request.
    async fn decide(
        &self,
        actor: &UserId,
        id: &AccessRequestId,
        outcome: DecisionOutcome,
    ) -> Result<DecisionReceipt, Error>;

    /// Provision an account directly, without a stored request.
    async fn provision(
        &self,
        actor: &UserId,
        email: EmailAddress,
        full_name: FullName,
    ) -> Result<ProvisionedAccount, Error>;
}
