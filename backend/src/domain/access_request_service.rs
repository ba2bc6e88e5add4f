//! Access request workflow: submission, listing and admin decisions.
//!
//! Approval is two writes that are not one transaction: the status change
//! and the account creation. The request is first claimed by moving it to
//! `provisioning`; if provisioning fails the claim is reverted to `pending`
//! so the admin can simply approve again. A request left in `provisioning`
//! by a failed final write or a crash is settled by deciding it again.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    AccessRequestRepository, AccessRequestsCommand, AccountRepository, AccountRepositoryError,
    DecisionReceipt, NewAccount, ProvisionedAccount, RoleRepository,
};
use crate::domain::service_support::{
    email_taken, map_access_request_error, map_account_error, require_admin,
};
use crate::domain::{
    AccessRequest, AccessRequestId, AccessRequestStatus, CredentialGenerator, DecisionOutcome,
    EmailAddress, Error, FullName, NewAccessRequest, Role, StatusTransition, TemporaryCredential,
    UserId, hash_password,
};

/// Attempts at the final `provisioning -> approved` write.
const FINALISE_ATTEMPTS: u32 = 3;

/// Access request service implementing [`AccessRequestsCommand`].
#[derive(Clone)]
pub struct AccessRequestService<R, A, L> {
    requests: Arc<R>,
    accounts: Arc<A>,
    roles: Arc<L>,
    credentials: Arc<dyn CredentialGenerator>,
    clock: Arc<dyn Clock>,
}

impl<R, A, L> AccessRequestService<R, A, L> {
    /// Create a service over the given repositories.
    pub fn new(
        requests: Arc<R>,
        accounts: Arc<A>,
        roles: Arc<L>,
        credentials: Arc<dyn CredentialGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            requests,
            accounts,
            roles,
            credentials,
            clock,
        }
    }
}

/// Why a provisioning attempt failed.
enum ProvisioningFailure {
    EmailTaken,
    Unavailable(String),
}

impl<R, A, L> AccessRequestService<R, A, L>
where
    R: AccessRequestRepository,
    A: AccountRepository,
    L: RoleRepository,
{
    fn already_decided(status: AccessRequestStatus) -> Error {
        Error::conflict(format!("access request is already {status}")).with_details(json!({
            "code": "already_decided",
            "status": status.as_str(),
        }))
    }

    async fn load(&self, id: &AccessRequestId) -> Result<AccessRequest, Error> {
        self.requests
            .find(id)
            .await
            .map_err(map_access_request_error)?
            .ok_or_else(|| Error::not_found(format!("access request {id} not found")))
    }

    /// Compare-and-set; losing the race surfaces as a conflict carrying the
    /// status that won.
    async fn transition(&self, transition: StatusTransition) -> Result<(), Error> {
        let applied = self
            .requests
            .transition(&transition)
            .await
            .map_err(map_access_request_error)?;
        if applied {
            return Ok(());
        }
        let current = self.load(&transition.id).await?;
        Err(Self::already_decided(current.status))
    }

    async fn provision_account(
        &self,
        email: EmailAddress,
        full_name: FullName,
    ) -> Result<ProvisionedAccount, ProvisioningFailure> {
        let temporary_password = self.credentials.generate();
        let password = hash_password(temporary_password.expose())
            .map_err(|err| ProvisioningFailure::Unavailable(err.to_string()))?;
        let new_account = NewAccount {
            email,
            full_name,
            password,
            roles: vec![Role::User],
        };
        match self.accounts.provision(&new_account).await {
            Ok(account) => Ok(ProvisionedAccount {
                account,
                temporary_password,
            }),
            Err(AccountRepositoryError::EmailTaken { .. }) => Err(ProvisioningFailure::EmailTaken),
            Err(err) => Err(ProvisioningFailure::Unavailable(err.to_string())),
        }
    }

    async fn reject(&self, actor: &UserId, request: AccessRequest) -> Result<DecisionReceipt, Error> {
        let decided_at = self.clock.utc();
        self.transition(StatusTransition {
            id: request.id,
            from: request.status,
            to: AccessRequestStatus::Rejected,
            decided: Some((*actor, decided_at)),
        })
        .await?;
        info!(request_id = %request.id, admin = %actor, "access request rejected");
        Ok(DecisionReceipt {
            request: AccessRequest {
                status: AccessRequestStatus::Rejected,
                decided_at: Some(decided_at),
                decided_by: Some(*actor),
                ..request
            },
            temporary_password: None,
        })
    }

    async fn approve(&self, actor: &UserId, request: AccessRequest) -> Result<DecisionReceipt, Error> {
        self.transition(StatusTransition {
            id: request.id,
            from: AccessRequestStatus::Pending,
            to: AccessRequestStatus::Provisioning,
            decided: None,
        })
        .await?;
        let request = AccessRequest {
            status: AccessRequestStatus::Provisioning,
            ..request
        };
        self.provision_and_finalise(actor, request).await
    }

    async fn provision_and_finalise(
        &self,
        actor: &UserId,
        request: AccessRequest,
    ) -> Result<DecisionReceipt, Error> {
        match self
            .provision_account(request.email.clone(), request.name.clone())
            .await
        {
            Ok(provisioned) => {
                self.finalise(
                    actor,
                    request,
                    provisioned.account.id,
                    provisioned.temporary_password,
                )
                .await
            }
            Err(failure) => Err(self.restore_pending(&request, failure).await),
        }
    }

    /// Decide a request still holding a `provisioning` claim.
    ///
    /// An account created for the request after it was submitted means only
    /// the final write is missing: approving issues that account a fresh
    /// credential and completes the approval, while rejecting is refused.
    /// Without such an account the claim is treated as abandoned.
    async fn settle(
        &self,
        actor: &UserId,
        request: AccessRequest,
        outcome: DecisionOutcome,
    ) -> Result<DecisionReceipt, Error> {
        let existing = self
            .accounts
            .find_credentials(&request.email)
            .await
            .map_err(map_account_error)?
            .map(|stored| stored.account);
        let Some(account) = existing else {
            warn!(request_id = %request.id, "settling an abandoned provisioning claim");
            return match outcome {
                DecisionOutcome::Approved => self.provision_and_finalise(actor, request).await,
                DecisionOutcome::Rejected => self.reject(actor, request).await,
            };
        };
        if account.created_at < request.created_at {
            return Err(self
                .restore_pending(&request, ProvisioningFailure::EmailTaken)
                .await);
        }
        match outcome {
            DecisionOutcome::Rejected => Err(Error::conflict(
                "an account was already provisioned for this request; approve it to finish",
            )
            .with_details(json!({
                "code": "already_provisioned",
                "status": AccessRequestStatus::Provisioning.as_str(),
            }))),
            DecisionOutcome::Approved => {
                let temporary_password = self.credentials.generate();
                let password = hash_password(temporary_password.expose())
                    .map_err(|err| Error::internal(err.to_string()))?;
                let replaced = self
                    .accounts
                    .replace_password(&account.id, &password)
                    .await
                    .map_err(map_account_error)?;
                if !replaced {
                    return Err(Error::not_found(format!(
                        "account {} disappeared while settling",
                        account.id
                    )));
                }
                warn!(
                    request_id = %request.id,
                    account_id = %account.id,
                    "reissued credential for an interrupted approval"
                );
                self.finalise(actor, request, account.id, temporary_password)
                    .await
            }
        }
    }

    /// Move a provisioned request to `approved`, retrying transient failures.
    ///
    /// When every attempt fails the credential is still returned with the
    /// request reported as `provisioning`, so the account stays reachable and
    /// a later approval settles the status.
    async fn finalise(
        &self,
        actor: &UserId,
        request: AccessRequest,
        account_id: UserId,
        temporary_password: TemporaryCredential,
    ) -> Result<DecisionReceipt, Error> {
        let decided_at = self.clock.utc();
        let transition = StatusTransition {
            id: request.id,
            from: AccessRequestStatus::Provisioning,
            to: AccessRequestStatus::Approved,
            decided: Some((*actor, decided_at)),
        };
        let mut attempt = 1;
        let written = loop {
            match self.requests.transition(&transition).await {
                Err(err) if attempt < FINALISE_ATTEMPTS => {
                    warn!(request_id = %request.id, attempt, error = %err, "approval write failed");
                    attempt += 1;
                }
                result => break result,
            }
        };
        match written {
            Ok(true) => {
                info!(
                    request_id = %request.id,
                    account_id = %account_id,
                    admin = %actor,
                    "access request approved"
                );
                Ok(DecisionReceipt {
                    request: AccessRequest {
                        status: AccessRequestStatus::Approved,
                        decided_at: Some(decided_at),
                        decided_by: Some(*actor),
                        ..request
                    },
                    temporary_password: Some(temporary_password),
                })
            }
            Ok(false) => {
                error!(
                    request_id = %request.id,
                    account_id = %account_id,
                    "account provisioned but request left its provisioning claim"
                );
                Err(Error::internal(
                    "access request changed while its account was being provisioned",
                ))
            }
            Err(err) => {
                error!(
                    request_id = %request.id,
                    account_id = %account_id,
                    error = %err,
                    "account provisioned but approval write failed; approve again to settle"
                );
                Ok(DecisionReceipt {
                    request,
                    temporary_password: Some(temporary_password),
                })
            }
        }
    }

    /// Compensate a failed provisioning step and describe the failure.
    async fn restore_pending(&self, request: &AccessRequest, failure: ProvisioningFailure) -> Error {
        let revert = self
            .requests
            .transition(&StatusTransition {
                id: request.id,
                from: AccessRequestStatus::Provisioning,
                to: AccessRequestStatus::Pending,
                decided: None,
            })
            .await;
        match revert {
            Ok(true) => {}
            Ok(false) => warn!(request_id = %request.id, "provisioning claim vanished before revert"),
            Err(err) => {
                error!(request_id = %request.id, error = %err, "failed to restore pending status");
            }
        }
        let pending = AccessRequestStatus::Pending.as_str();
        match failure {
            ProvisioningFailure::EmailTaken => {
                warn!(request_id = %request.id, "approval blocked: email already has an account");
                email_taken(request.email.as_ref(), Some(pending))
            }
            ProvisioningFailure::Unavailable(message) => {
                warn!(request_id = %request.id, error = %message, "account provisioning failed");
                Error::service_unavailable(
                    "account provisioning failed; the request was returned to pending",
                )
                .with_details(json!({ "code": "provisioning_failed", "status": pending }))
            }
        }
    }
}

#[async_trait]
impl<R, A, L> AccessRequestsCommand for AccessRequestService<R, A, L>
where
    R: AccessRequestRepository,
    A: AccountRepository,
    L: RoleRepository,
{
    async fn submit(&self, request: NewAccessRequest) -> Result<AccessRequest, Error> {
        let request = request.into_request(AccessRequestId::random(), self.clock.utc());
        self.requests
            .insert(&request)
            .await
            .map_err(map_access_request_error)?;
        info!(request_id = %request.id, "access request submitted");
        Ok(request)
    }

    async fn list(
        &self,
        actor: &UserId,
        status: Option<AccessRequestStatus>,
    ) -> Result<Vec<AccessRequest>, Error> {
        require_admin(self.roles.as_ref(), actor).await?;
        self.requests
            .list(status)
            .await
            .map_err(map_access_request_error)
    }

    async fn decide(
        &self,
        actor: &UserId,
        id: &AccessRequestId,
        outcome: DecisionOutcome,
    ) -> Result<DecisionReceipt, Error> {
        require_admin(self.roles.as_ref(), actor).await?;
        let request = self.load(id).await?;
        match (request.status, outcome) {
            (AccessRequestStatus::Pending, DecisionOutcome::Rejected) => {
                self.reject(actor, request).await
            }
            (AccessRequestStatus::Pending, DecisionOutcome::Approved) => {
                self.approve(actor, request).await
            }
            (AccessRequestStatus::Provisioning, outcome) => {
                self.settle(actor, request, outcome).await
            }
            (status, _) => Err(Self::already_decided(status)),
        }
    }

    async fn provision(
        &self,
        actor: &UserId,
        email: EmailAddress,
        full_name: FullName,
    ) -> Result<ProvisionedAccount, Error> {
        require_admin(self.roles.as_ref(), actor).await?;
        match self.provision_account(email.clone(), full_name).await {
            Ok(provisioned) => {
                info!(account_id = %provisioned.account.id, admin = %actor, "account provisioned");
                Ok(provisioned)
            }
            Err(ProvisioningFailure::EmailTaken) => Err(email_taken(email.as_ref(), None)),
            Err(ProvisioningFailure::Unavailable(message)) => {
                warn!(error = %message, "direct account provisioning failed");
                Err(Error::service_unavailable("account provisioning failed")
                    .with_details(json!({ "code": "provisioning_failed" })))
            }
        }
    }
}

#[cfg(test)]
#[path = "access_request_service_tests.rs"]
mod tests;
