//! Invite-only access requests.
//!
//! A request is created by an unauthenticated visitor and decided exactly
//! once by an admin. Approval passes through the transient
//! [`AccessRequestStatus::Provisioning`] claim while the account is created;
//! a failed provisioning step puts the request back to `pending`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{EmailAddress, FullName, IdentityValidationError, UserId};

/// Maximum accepted length of the free-text reason.
pub const REASON_MAX: usize = 2000;

/// Identifier of an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct AccessRequestId(Uuid);

impl AccessRequestId {
    /// Generate a new identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a stored UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Borrow the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccessRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Lifecycle state of an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccessRequestStatus {
    /// Awaiting an admin decision.
    Pending,
    /// Claimed by an approval that is creating the account.
    Provisioning,
    /// Approved and provisioned. Terminal.
    Approved,
    /// Rejected. Terminal.
    Rejected,
}

impl AccessRequestStatus {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Provisioning => "provisioning",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// ```text
    /// pending -> provisioning -> approved
    ///    |  ^          |
    ///    |  +----------+  (provisioning failed)
    ///    +-> rejected
    /// ```
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Provisioning)
                | (Self::Pending, Self::Rejected)
                | (Self::Provisioning, Self::Approved)
                | (Self::Provisioning, Self::Pending)
        )
    }
}

impl fmt::Display for AccessRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown access request status: {0}")]
pub struct UnknownAccessRequestStatus(pub String);

impl FromStr for AccessRequestStatus {
    type Err = UnknownAccessRequestStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "provisioning" => Ok(Self::Provisioning),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownAccessRequestStatus(other.to_owned())),
        }
    }
}

/// Admin verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DecisionOutcome {
    /// Provision an account for the requester.
    Approved,
    /// Close the request without an account.
    Rejected,
}

/// A stored access request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    /// Request identifier.
    pub id: AccessRequestId,
    /// Requester's name.
    pub name: FullName,
    /// Email the account will be bound to.
    pub email: EmailAddress,
    /// Optional free-text motivation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Current status.
    pub status: AccessRequestStatus,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// When a terminal decision was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
    /// Admin who recorded the terminal decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub decided_by: Option<UserId>,
}

/// Validated submission from the public request form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccessRequest {
    name: FullName,
    email: EmailAddress,
    reason: Option<String>,
}

/// Validation failures for a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessRequestValidationError {
    /// Name or email failed validation.
    #[error(transparent)]
    Identity(#[from] IdentityValidationError),
    /// Reason exceeded [`REASON_MAX`].
    #[error("reason must be at most {max} characters")]
    ReasonTooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

impl NewAccessRequest {
    /// Validate raw form input. Blank reasons are dropped.
    ///
    /// # Examples
    /// ```
    /// use hacktrack::domain::NewAccessRequest;
    ///
    /// let req = NewAccessRequest::try_from_parts(" Alice ", "alice@x.com", Some("  ")).unwrap();
    /// assert_eq!(req.name().as_ref(), "Alice");
    /// assert!(req.reason().is_none());
    /// ```
    pub fn try_from_parts(
        name: &str,
        email: &str,
        reason: Option<&str>,
    ) -> Result<Self, AccessRequestValidationError> {
        let name = FullName::new(name)?;
        let email = EmailAddress::new(email)?;
        let reason = reason
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        if let Some(text) = &reason
            && text.chars().count() > REASON_MAX
        {
            return Err(AccessRequestValidationError::ReasonTooLong { max: REASON_MAX });
        }
        Ok(Self {
            name,
            email,
            reason,
        })
    }

    /// Requester name.
    pub fn name(&self) -> &FullName {
        &self.name
    }

    /// Requester email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Optional motivation.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Materialise a pending request.
    #[must_use]
    pub fn into_request(self, id: AccessRequestId, created_at: DateTime<Utc>) -> AccessRequest {
        AccessRequest {
            id,
            name: self.name,
            email: self.email,
            reason: self.reason,
            status: AccessRequestStatus::Pending,
            created_at,
            decided_at: None,
            decided_by: None,
        }
    }
}

/// Compare-and-set instruction for a status change.
///
/// Adapters apply it only when the stored status still equals `from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    /// Target request.
    pub id: AccessRequestId,
    /// Status the caller observed.
    pub from: AccessRequestStatus,
    /// Status to write.
    pub to: AccessRequestStatus,
    /// Decision metadata, set only for terminal transitions.
    pub decided: Option<(UserId, DateTime<Utc>)>,
}
