//! Driving port that restores the auth context for a session.

use async_trait::async_trait;

use crate::domain::{Account, AuthenticatedSession, Error, UserId};

/// Everything the auth context needs about a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// The account behind the session.
    pub account: Account,
    /// Gate flag and roles.
    pub session: AuthenticatedSession,
}

/// Loads profile flag and roles for a session's user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionQuery: Send + Sync {
    /// `None` when the account no longer exists.
    async fn load(&self, user_id: &UserId) -> Result<Option<SessionSnapshot>, Error>;
}
