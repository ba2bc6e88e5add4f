//! Port for the notification inbox.

use async_trait::async_trait;

use crate::domain::{Notification, NotificationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification repository query failed: {message}",
    }
}

/// Storage contract for notifications. Every mutation is scoped to an owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a notification.
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError>;

    /// Newest first, at most `limit` items.
    async fn list(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Mark one notification read if `owner` owns it.
    ///
    /// Returns `false` when no such notification belongs to `owner`.
    async fn mark_read(
        &self,
        id: &NotificationId,
        owner: &UserId,
    ) -> Result<bool, NotificationRepositoryError>;

    /// Mark every unread notification of `user_id` read; returns how many.
    async fn mark_all_read(&self, user_id: &UserId) -> Result<u64, NotificationRepositoryError>;

    /// Unread notifications across the whole inbox.
    async fn count_unread(&self, user_id: &UserId) -> Result<u64, NotificationRepositoryError>;
}
