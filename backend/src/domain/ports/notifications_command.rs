//! Driving port for the notification feed.

use async_trait::async_trait;

use crate::domain::{Error, NotificationFeed, NotificationId, UserId};

/// Notification use-cases for the inbox owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsCommand: Send + Sync {
    /// Newest-first page with both unread counts.
    async fn feed(&self, user_id: &UserId, limit: u32) -> Result<NotificationFeed, Error>;

    /// Mark one notification read; other users' items are `not_found`.
    async fn mark_read(&self, user_id: &UserId, id: &NotificationId) -> Result<(), Error>;

    /// Mark everything read; returns how many changed.
    async fn mark_all_read(&self, user_id: &UserId) -> Result<u64, Error>;
}
