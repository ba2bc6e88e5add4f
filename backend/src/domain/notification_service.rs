//! Notification feed service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{NotificationRepository, NotificationsCommand};
use crate::domain::service_support::map_notification_error;
use crate::domain::{Error, NotificationFeed, NotificationId, UserId};

/// Service implementing [`NotificationsCommand`].
#[derive(Clone)]
pub struct NotificationService<N> {
    notifications: Arc<N>,
}

impl<N> NotificationService<N> {
    /// Create a service over the notification repository.
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl<N> NotificationsCommand for NotificationService<N>
where
    N: NotificationRepository,
{
    async fn feed(&self, user_id: &UserId, limit: u32) -> Result<NotificationFeed, Error> {
        let notifications = self
            .notifications
            .list(user_id, limit)
            .await
            .map_err(map_notification_error)?;
        let unread_total = self
            .notifications
            .count_unread(user_id)
            .await
            .map_err(map_notification_error)?;
        Ok(NotificationFeed::new(notifications, unread_total))
    }

    async fn mark_read(&self, user_id: &UserId, id: &NotificationId) -> Result<(), Error> {
        let changed = self
            .notifications
            .mark_read(id, user_id)
            .await
            .map_err(map_notification_error)?;
        if changed {
            Ok(())
        } else {
            Err(Error::not_found("notification not found"))
        }
    }

    async fn mark_all_read(&self, user_id: &UserId) -> Result<u64, Error> {
        let changed = self
            .notifications
            .mark_all_read(user_id)
            .await
            .map_err(map_notification_error)?;
        debug!(user_id = %user_id, changed, "marked notifications read");
        Ok(changed)
    }
}
