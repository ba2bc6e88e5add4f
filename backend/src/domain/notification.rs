//! Per-user notification inbox.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserId;

/// Default number of notifications returned by a feed read.
pub const DEFAULT_FEED_LIMIT: u32 = 50;
/// Upper bound a caller may request.
pub const MAX_FEED_LIMIT: u32 = 100;

/// Identifier of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct NotificationId(Uuid);

impl NotificationId {
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

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A system message addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification identifier.
    pub id: NotificationId,
    /// Recipient.
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    /// Message text.
    pub message: String,
    /// Whether the recipient has read it.
    pub read: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// New unread notification.
    #[must_use]
    pub fn unread(user_id: UserId, message: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: NotificationId::random(),
            user_id,
            message: message.into(),
            read: false,
            created_at,
        }
    }
}

/// Clamp a requested page size into `1..=MAX_FEED_LIMIT`.
///
/// # Examples
/// ```
/// use hacktrack::domain::feed_limit;
///
/// assert_eq!(feed_limit(None), 50);
/// assert_eq!(feed_limit(Some(0)), 1);
/// assert_eq!(feed_limit(Some(500)), 100);
/// ```
#[must_use]
pub fn feed_limit(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_FEED_LIMIT)
        .clamp(1, MAX_FEED_LIMIT)
}

/// One page of a user's inbox.
///
/// `unread_count` is derived from the page and under-counts when more than
/// one page of unread items exists; `unread_total` is the stored aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeed {
    /// Newest first.
    pub notifications: Vec<Notification>,
    /// Unread items within `notifications`.
    pub unread_count: u64,
    /// Unread items across the whole inbox.
    pub unread_total: u64,
}

impl NotificationFeed {
    /// Assemble a feed from a fetched page and the stored unread total.
    #[must_use]
    pub fn new(notifications: Vec<Notification>, unread_total: u64) -> Self {
        let unread_count = notifications.iter().filter(|n| !n.read).count() as u64;
        Self {
            notifications,
            unread_count,
            unread_total,
        }
    }
}
