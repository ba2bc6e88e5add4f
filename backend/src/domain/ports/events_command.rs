//! Driving port for events and event approval.

use async_trait::async_trait;

use crate::domain::{Error, Event, EventDraft, EventId, UserId};

/// Event use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventsCommand: Send + Sync {
    /// Events visible to `actor`, by date ascending.
    async fn list(&self, actor: &UserId) -> Result<Vec<Event>, Error>;

    /// Create an event; approved immediately only when `actor` is an admin.
    async fn create(&self, actor: &UserId, draft: EventDraft) -> Result<Event, Error>;

    /// Approve a pending event (admin only) and notify its creator.
    async fn approve(&self, actor: &UserId, id: &EventId) -> Result<Event, Error>;

    /// Delete an event (admin or creator).
    async fn delete(&self, actor: &UserId, id: &EventId) -> Result<(), Error>;
}
