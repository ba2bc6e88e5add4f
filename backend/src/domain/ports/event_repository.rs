//! Port for event persistence.

use async_trait::async_trait;

use crate::domain::{Event, EventId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by event repository adapters.
    pub enum EventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "event repository query failed: {message}",
    }
}

/// Storage contract for events. Lists are ordered by event date ascending.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist a new event.
    async fn insert(&self, event: &Event) -> Result<(), EventRepositoryError>;

    /// Fetch an event by id.
    async fn find(&self, id: &EventId) -> Result<Option<Event>, EventRepositoryError>;

    /// Every event.
    async fn list_all(&self) -> Result<Vec<Event>, EventRepositoryError>;

    /// Approved shared events plus everything created by `viewer`.
    async fn list_visible(&self, viewer: &UserId) -> Result<Vec<Event>, EventRepositoryError>;

    /// Set `approved` if it is still false. Returns whether this call did it.
    async fn approve(&self, id: &EventId) -> Result<bool, EventRepositoryError>;

    /// Remove an event. Returns whether a row was deleted.
    async fn delete(&self, id: &EventId) -> Result<bool, EventRepositoryError>;
}
