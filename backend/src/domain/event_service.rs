//! Event service: creation, visibility, approval and deletion.
//!
//! Notifications to creators are best effort. A failed insert is logged and
//! never fails the event operation itself.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{EventRepository, EventsCommand, NotificationRepository, RoleRepository};
use crate::domain::service_support::{is_admin, map_event_error, require_admin};
use crate::domain::{
    Error, Event, EventDraft, EventId, Notification, UserId, approved_message, submitted_message,
};

/// Service implementing [`EventsCommand`].
#[derive(Clone)]
pub struct EventService<E, L, N> {
    events: Arc<E>,
    roles: Arc<L>,
    notifications: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<E, L, N> EventService<E, L, N> {
    /// Create a service over the given repositories.
    pub fn new(events: Arc<E>, roles: Arc<L>, notifications: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            events,
            roles,
            notifications,
            clock,
        }
    }
}

fn already_approved() -> Error {
    Error::conflict("event is already approved").with_details(json!({ "code": "already_approved" }))
}

impl<E, L, N> EventService<E, L, N>
where
    E: EventRepository,
    L: RoleRepository,
    N: NotificationRepository,
{
    async fn load(&self, id: &EventId) -> Result<Event, Error> {
        self.events
            .find(id)
            .await
            .map_err(map_event_error)?
            .ok_or_else(|| Error::not_found(format!("event {id} not found")))
    }

    async fn notify(&self, recipient: UserId, message: String) {
        let notification = Notification::unread(recipient, message, self.clock.utc());
        if let Err(err) = self.notifications.insert(&notification).await {
            warn!(user_id = %recipient, error = %err, "failed to deliver event notification");
        }
    }
}

#[async_trait]
impl<E, L, N> EventsCommand for EventService<E, L, N>
where
    E: EventRepository,
    L: RoleRepository,
    N: NotificationRepository,
{
    async fn list(&self, actor: &UserId) -> Result<Vec<Event>, Error> {
        let events = if is_admin(self.roles.as_ref(), actor).await? {
            self.events.list_all().await
        } else {
            self.events.list_visible(actor).await
        };
        events.map_err(map_event_error)
    }

    async fn create(&self, actor: &UserId, draft: EventDraft) -> Result<Event, Error> {
        let admin = is_admin(self.roles.as_ref(), actor).await?;
        let event = draft.into_event(EventId::random(), *actor, admin, self.clock.utc());
        self.events.insert(&event).await.map_err(map_event_error)?;
        info!(event_id = %event.id, creator = %actor, approved = admin, "event created");
        if !admin {
            self.notify(*actor, submitted_message(&event.title)).await;
        }
        Ok(event)
    }

    async fn approve(&self, actor: &UserId, id: &EventId) -> Result<Event, Error> {
        require_admin(self.roles.as_ref(), actor).await?;
        let event = self.load(id).await?;
        if event.approved {
            return Err(already_approved());
        }
        if !self.events.approve(id).await.map_err(map_event_error)? {
            return Err(already_approved());
        }
        info!(event_id = %id, admin = %actor, "event approved");
        self.notify(event.created_by, approved_message(&event.title))
            .await;
        Ok(Event {
            approved: true,
            ..event
        })
    }

    async fn delete(&self, actor: &UserId, id: &EventId) -> Result<(), Error> {
        let admin = is_admin(self.roles.as_ref(), actor).await?;
        let event = self.load(id).await?;
        if !event.is_visible_to(actor, admin) {
            return Err(Error::not_found(format!("event {id} not found")));
        }
        if !event.can_be_deleted_by(actor, admin) {
            return Err(Error::forbidden("only the creator or an admin may delete this event"));
        }
        if !self.events.delete(id).await.map_err(map_event_error)? {
            return Err(Error::not_found(format!("event {id} not found")));
        }
        info!(event_id = %id, actor = %actor, "event deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "event_service_tests.rs"]
mod tests;
