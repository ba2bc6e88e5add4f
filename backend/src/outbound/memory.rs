//! In-process adapters used when no database is configured.
//!
//! [`MemoryStore`] implements every driven storage port over one mutex so
//! compare-and-set operations are atomic exactly as they are in PostgreSQL.
//! Contents are lost on restart. Tests and local runs without
//! `HACKTRACK_DATABASE_URL` use it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    AccessRequestRepository, AccessRequestRepositoryError, AccountRepository,
    AccountRepositoryError, EventRepository, EventRepositoryError, NewAccount,
    NotificationRepository, NotificationRepositoryError, ProfileRepository,
    ProfileRepositoryError, RoleRepository, RoleRepositoryError, StoredCredentials,
    TaskRepository, TaskRepositoryError,
};
use crate::domain::{
    AccessRequest, AccessRequestId, AccessRequestStatus, Account, EmailAddress, Event, EventId,
    Notification, NotificationId, PasswordDigest, Profile, Role, RoleSet, StatusTransition, Task, TaskId, UserId,
    Visibility,
};

#[derive(Default)]
struct Tables {
    accounts: HashMap<UserId, StoredCredentials>,
    emails: HashMap<EmailAddress, UserId>,
    profiles: HashMap<UserId, Profile>,
    roles: HashMap<UserId, RoleSet>,
    requests: HashMap<AccessRequestId, AccessRequest>,
    events: HashMap<EventId, Event>,
    tasks: HashMap<TaskId, Task>,
    notifications: HashMap<NotificationId, Notification>,
}

/// Shared in-memory storage implementing the repository ports.
pub struct MemoryStore {
    tables: Mutex<Tables>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Empty store stamping new accounts with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Every mutation completes under the guard, so a poisoned lock still
        // holds consistent tables.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn provision(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError> {
        let mut tables = self.lock();
        if tables.emails.contains_key(&account.email) {
            return Err(AccountRepositoryError::email_taken(
                account.email.as_ref().to_owned(),
            ));
        }
        let created = Account {
            id: UserId::random(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            email_verified: true,
            created_at: self.clock.utc(),
        };
        tables.emails.insert(created.email.clone(), created.id);
        tables
            .profiles
            .insert(created.id, Profile::empty(created.id));
        tables
            .roles
            .insert(created.id, account.roles.iter().copied().collect());
        tables.accounts.insert(
            created.id,
            StoredCredentials {
                account: created.clone(),
                password: account.password.clone(),
            },
        );
        Ok(created)
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        let tables = self.lock();
        Ok(tables
            .emails
            .get(email)
            .and_then(|id| tables.accounts.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(self
            .lock()
            .accounts
            .get(id)
            .map(|stored| stored.account.clone()))
    }

    async fn replace_password(
        &self,
        id: &UserId,
        password: &PasswordDigest,
    ) -> Result<bool, AccountRepositoryError> {
        match self.lock().accounts.get_mut(id) {
            Some(stored) => {
                stored.password = password.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl RoleRepository for MemoryStore {
    async fn roles_for(&self, user_id: &UserId) -> Result<RoleSet, RoleRepositoryError> {
        Ok(self.lock().roles.get(user_id).cloned().unwrap_or_default())
    }

    async fn has_role(&self, user_id: &UserId, role: Role) -> Result<bool, RoleRepositoryError> {
        Ok(self
            .lock()
            .roles
            .get(user_id)
            .is_some_and(|roles| roles.contains(role)))
    }

    async fn grant(&self, user_id: &UserId, role: Role) -> Result<(), RoleRepositoryError> {
        self.lock().roles.entry(*user_id).or_default().insert(role);
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileRepositoryError> {
        Ok(self.lock().profiles.get(user_id).cloned())
    }

    async fn complete(&self, profile: &Profile) -> Result<bool, ProfileRepositoryError> {
        let mut tables = self.lock();
        match tables.profiles.get_mut(&profile.user_id) {
            Some(stored) if !stored.profile_completed => {
                *stored = profile.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl AccessRequestRepository for MemoryStore {
    async fn insert(&self, request: &AccessRequest) -> Result<(), AccessRequestRepositoryError> {
        self.lock().requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn find(
        &self,
        id: &AccessRequestId,
    ) -> Result<Option<AccessRequest>, AccessRequestRepositoryError> {
        Ok(self.lock().requests.get(id).cloned())
    }

    async fn list(
        &self,
        status: Option<AccessRequestStatus>,
    ) -> Result<Vec<AccessRequest>, AccessRequestRepositoryError> {
        let mut requests: Vec<AccessRequest> = self
            .lock()
            .requests
            .values()
            .filter(|request| status.is_none_or(|wanted| request.status == wanted))
            .cloned()
            .collect();
        requests.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(requests)
    }

    async fn transition(
        &self,
        transition: &StatusTransition,
    ) -> Result<bool, AccessRequestRepositoryError> {
        let mut tables = self.lock();
        let Some(request) = tables.requests.get_mut(&transition.id) else {
            return Ok(false);
        };
        if request.status != transition.from {
            return Ok(false);
        }
        request.status = transition.to;
        if let Some((admin, at)) = transition.decided {
            request.decided_by = Some(admin);
            request.decided_at = Some(at);
        }
        Ok(true)
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn insert(&self, event: &Event) -> Result<(), EventRepositoryError> {
        self.lock().events.insert(event.id, event.clone());
        Ok(())
    }

    async fn find(&self, id: &EventId) -> Result<Option<Event>, EventRepositoryError> {
        Ok(self.lock().events.get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Event>, EventRepositoryError> {
        Ok(sorted_events(self.lock().events.values().cloned().collect()))
    }

    async fn list_visible(&self, viewer: &UserId) -> Result<Vec<Event>, EventRepositoryError> {
        let events = self
            .lock()
            .events
            .values()
            .filter(|event| {
                event.created_by == *viewer
                    || (event.approved && event.visibility == Visibility::Shared)
            })
            .cloned()
            .collect();
        Ok(sorted_events(events))
    }

    async fn approve(&self, id: &EventId) -> Result<bool, EventRepositoryError> {
        let mut tables = self.lock();
        match tables.events.get_mut(id) {
            Some(event) if !event.approved => {
                event.approved = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: &EventId) -> Result<bool, EventRepositoryError> {
        Ok(self.lock().events.remove(id).is_some())
    }
}

fn sorted_events(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by(|a, b| {
        a.event_date
            .cmp(&b.event_date)
            .then(a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
    });
    events
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        self.lock()
            .notifications
            .insert(notification.id, notification.clone());
        Ok(())
    }

    async fn list(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut items: Vec<Notification> = self
            .lock()
            .notifications
            .values()
            .filter(|n| n.user_id == *user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(items)
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        owner: &UserId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut tables = self.lock();
        match tables.notifications.get_mut(id) {
            Some(notification) if notification.user_id == *owner => {
                notification.read = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: &UserId) -> Result<u64, NotificationRepositoryError> {
        let mut changed = 0;
        for notification in self.lock().notifications.values_mut() {
            if notification.user_id == *user_id && !notification.read {
                notification.read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn count_unread(&self, user_id: &UserId) -> Result<u64, NotificationRepositoryError> {
        let count = self
            .lock()
            .notifications
            .values()
            .filter(|n| n.user_id == *user_id && !n.read)
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn list(&self, user_id: &UserId) -> Result<Vec<Task>, TaskRepositoryError> {
        let mut tasks: Vec<Task> = self
            .lock()
            .tasks
            .values()
            .filter(|task| task.user_id == *user_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(tasks)
    }

    async fn find(&self, id: &TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        Ok(self.lock().tasks.get(id).cloned())
    }

    async fn insert(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        self.lock().tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> Result<bool, TaskRepositoryError> {
        let mut tables = self.lock();
        match tables.tasks.get_mut(&task.id) {
            Some(stored) if stored.user_id == task.user_id => {
                stored.title = task.title.clone();
                stored.priority = task.priority;
                stored.done = task.done;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: &TaskId, owner: &UserId) -> Result<bool, TaskRepositoryError> {
        let mut tables = self.lock();
        if tables.tasks.get(id).is_some_and(|task| task.user_id == *owner) {
            tables.tasks.remove(id);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
