//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversion into domain types happens in
//! the `TryFrom` impls below, which reject rows the domain would not accept.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AccessRequest, AccessRequestId, Account, EmailAddress, Event, EventId, FullName,
    Notification, NotificationId, PasswordDigest, Profile, Task, TaskId, UserId,
};

use super::schema::{access_requests, accounts, events, notifications, profiles, tasks, user_roles};

/// Raised when a stored row holds a value the domain rejects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("corrupt {table} row: {message}")]
pub(crate) struct RowConversionError {
    table: &'static str,
    message: String,
}

impl RowConversionError {
    fn new(table: &'static str, message: impl ToString) -> Self {
        Self {
            table,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl AccountRow {
    pub(crate) fn into_parts(self) -> Result<(Account, PasswordDigest), RowConversionError> {
        let email =
            EmailAddress::new(&self.email).map_err(|err| RowConversionError::new("accounts", err))?;
        let full_name = FullName::new(&self.full_name)
            .map_err(|err| RowConversionError::new("accounts", err))?;
        let account = Account {
            id: UserId::from_uuid(self.id),
            email,
            full_name,
            email_verified: self.email_verified,
            created_at: self.created_at,
        };
        Ok((account, PasswordDigest::from_stored(self.password_hash)))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub full_name: &'a str,
    pub password_hash: &'a str,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = access_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccessRequestRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub reason: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decided_by: Option<Uuid>,
}

impl From<&AccessRequest> for AccessRequestRow {
    fn from(request: &AccessRequest) -> Self {
        Self {
            id: *request.id.as_uuid(),
            name: request.name.as_ref().to_owned(),
            email: request.email.as_ref().to_owned(),
            reason: request.reason.clone(),
            status: request.status.as_str().to_owned(),
            created_at: request.created_at,
            decided_at: request.decided_at,
            decided_by: request.decided_by.map(|id| *id.as_uuid()),
        }
    }
}

impl TryFrom<AccessRequestRow> for AccessRequest {
    type Error = RowConversionError;

    fn try_from(row: AccessRequestRow) -> Result<Self, Self::Error> {
        let convert = |err: &dyn std::fmt::Display| RowConversionError::new("access_requests", err);
        Ok(Self {
            id: AccessRequestId::from_uuid(row.id),
            name: FullName::new(&row.name).map_err(|err| convert(&err))?,
            email: EmailAddress::new(&row.email).map_err(|err| convert(&err))?,
            reason: row.reason,
            status: row.status.parse().map_err(|err| convert(&err))?,
            created_at: row.created_at,
            decided_at: row.decided_at,
            decided_by: row.decided_by.map(UserId::from_uuid),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = profiles)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProfileRow {
    pub user_id: Uuid,
    pub mobile: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub university_roll_number: Option<String>,
    pub profile_completed: bool,
}

impl From<&Profile> for ProfileRow {
    fn from(profile: &Profile) -> Self {
        Self {
            user_id: *profile.user_id.as_uuid(),
            mobile: profile.mobile.clone(),
            date_of_birth: profile.date_of_birth,
            university_roll_number: profile.university_roll_number.clone(),
            profile_completed: profile.profile_completed,
        }
    }
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.user_id),
            mobile: row.mobile,
            date_of_birth: row.date_of_birth,
            university_roll_number: row.university_roll_number,
            profile_completed: row.profile_completed,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_roles)]
pub(crate) struct UserRoleRow<'a> {
    pub user_id: Uuid,
    pub role: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub created_by: Uuid,
    pub visibility: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: *event.id.as_uuid(),
            title: event.title.clone(),
            description: event.description.clone(),
            event_date: event.event_date,
            created_by: *event.created_by.as_uuid(),
            visibility: event.visibility.as_str().to_owned(),
            approved: event.approved,
            created_at: event.created_at,
        }
    }
}

impl TryFrom<EventRow> for Event {
    type Error = RowConversionError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EventId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            event_date: row.event_date,
            created_by: UserId::from_uuid(row.created_by),
            visibility: row
                .visibility
                .parse()
                .map_err(|err| RowConversionError::new("events", err))?,
            approved: row.approved,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TaskRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub priority: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: *task.id.as_uuid(),
            user_id: *task.user_id.as_uuid(),
            title: task.title.clone(),
            priority: task.priority.as_str().to_owned(),
            done: task.done,
            created_at: task.created_at,
        }
    }
}

impl TryFrom<TaskRow> for Task {
    type Error = RowConversionError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TaskId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            title: row.title,
            priority: row
                .priority
                .parse()
                .map_err(|err| RowConversionError::new("tasks", err))?,
            done: row.done,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationRow {
    fn from(notification: &Notification) -> Self {
        Self {
            id: *notification.id.as_uuid(),
            user_id: *notification.user_id.as_uuid(),
            message: notification.message.clone(),
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: NotificationId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            message: row.message,
            read: row.read,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_timestamp;
    use rstest::rstest;

    #[rstest]
    fn unknown_status_is_rejected() {
        let row = AccessRequestRow {
            id: Uuid::new_v4(),
            name: "Alice".to_owned(),
            email: "alice@x.com".to_owned(),
            reason: None,
            status: "limbo".to_owned(),
            created_at: fixture_timestamp(),
            decided_at: None,
            decided_by: None,
        };
        let err = AccessRequest::try_from(row).expect_err("corrupt status");
        assert!(err.to_string().contains("access_requests"));
    }

    #[rstest]
    fn task_row_round_trips_priority() {
        let row = TaskRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Ship demo".to_owned(),
            priority: "high".to_owned(),
            done: false,
            created_at: fixture_timestamp(),
        };
        let task = Task::try_from(row).expect("valid row");
        assert_eq!(TaskRow::from(&task).priority, "high");
    }
}
