//! Shared helpers for domain services: port error mapping and role checks.

use serde_json::json;

use crate::domain::ports::{
    AccessRequestRepositoryError, AccountRepositoryError, EventRepositoryError,
    NotificationRepositoryError, ProfileRepositoryError, RoleRepository, RoleRepositoryError,
    TaskRepositoryError,
};
use crate::domain::{Error, Role, UserId};

macro_rules! map_repository_error {
    ($fn_name:ident, $error:ident, $label:literal) => {
        pub(crate) fn $fn_name(error: $error) -> Error {
            match error {
                $error::Connection { message } => {
                    Error::service_unavailable(format!(concat!($label, " unavailable: {}"), message))
                }
                $error::Query { message } => {
                    Error::internal(format!(concat!($label, " error: {}"), message))
                }
            }
        }
    };
}

map_repository_error!(
    map_access_request_error,
    AccessRequestRepositoryError,
    "access request repository"
);
map_repository_error!(map_role_error, RoleRepositoryError, "role repository");
map_repository_error!(map_profile_error, ProfileRepositoryError, "profile repository");
map_repository_error!(map_event_error, EventRepositoryError, "event repository");
map_repository_error!(
    map_notification_error,
    NotificationRepositoryError,
    "notification repository"
);
map_repository_error!(map_task_error, TaskRepositoryError, "task repository");

pub(crate) fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::EmailTaken { email } => email_taken(&email, None),
    }
}

/// Conflict raised when an email is already bound to an account.
pub(crate) fn email_taken(email: &str, request_status: Option<&str>) -> Error {
    let mut details = json!({ "code": "email_taken", "email": email });
    if let Some(status) = request_status {
        details["status"] = json!(status);
    }
    Error::conflict(format!("an account already exists for {email}")).with_details(details)
}

/// Whether `user_id` holds admin.
pub(crate) async fn is_admin<L>(roles: &L, user_id: &UserId) -> Result<bool, Error>
where
    L: RoleRepository + ?Sized,
{
    roles
        .has_role(user_id, Role::Admin)
        .await
        .map_err(map_role_error)
}

/// Fail with `forbidden` unless `user_id` holds admin.
pub(crate) async fn require_admin<L>(roles: &L, user_id: &UserId) -> Result<(), Error>
where
    L: RoleRepository + ?Sized,
{
    if is_admin(roles, user_id).await? {
        Ok(())
    } else {
        Err(Error::forbidden("admin role required"))
    }
}
