//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`ChatCompletionSource`]) are implemented by
//! outbound adapters. Driving ports (`*Command`, [`LoginService`],
//! [`SessionQuery`]) are implemented by domain services and consumed by the
//! HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod access_request_repository;
mod access_requests_command;
mod account_repository;
mod chat_command;
mod chat_completion_source;
mod event_repository;
mod events_command;
mod login_service;
mod notification_repository;
mod notifications_command;
mod profile_command;
mod profile_repository;
mod role_repository;
mod session_query;
mod task_repository;
mod tasks_command;

#[cfg(test)]
pub use access_request_repository::MockAccessRequestRepository;
pub use access_request_repository::{AccessRequestRepository, AccessRequestRepositoryError};
#[cfg(test)]
pub use access_requests_command::MockAccessRequestsCommand;
pub use access_requests_command::{AccessRequestsCommand, DecisionReceipt, ProvisionedAccount};
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{
    AccountRepository, AccountRepositoryError, NewAccount, StoredCredentials,
};
#[cfg(test)]
pub use chat_command::MockChatCommand;
pub use chat_command::ChatCommand;
#[cfg(test)]
pub use chat_completion_source::MockChatCompletionSource;
pub use chat_completion_source::{
    ChatCompletionError, ChatCompletionSource, UnconfiguredChatSource,
};
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventRepository, EventRepositoryError};
#[cfg(test)]
pub use events_command::MockEventsCommand;
pub use events_command::EventsCommand;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{INVALID_CREDENTIALS, LoginService};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use notifications_command::MockNotificationsCommand;
pub use notifications_command::NotificationsCommand;
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::{CompleteProfileRequest, ProfileCommand};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use role_repository::MockRoleRepository;
pub use role_repository::{RoleRepository, RoleRepositoryError};
#[cfg(test)]
pub use session_query::MockSessionQuery;
pub use session_query::{SessionQuery, SessionSnapshot};
#[cfg(test)]
pub use task_repository::MockTaskRepository;
pub use task_repository::{TaskRepository, TaskRepositoryError};
#[cfg(test)]
pub use tasks_command::MockTasksCommand;
pub use tasks_command::TasksCommand;
