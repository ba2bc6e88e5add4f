//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL through `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Compare-and-set semantics live in the `WHERE` clauses.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: pool and Diesel failures map onto each port's
//!   `connection`/`query` variants.

mod diesel_access_request_repository;
mod diesel_account_repository;
mod diesel_event_repository;
mod diesel_notification_repository;
mod diesel_profile_repository;
mod diesel_role_repository;
mod diesel_task_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_access_request_repository::DieselAccessRequestRepository;
pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_event_repository::DieselEventRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_role_repository::DieselRoleRepository;
pub use diesel_task_repository::DieselTaskRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
