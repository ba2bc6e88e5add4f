//! Port for task persistence.

use async_trait::async_trait;

use crate::domain::{Task, TaskId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by task repository adapters.
    pub enum TaskRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "task repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "task repository query failed: {message}",
    }
}

/// Storage contract for tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Tasks owned by `user_id`, newest first.
    async fn list(&self, user_id: &UserId) -> Result<Vec<Task>, TaskRepositoryError>;

    /// Fetch a task by id regardless of owner.
    async fn find(&self, id: &TaskId) -> Result<Option<Task>, TaskRepositoryError>;

    /// Persist a new task.
    async fn insert(&self, task: &Task) -> Result<(), TaskRepositoryError>;

    /// Overwrite title, priority and done for the owner's task.
    async fn update(&self, task: &Task) -> Result<bool, TaskRepositoryError>;

    /// Delete the task if `owner` owns it.
    async fn delete(&self, id: &TaskId, owner: &UserId) -> Result<bool, TaskRepositoryError>;
}
