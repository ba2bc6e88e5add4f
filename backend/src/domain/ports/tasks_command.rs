//! Driving port for personal tasks.

use async_trait::async_trait;

use crate::domain::{Error, Task, TaskId, TaskPatch, TaskPriority, UserId};

/// Task use-cases; every call is scoped to the owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TasksCommand: Send + Sync {
    /// The owner's tasks, newest first.
    async fn list(&self, owner: &UserId) -> Result<Vec<Task>, Error>;

    /// Create a task with an already validated title.
    async fn create(
        &self,
        owner: &UserId,
        title: String,
        priority: TaskPriority,
    ) -> Result<Task, Error>;

    /// Apply a partial update.
    async fn update(&self, owner: &UserId, id: &TaskId, patch: TaskPatch) -> Result<Task, Error>;

    /// Delete a task.
    async fn delete(&self, owner: &UserId, id: &TaskId) -> Result<(), Error>;
}
