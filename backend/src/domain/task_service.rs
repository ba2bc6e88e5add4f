//! Personal task service. Tasks owned by someone else look missing.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{TaskRepository, TasksCommand};
use crate::domain::service_support::map_task_error;
use crate::domain::{Error, Task, TaskId, TaskPatch, TaskPriority, UserId};

/// Service implementing [`TasksCommand`].
#[derive(Clone)]
pub struct TaskService<T> {
    tasks: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<T> TaskService<T> {
    /// Create a service over the task repository.
    pub fn new(tasks: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self { tasks, clock }
    }
}

fn task_not_found(id: &TaskId) -> Error {
    Error::not_found(format!("task {id} not found"))
}

#[async_trait]
impl<T> TasksCommand for TaskService<T>
where
    T: TaskRepository,
{
    async fn list(&self, owner: &UserId) -> Result<Vec<Task>, Error> {
        self.tasks.list(owner).await.map_err(map_task_error)
    }

    async fn create(
        &self,
        owner: &UserId,
        title: String,
        priority: TaskPriority,
    ) -> Result<Task, Error> {
        let task = Task {
            id: TaskId::random(),
            user_id: *owner,
            title,
            priority,
            done: false,
            created_at: self.clock.utc(),
        };
        self.tasks.insert(&task).await.map_err(map_task_error)?;
        Ok(task)
    }

    async fn update(&self, owner: &UserId, id: &TaskId, patch: TaskPatch) -> Result<Task, Error> {
        let current = self
            .tasks
            .find(id)
            .await
            .map_err(map_task_error)?
            .filter(|task| task.user_id == *owner)
            .ok_or_else(|| task_not_found(id))?;
        if patch.is_empty() {
            return Ok(current);
        }
        let updated = patch.apply(current);
        if !self.tasks.update(&updated).await.map_err(map_task_error)? {
            return Err(task_not_found(id));
        }
        Ok(updated)
    }

    async fn delete(&self, owner: &UserId, id: &TaskId) -> Result<(), Error> {
        if self.tasks.delete(id, owner).await.map_err(map_task_error)? {
            Ok(())
        } else {
            Err(task_not_found(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockTaskRepository;
    use crate::test_support::{fixture_clock, fixture_timestamp};

    fn task(owner: UserId) -> Task {
        Task {
            id: TaskId::random(),
            user_id: owner,
            title: "Draft pitch".to_owned(),
            priority: TaskPriority::Medium,
            done: false,
            created_at: fixture_timestamp(),
        }
    }

    #[tokio::test]
    async fn create_defaults_to_not_done() {
        let mut repo = MockTaskRepository::new();
        repo.expect_insert().times(1).return_once(|_| Ok(()));
        let owner = UserId::random();

        let created = TaskService::new(Arc::new(repo), fixture_clock())
            .create(&owner, "Draft pitch".to_owned(), TaskPriority::High)
            .await
            .expect("created");
        assert!(!created.done);
        assert_eq!(created.user_id, owner);
        assert_eq!(created.created_at, fixture_timestamp());
    }

    #[tokio::test]
    async fn update_applies_patch_for_owner() {
        let owner = UserId::random();
        let existing = task(owner);
        let id = existing.id;
        let mut repo = MockTaskRepository::new();
        repo.expect_find()
            .times(1)
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_update()
            .withf(|t| t.done && t.title == "Draft pitch")
            .times(1)
            .return_once(|_| Ok(true));

        let patch = TaskPatch {
            done: Some(true),
            ..TaskPatch::default()
        };
        let updated = TaskService::new(Arc::new(repo), fixture_clock())
            .update(&owner, &id, patch)
            .await
            .expect("updated");
        assert!(updated.done);
    }

    #[tokio::test]
    async fn other_owners_tasks_are_not_found() {
        let existing = task(UserId::random());
        let id = existing.id;
        let mut repo = MockTaskRepository::new();
        repo.expect_find()
            .times(1)
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_update().never();

        let err = TaskService::new(Arc::new(repo), fixture_clock())
            .update(&UserId::random(), &id, TaskPatch::default())
            .await
            .expect_err("hidden");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn delete_reports_missing_tasks() {
        let mut repo = MockTaskRepository::new();
        repo.expect_delete().times(1).return_once(|_, _| Ok(false));

        let err = TaskService::new(Arc::new(repo), fixture_clock())
            .delete(&UserId::random(), &TaskId::random())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
