//! PostgreSQL-backed `TaskRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::{Task, TaskId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error, map_row_error};
use super::models::TaskRow;
use super::pool::{DbPool, PoolError};
use super::schema::tasks;

/// Diesel-backed implementation of the `TaskRepository` port.
#[derive(Clone)]
pub struct DieselTaskRepository {
    pool: DbPool,
}

impl DieselTaskRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> TaskRepositoryError {
    map_pool_error(error, TaskRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> TaskRepositoryError {
    map_diesel_error(
        error,
        TaskRepositoryError::query,
        TaskRepositoryError::connection,
    )
}

fn row_to_task(row: TaskRow) -> Result<Task, TaskRepositoryError> {
    Task::try_from(row).map_err(|err| map_row_error(err, TaskRepositoryError::query))
}

#[async_trait]
impl TaskRepository for DieselTaskRepository {
    async fn list(&self, user_id: &UserId) -> Result<Vec<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = tasks::table
            .filter(tasks::user_id.eq(user_id.as_uuid()))
            .select(TaskRow::as_select())
            .order((tasks::created_at.desc(), tasks::id.desc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_task).collect()
    }

    async fn find(&self, id: &TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = tasks::table
            .find(id.as_uuid())
            .select(TaskRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_task).transpose()
    }

    async fn insert(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(tasks::table)
            .values(&TaskRow::from(task))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }

    async fn update(&self, task: &Task) -> Result<bool, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(
            tasks::table
                .filter(tasks::id.eq(task.id.as_uuid()))
                .filter(tasks::user_id.eq(task.user_id.as_uuid())),
        )
        .set((
            tasks::title.eq(&task.title),
            tasks::priority.eq(task.priority.as_str()),
            tasks::done.eq(task.done),
        ))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(updated == 1)
    }

    async fn delete(&self, id: &TaskId, owner: &UserId) -> Result<bool, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(
            tasks::table
                .filter(tasks::id.eq(id.as_uuid()))
                .filter(tasks::user_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(deleted == 1)
    }
}
