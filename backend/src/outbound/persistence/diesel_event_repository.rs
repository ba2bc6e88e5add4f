//! PostgreSQL-backed `EventRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{Event, EventId, UserId, Visibility};

use super::error_mapping::{map_diesel_error, map_pool_error, map_row_error};
use super::models::EventRow;
use super::pool::{DbPool, PoolError};
use super::schema::events;

/// Diesel-backed implementation of the `EventRepository` port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> EventRepositoryError {
    map_pool_error(error, EventRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> EventRepositoryError {
    map_diesel_error(
        error,
        EventRepositoryError::query,
        EventRepositoryError::connection,
    )
}

fn row_to_event(row: EventRow) -> Result<Event, EventRepositoryError> {
    Event::try_from(row).map_err(|err| map_row_error(err, EventRepositoryError::query))
}

fn rows_to_events(rows: Vec<EventRow>) -> Result<Vec<Event>, EventRepositoryError> {
    rows.into_iter().map(row_to_event).collect()
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn insert(&self, event: &Event) -> Result<(), EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(events::table)
            .values(&EventRow::from(event))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }

    async fn find(&self, id: &EventId) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = events::table
            .find(id.as_uuid())
            .select(EventRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_event).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = events::table
            .select(EventRow::as_select())
            .order((events::event_date.asc(), events::created_at.asc(), events::id.asc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_events(rows)
    }

    async fn list_visible(&self, viewer: &UserId) -> Result<Vec<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = events::table
            .filter(
                events::created_by.eq(viewer.as_uuid()).or(events::approved
                    .eq(true)
                    .and(events::visibility.eq(Visibility::Shared.as_str()))),
            )
            .select(EventRow::as_select())
            .order((events::event_date.asc(), events::created_at.asc(), events::id.asc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_events(rows)
    }

    async fn approve(&self, id: &EventId) -> Result<bool, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(
            events::table
                .filter(events::id.eq(id.as_uuid()))
                .filter(events::approved.eq(false)),
        )
        .set(events::approved.eq(true))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(updated == 1)
    }

    async fn delete(&self, id: &EventId) -> Result<bool, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(events::table.filter(events::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted == 1)
    }
}
