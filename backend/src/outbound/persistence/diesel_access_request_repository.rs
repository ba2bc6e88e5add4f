//! PostgreSQL-backed `AccessRequestRepository` implementation.
//!
//! Status transitions are a conditional `UPDATE ... WHERE status = $from`, so
//! two admins deciding the same request cannot both win.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccessRequestRepository, AccessRequestRepositoryError};
use crate::domain::{AccessRequest, AccessRequestId, AccessRequestStatus, StatusTransition};

use super::error_mapping::{map_diesel_error, map_pool_error, map_row_error};
use super::models::AccessRequestRow;
use super::pool::{DbPool, PoolError};
use super::schema::access_requests;

/// Diesel-backed implementation of the `AccessRequestRepository` port.
#[derive(Clone)]
pub struct DieselAccessRequestRepository {
    pool: DbPool,
}

impl DieselAccessRequestRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AccessRequestRepositoryError {
    map_pool_error(error, AccessRequestRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AccessRequestRepositoryError {
    map_diesel_error(
        error,
        AccessRequestRepositoryError::query,
        AccessRequestRepositoryError::connection,
    )
}

fn row_to_request(row: AccessRequestRow) -> Result<AccessRequest, AccessRequestRepositoryError> {
    AccessRequest::try_from(row).map_err(|err| map_row_error(err, AccessRequestRepositoryError::query))
}

#[async_trait]
impl AccessRequestRepository for DieselAccessRequestRepository {
    async fn insert(&self, request: &AccessRequest) -> Result<(), AccessRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(access_requests::table)
            .values(&AccessRequestRow::from(request))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }

    async fn find(
        &self,
        id: &AccessRequestId,
    ) -> Result<Option<AccessRequest>, AccessRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = access_requests::table
            .find(id.as_uuid())
            .select(AccessRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_request).transpose()
    }

    async fn list(
        &self,
        status: Option<AccessRequestStatus>,
    ) -> Result<Vec<AccessRequest>, AccessRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = access_requests::table
            .select(AccessRequestRow::as_select())
            .order((access_requests::created_at.desc(), access_requests::id.desc()))
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(access_requests::status.eq(status.as_str()));
        }
        let rows = query.load(&mut conn).await.map_err(diesel_error)?;
        rows.into_iter().map(row_to_request).collect()
    }

    async fn transition(
        &self,
        transition: &StatusTransition,
    ) -> Result<bool, AccessRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let target = access_requests::table
            .filter(access_requests::id.eq(transition.id.as_uuid()))
            .filter(access_requests::status.eq(transition.from.as_str()));
        let updated = match transition.decided {
            Some((admin, at)) => {
                diesel::update(target)
                    .set((
                        access_requests::status.eq(transition.to.as_str()),
                        access_requests::decided_by.eq(Some(*admin.as_uuid())),
                        access_requests::decided_at.eq(Some(at)),
                    ))
                    .execute(&mut conn)
                    .await
            }
            None => {
                diesel::update(target)
                    .set(access_requests::status.eq(transition.to.as_str()))
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(diesel_error)?;
        Ok(updated == 1)
    }
}
