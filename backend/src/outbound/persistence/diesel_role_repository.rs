//! PostgreSQL-backed `RoleRepository` over the `user_roles` table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{RoleRepository, RoleRepositoryError};
use crate::domain::{Role, RoleSet, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::UserRoleRow;
use super::pool::{DbPool, PoolError};
use super::schema::user_roles;

/// Diesel-backed implementation of the `RoleRepository` port.
#[derive(Clone)]
pub struct DieselRoleRepository {
    pool: DbPool,
}

impl DieselRoleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> RoleRepositoryError {
    map_pool_error(error, RoleRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> RoleRepositoryError {
    map_diesel_error(
        error,
        RoleRepositoryError::query,
        RoleRepositoryError::connection,
    )
}

#[async_trait]
impl RoleRepository for DieselRoleRepository {
    async fn roles_for(&self, user_id: &UserId) -> Result<RoleSet, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let names: Vec<String> = user_roles::table
            .filter(user_roles::user_id.eq(user_id.as_uuid()))
            .select(user_roles::role)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        // Unknown grants are skipped so a stray row cannot lock a member out.
        Ok(names
            .iter()
            .filter_map(|name| match name.parse::<Role>() {
                Ok(role) => Some(role),
                Err(err) => {
                    warn!(user_id = %user_id, %err, "ignoring unknown role grant");
                    None
                }
            })
            .collect())
    }

    async fn has_role(&self, user_id: &UserId, role: Role) -> Result<bool, RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let count: i64 = user_roles::table
            .filter(user_roles::user_id.eq(user_id.as_uuid()))
            .filter(user_roles::role.eq(role.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(count > 0)
    }

    async fn grant(&self, user_id: &UserId, role: Role) -> Result<(), RoleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(user_roles::table)
            .values(&UserRoleRow {
                user_id: *user_id.as_uuid(),
                role: role.as_str(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }
}
