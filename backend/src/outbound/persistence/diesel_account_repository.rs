//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Provisioning writes the account, its empty profile and its role grants in
//! one transaction so a half-provisioned member never becomes visible.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use mockable::Clock;
use std::sync::Arc;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, NewAccount, StoredCredentials,
};
use crate::domain::{Account, EmailAddress, PasswordDigest, Profile, RoleSet, UserId};

use super::error_mapping::{is_unique_violation, map_diesel_error, map_pool_error, map_row_error};
use super::models::{AccountRow, NewAccountRow, ProfileRow, UserRoleRow};
use super::pool::{DbPool, PoolError};
use super::schema::{accounts, profiles, user_roles};

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselAccountRepository {
    /// Create a new repository stamping accounts with `clock`.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn pool_error(error: PoolError) -> AccountRepositoryError {
    map_pool_error(error, AccountRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn into_credentials(row: AccountRow) -> Result<StoredCredentials, AccountRepositoryError> {
    let (account, password) = row
        .into_parts()
        .map_err(|err| map_row_error(err, AccountRepositoryError::query))?;
    Ok(StoredCredentials { account, password })
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn provision(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError> {
        let created = Account {
            id: UserId::random(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            email_verified: true,
            created_at: self.clock.utc(),
        };
        let user_id = *created.id.as_uuid();
        let email = created.email.clone();
        let full_name = created.full_name.clone();
        let account_row = NewAccountRow {
            id: user_id,
            email: email.as_ref(),
            full_name: full_name.as_ref(),
            password_hash: account.password.as_str(),
            email_verified: created.email_verified,
            created_at: created.created_at,
        };
        let profile_row = ProfileRow::from(&Profile::empty(created.id));
        let roles: RoleSet = account.roles.iter().copied().collect();
        let role_rows: Vec<UserRoleRow<'_>> = roles
            .iter()
            .map(|role| UserRoleRow {
                user_id,
                role: role.as_str(),
            })
            .collect();

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(accounts::table)
                    .values(&account_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(profiles::table)
                    .values(&profile_row)
                    .execute(conn)
                    .await?;
                if !role_rows.is_empty() {
                    diesel::insert_into(user_roles::table)
                        .values(&role_rows)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AccountRepositoryError::email_taken(email.as_ref().to_owned())
            } else {
                diesel_error(err)
            }
        })?;
        drop(conn);

        Ok(created)
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = accounts::table
            .filter(accounts::email.eq(email.as_ref()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(into_credentials).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = accounts::table
            .find(id.as_uuid())
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row
            .map(into_credentials)
            .transpose()?
            .map(|stored| stored.account))
    }

    async fn replace_password(
        &self,
        id: &UserId,
        password: &PasswordDigest,
    ) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(accounts::table.find(id.as_uuid()))
            .set(accounts::password_hash.eq(password.as_str()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }
}
