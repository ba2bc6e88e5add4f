//! Port for provisioned accounts.
//!
//! Provisioning writes the account, an empty profile and the initial roles
//! as one unit; adapters must not leave an account without its profile.

use async_trait::async_trait;

use crate::domain::{Account, EmailAddress, FullName, PasswordDigest, Role, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// The email is already bound to an account.
        EmailTaken { email: String } =>
            "an account already exists for {email}",
    }
}

/// Account creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Login email.
    pub email: EmailAddress,
    /// Display name.
    pub full_name: FullName,
    /// Hash of the initial password.
    pub password: PasswordDigest,
    /// Roles granted at creation.
    pub roles: Vec<Role>,
}

/// Account together with its password hash, for login checks only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// The account.
    pub account: Account,
    /// Stored hash.
    pub password: PasswordDigest,
}

/// Storage contract for accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create a verified account with an empty profile and `roles`.
    async fn provision(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError>;

    /// Look up login material by email.
    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError>;

    /// Fetch an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Overwrite the stored password hash. Returns `false` when no account
    /// has `id`.
    async fn replace_password(
        &self,
        id: &UserId,
        password: &PasswordDigest,
    ) -> Result<bool, AccountRepositoryError>;
}
