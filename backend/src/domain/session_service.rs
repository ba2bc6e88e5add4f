//! Login and auth context restoration backed by the account, profile and
//! role stores.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    AccountRepository, INVALID_CREDENTIALS, LoginService, ProfileRepository, RoleRepository,
    SessionQuery, SessionSnapshot,
};
use crate::domain::service_support::{map_account_error, map_profile_error, map_role_error};
use crate::domain::{
    AuthenticatedSession, Error, LoginCredentials, UserId, verify_password,
};

/// Service implementing [`LoginService`] and [`SessionQuery`].
#[derive(Clone)]
pub struct SessionService<A, P, L> {
    accounts: Arc<A>,
    profiles: Arc<P>,
    roles: Arc<L>,
}

impl<A, P, L> SessionService<A, P, L> {
    /// Create a service over the given repositories.
    pub fn new(accounts: Arc<A>, profiles: Arc<P>, roles: Arc<L>) -> Self {
        Self {
            accounts,
            profiles,
            roles,
        }
    }
}

#[async_trait]
impl<A, P, L> LoginService for SessionService<A, P, L>
where
    A: AccountRepository,
    P: ProfileRepository,
    L: RoleRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .accounts
            .find_credentials(credentials.email())
            .await
            .map_err(map_account_error)?;
        let Some(stored) = stored else {
            debug!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !verify_password(credentials.password(), &stored.password) {
            debug!(user_id = %stored.account.id, "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(stored.account.id)
    }
}

#[async_trait]
impl<A, P, L> SessionQuery for SessionService<A, P, L>
where
    A: AccountRepository,
    P: ProfileRepository,
    L: RoleRepository,
{
    async fn load(&self, user_id: &UserId) -> Result<Option<SessionSnapshot>, Error> {
        let Some(account) = self
            .accounts
            .find_by_id(user_id)
            .await
            .map_err(map_account_error)?
        else {
            return Ok(None);
        };
        let profile_completed = self
            .profiles
            .find(user_id)
            .await
            .map_err(map_profile_error)?
            .is_some_and(|profile| profile.profile_completed);
        let roles = self
            .roles
            .roles_for(user_id)
            .await
            .map_err(map_role_error)?;
        Ok(Some(SessionSnapshot {
            account,
            session: AuthenticatedSession {
                user_id: *user_id,
                profile_completed,
                roles,
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        MockAccountRepository, MockProfileRepository, MockRoleRepository, StoredCredentials,
    };
    use crate::domain::{
        Account, EmailAddress, ErrorCode, FullName, Profile, Role, RoleSet, hash_password,
    };
    use crate::test_support::fixture_timestamp;
    use rstest::rstest;

    fn account() -> Account {
        Account {
            id: UserId::random(),
            email: EmailAddress::new("alice@x.com").expect("email"),
            full_name: FullName::new("Alice").expect("name"),
            email_verified: true,
            created_at: fixture_timestamp(),
        }
    }

    fn service(
        accounts: MockAccountRepository,
        profiles: MockProfileRepository,
        roles: MockRoleRepository,
    ) -> SessionService<MockAccountRepository, MockProfileRepository, MockRoleRepository> {
        SessionService::new(Arc::new(accounts), Arc::new(profiles), Arc::new(roles))
    }

    #[rstest]
    #[case("HT-abcd1234!", true)]
    #[case("HT-abcd1234?", false)]
    #[tokio::test]
    async fn authenticate_checks_password_hash(#[case] password: &str, #[case] ok: bool) {
        let account = account();
        let expected_id = account.id;
        let digest = hash_password("HT-abcd1234!").expect("hash");
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_credentials()
            .times(1)
            .return_once(move |_| {
                Ok(Some(StoredCredentials {
                    account,
                    password: digest,
                }))
            });
        let service = service(
            accounts,
            MockProfileRepository::new(),
            MockRoleRepository::new(),
        );
        let creds = LoginCredentials::try_from_parts("alice@x.com", password).expect("shape");

        match (ok, service.authenticate(&creds).await) {
            (true, Ok(id)) => assert_eq!(id, expected_id),
            (false, Err(err)) => {
                assert_eq!(err.code(), ErrorCode::Unauthorized);
                assert_eq!(err.message(), INVALID_CREDENTIALS);
            }
            (_, other) => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_email_uses_the_generic_message() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_credentials()
            .times(1)
            .return_once(|_| Ok(None));
        let service = service(
            accounts,
            MockProfileRepository::new(),
            MockRoleRepository::new(),
        );
        let creds = LoginCredentials::try_from_parts("ghost@x.com", "pw").expect("shape");
        let err = service.authenticate(&creds).await.expect_err("rejected");
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn load_combines_profile_flag_and_roles() {
        let account = account();
        let user_id = account.id;
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(account)));
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find().times(1).return_once(move |id| {
            Ok(Some(Profile {
                profile_completed: true,
                ..Profile::empty(*id)
            }))
        });
        let mut roles = MockRoleRepository::new();
        roles
            .expect_roles_for()
            .times(1)
            .return_once(|_| Ok([Role::User, Role::Admin].into_iter().collect::<RoleSet>()));

        let snapshot = service(accounts, profiles, roles)
            .load(&user_id)
            .await
            .expect("load")
            .expect("account exists");
        assert!(snapshot.session.profile_completed);
        assert!(snapshot.session.roles.is_admin());
    }

    #[tokio::test]
    async fn load_returns_none_for_deleted_accounts() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(None));
        let snapshot = service(
            accounts,
            MockProfileRepository::new(),
            MockRoleRepository::new(),
        )
        .load(&UserId::random())
        .await
        .expect("load");
        assert!(snapshot.is_none());
    }
}
