//! Shared harness wiring the domain services over one in-memory store.
//!
//! Behaviour suites drive the same services the HTTP adapter uses, blocking
//! on a private Tokio runtime because rstest-bdd steps are synchronous.

use std::future::Future;
use std::sync::Arc;

use hacktrack::domain::ports::{
    AccessRequestsCommand, AccountRepository, CompleteProfileRequest, EventsCommand, LoginService,
    NewAccount, NotificationsCommand, ProfileCommand, SessionQuery,
};
use hacktrack::domain::{
    AccessRequestService, Decision, EmailAddress, Error, EventService, FullName,
    LoginCredentials, NotificationService, OsCredentialGenerator, Profile, ProfileService, Role,
    SessionService, SessionState, UserId, decide, hash_password, route_requirement,
};
use hacktrack::outbound::memory::MemoryStore;
use mockable::{Clock, DefaultClock};
use tokio::runtime::Runtime;

/// Password used for accounts seeded directly into the store.
pub const SEEDED_PASSWORD: &str = "HT-seeded-pass1!";

/// Domain services sharing one store.
#[derive(Clone)]
pub struct Services {
    runtime: Arc<Runtime>,
    store: Arc<MemoryStore>,
    pub login: Arc<dyn LoginService>,
    pub sessions: Arc<dyn SessionQuery>,
    pub access_requests: Arc<dyn AccessRequestsCommand>,
    pub profiles: Arc<dyn ProfileCommand>,
    pub events: Arc<dyn EventsCommand>,
    pub notifications: Arc<dyn NotificationsCommand>,
}

impl Services {
    pub fn new() -> Self {
        let runtime = Runtime::new().expect("create runtime");
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let store = Arc::new(MemoryStore::new(clock.clone()));
        let sessions = Arc::new(SessionService::new(
            store.clone(),
            store.clone(),
            store.clone(),
        ));
        Self {
            runtime: Arc::new(runtime),
            login: sessions.clone(),
            sessions,
            access_requests: Arc::new(AccessRequestService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                Arc::new(OsCredentialGenerator),
                clock.clone(),
            )),
            profiles: Arc::new(ProfileService::new(store.clone(), clock.clone())),
            events: Arc::new(EventService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                clock,
            )),
            notifications: Arc::new(NotificationService::new(store.clone())),
            store,
        }
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Provision an account straight into the store.
    pub fn seed_account(&self, email: &str, roles: Vec<Role>) -> UserId {
        let account = NewAccount {
            email: EmailAddress::new(email).expect("seed email"),
            full_name: FullName::new("Seeded Account").expect("seed name"),
            password: hash_password(SEEDED_PASSWORD).expect("hash"),
            roles,
        };
        self.block_on(self.store.provision(&account))
            .expect("provision account")
            .id
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<UserId, Error> {
        let credentials = LoginCredentials::try_from_parts(email, password).expect("credentials");
        self.block_on(self.login.authenticate(&credentials))
    }

    pub fn complete_profile(&self, user_id: &UserId) -> Result<Profile, Error> {
        self.block_on(self.profiles.complete(
            user_id,
            CompleteProfileRequest {
                mobile: "5550100".to_owned(),
                date_of_birth: "2000-01-01".to_owned(),
                university_roll_number: "R-42".to_owned(),
            },
        ))
    }

    /// Routing decision for `user_id` navigating to `path`.
    pub fn navigate(&self, user_id: &UserId, path: &str) -> Decision {
        let snapshot = self
            .block_on(self.sessions.load(user_id))
            .expect("load session")
            .expect("account exists");
        decide(
            &SessionState::Authenticated(snapshot.session),
            path,
            route_requirement(path),
        )
    }
}
