//! Builders wiring domain services over the configured adapters.
//!
//! PostgreSQL repositories are used when a database URL is configured;
//! otherwise every port shares one in-memory store and a warning is logged.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use reqwest::Url;
use tracing::{info, warn};

use hacktrack::domain::ports::{
    AccessRequestRepository, AccountRepository, AccountRepositoryError, ChatCompletionSource,
    EventRepository, NewAccount, NotificationRepository, ProfileRepository, RoleRepository,
    TaskRepository, UnconfiguredChatSource,
};
use hacktrack::domain::{
    AccessRequestService, AuthContexts, ChatService, EmailAddress, EventService, FullName,
    NotificationService, OsCredentialGenerator, ProfileService, Role, SessionService,
    TaskService, hash_password,
};
use hacktrack::inbound::http::state::HttpState;
use hacktrack::outbound::chat::ChatHttpSource;
use hacktrack::outbound::memory::MemoryStore;
use hacktrack::outbound::persistence::{
    DbPool, DieselAccessRequestRepository, DieselAccountRepository, DieselEventRepository,
    DieselNotificationRepository, DieselProfileRepository, DieselRoleRepository,
    DieselTaskRepository, PoolConfig, run_pending_migrations,
};

use super::config::{BootstrapAdmin, HackTrackSettings};

/// One adapter per driven port.
struct Repositories<A, L, P, R, E, N, T> {
    accounts: Arc<A>,
    roles: Arc<L>,
    profiles: Arc<P>,
    requests: Arc<R>,
    events: Arc<E>,
    notifications: Arc<N>,
    tasks: Arc<T>,
}

fn memory_repositories(
    clock: Arc<dyn Clock>,
) -> Repositories<
    MemoryStore,
    MemoryStore,
    MemoryStore,
    MemoryStore,
    MemoryStore,
    MemoryStore,
    MemoryStore,
> {
    let store = Arc::new(MemoryStore::new(clock));
    Repositories {
        accounts: store.clone(),
        roles: store.clone(),
        profiles: store.clone(),
        requests: store.clone(),
        events: store.clone(),
        notifications: store.clone(),
        tasks: store,
    }
}

fn diesel_repositories(
    pool: &DbPool,
    clock: Arc<dyn Clock>,
) -> Repositories<
    DieselAccountRepository,
    DieselRoleRepository,
    DieselProfileRepository,
    DieselAccessRequestRepository,
    DieselEventRepository,
    DieselNotificationRepository,
    DieselTaskRepository,
> {
    Repositories {
        accounts: Arc::new(DieselAccountRepository::new(pool.clone(), clock)),
        roles: Arc::new(DieselRoleRepository::new(pool.clone())),
        profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
        requests: Arc::new(DieselAccessRequestRepository::new(pool.clone())),
        events: Arc::new(DieselEventRepository::new(pool.clone())),
        notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
        tasks: Arc::new(DieselTaskRepository::new(pool.clone())),
    }
}

impl<A, L, P, R, E, N, T> Repositories<A, L, P, R, E, N, T>
where
    A: AccountRepository + 'static,
    L: RoleRepository + 'static,
    P: ProfileRepository + 'static,
    R: AccessRequestRepository + 'static,
    E: EventRepository + 'static,
    N: NotificationRepository + 'static,
    T: TaskRepository + 'static,
{
    /// Ensure the configured admin exists and holds the admin role.
    async fn ensure_admin(&self, admin: &BootstrapAdmin<'_>) -> std::io::Result<()> {
        let email = EmailAddress::new(admin.email).map_err(std::io::Error::other)?;
        let full_name = FullName::new(admin.name).map_err(std::io::Error::other)?;
        let password = hash_password(admin.password).map_err(std::io::Error::other)?;
        let account = NewAccount {
            email: email.clone(),
            full_name,
            password,
            roles: vec![Role::User, Role::Admin],
        };
        match self.accounts.provision(&account).await {
            Ok(created) => {
                info!(account_id = %created.id, "bootstrap admin provisioned");
                Ok(())
            }
            Err(AccountRepositoryError::EmailTaken { .. }) => {
                let existing = self
                    .accounts
                    .find_credentials(&email)
                    .await
                    .map_err(std::io::Error::other)?
                    .ok_or_else(|| std::io::Error::other("bootstrap admin vanished"))?;
                self.roles
                    .grant(&existing.account.id, Role::Admin)
                    .await
                    .map_err(std::io::Error::other)?;
                info!(account_id = %existing.account.id, "bootstrap admin already present");
                Ok(())
            }
            Err(err) => Err(std::io::Error::other(err)),
        }
    }

    fn into_http_state(self, chat: Arc<dyn ChatCompletionSource>, clock: Arc<dyn Clock>) -> HttpState {
        let sessions = Arc::new(SessionService::new(
            self.accounts.clone(),
            self.profiles.clone(),
            self.roles.clone(),
        ));
        HttpState {
            login: sessions.clone(),
            sessions,
            access_requests: Arc::new(AccessRequestService::new(
                self.requests,
                self.accounts,
                self.roles.clone(),
                Arc::new(OsCredentialGenerator),
                clock.clone(),
            )),
            profiles: Arc::new(ProfileService::new(self.profiles, clock.clone())),
            events: Arc::new(EventService::new(
                self.events,
                self.roles,
                self.notifications.clone(),
                clock.clone(),
            )),
            notifications: Arc::new(NotificationService::new(self.notifications)),
            tasks: Arc::new(TaskService::new(self.tasks, clock)),
            chat: Arc::new(ChatService::new(chat)),
            auth_contexts: Arc::new(AuthContexts::new()),
        }
    }

    async fn finish(
        self,
        settings: &HackTrackSettings,
        chat: Arc<dyn ChatCompletionSource>,
        clock: Arc<dyn Clock>,
    ) -> std::io::Result<HttpState> {
        if let Some(admin) = settings.bootstrap_admin() {
            self.ensure_admin(&admin).await?;
        }
        Ok(self.into_http_state(chat, clock))
    }
}

/// Build the chat gateway adapter, or a stub answering `503`.
///
/// # Errors
///
/// Returns an error when the gateway URL is invalid or the client cannot be
/// constructed.
pub fn build_chat_source(
    settings: &HackTrackSettings,
) -> std::io::Result<Arc<dyn ChatCompletionSource>> {
    let Some(gateway) = settings.chat_gateway() else {
        warn!("chat gateway not configured; /api/v1/chat will answer 503");
        return Ok(Arc::new(UnconfiguredChatSource));
    };
    let endpoint = Url::parse(gateway.url).map_err(std::io::Error::other)?;
    let source = ChatHttpSource::new(endpoint, gateway.api_key, gateway.model, gateway.timeout)
        .map_err(std::io::Error::other)?;
    Ok(Arc::new(source))
}

/// Build the HTTP state from settings.
///
/// Runs pending migrations and ensures the bootstrap admin when configured.
///
/// # Errors
///
/// Returns an error when migrations, the pool, the chat client or admin
/// bootstrap fail.
pub async fn build_http_state(settings: &HackTrackSettings) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let chat = build_chat_source(settings)?;
    match settings.database_url.as_deref() {
        Some(url) => {
            run_pending_migrations(url)
                .await
                .map_err(std::io::Error::other)?;
            let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_pool_size()))
                .await
                .map_err(std::io::Error::other)?;
            info!("using PostgreSQL persistence");
            diesel_repositories(&pool, clock.clone())
                .finish(settings, chat, clock)
                .await
        }
        None => {
            warn!("HACKTRACK_DATABASE_URL not set; state is kept in memory and lost on restart");
            memory_repositories(clock.clone())
                .finish(settings, chat, clock)
                .await
        }
    }
}
