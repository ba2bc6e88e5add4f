//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use crate::domain::ports::{
    AccountRepository, ChatCompletionSource, NewAccount, ProfileRepository, UnconfiguredChatSource,
};
use crate::domain::{
    AccessRequestService, AuthContexts, ChatService, EmailAddress, EventService, FullName,
    NotificationService, OsCredentialGenerator, ProfileCompletion, ProfileService, Role,
    SessionService, TaskService, UserId, hash_password,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::MemoryStore;
use crate::test_support::{fixture_clock, fixture_timestamp};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Real services over an in-memory store with the chat gateway unconfigured.
pub fn memory_state() -> (HttpState, Arc<MemoryStore>) {
    memory_state_with_chat(Arc::new(UnconfiguredChatSource))
}

/// Real services over an in-memory store and the given chat source.
pub fn memory_state_with_chat(
    chat: Arc<dyn ChatCompletionSource>,
) -> (HttpState, Arc<MemoryStore>) {
    let clock = fixture_clock();
    let store = Arc::new(MemoryStore::new(clock.clone()));
    let sessions = Arc::new(SessionService::new(
        store.clone(),
        store.clone(),
        store.clone(),
    ));
    let state = HttpState {
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
            clock.clone(),
        )),
        notifications: Arc::new(NotificationService::new(store.clone())),
        tasks: Arc::new(TaskService::new(store.clone(), clock)),
        chat: Arc::new(ChatService::new(chat)),
        auth_contexts: Arc::new(AuthContexts::new()),
    };
    (state, store)
}

/// Shape of a seeded member.
#[derive(Debug, Clone, Copy)]
pub struct Member {
    pub profile_completed: bool,
    pub admin: bool,
}

impl Member {
    pub const ONBOARDED: Self = Self {
        profile_completed: true,
        admin: false,
    };
    pub const NEW: Self = Self {
        profile_completed: false,
        admin: false,
    };
    pub const ADMIN: Self = Self {
        profile_completed: true,
        admin: true,
    };
}

/// Password every seeded member signs in with.
pub const MEMBER_PASSWORD: &str = "HT-test1234!";

/// Provision a member directly in the store.
pub async fn seed_member(store: &MemoryStore, email: &str, member: Member) -> UserId {
    let mut roles = vec![Role::User];
    if member.admin {
        roles.push(Role::Admin);
    }
    let account = store
        .provision(&NewAccount {
            email: EmailAddress::new(email).expect("seed email"),
            full_name: FullName::new("Seeded Member").expect("seed name"),
            password: hash_password(MEMBER_PASSWORD).expect("hash"),
            roles,
        })
        .await
        .expect("provision member");
    if member.profile_completed {
        let completion = ProfileCompletion::try_from_parts(
            "5550100",
            "2000-01-01",
            "R-42",
            fixture_timestamp().date_naive(),
        )
        .expect("valid completion");
        let profile = ProfileRepository::find(store, &account.id)
            .await
            .expect("find profile")
            .expect("profile row");
        assert!(
            ProfileRepository::complete(store, &completion.apply_to(profile))
                .await
                .expect("complete profile")
        );
    }
    account.id
}

/// App serving the whole API over `state` behind a test session layer.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Sign in and return the session cookie.
pub async fn login_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
) -> Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": email, "password": MEMBER_PASSWORD}))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Decode a response body as JSON.
pub async fn body_json<B>(res: ServiceResponse<B>) -> Value
where
    B: actix_web::body::MessageBody,
{
    let bytes = test::read_body(res).await;
    serde_json::from_slice(&bytes).expect("JSON body")
}
