//! Auth context lifecycle.
//!
//! The context owns the only [`SessionState`] the decision function sees.
//! A restore is started with [`AuthContext::begin_restore`], which hands out
//! a ticket stamped with the current generation. Signing out bumps the
//! generation and ends the context, so a restore still in flight is
//! discarded instead of resurrecting a session that was just torn down.
//!
//! [`AuthContexts`] shares one context per login between the requests that
//! are restoring it concurrently. A context stays registered only while a
//! restore holds it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use super::{AuthenticatedSession, SessionState};

/// Proof that a restore was started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a restore ticket must be completed or the context stays loading"]
pub struct RestoreTicket {
    generation: u64,
}

/// Result of applying a restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The snapshot was installed.
    Applied,
    /// A sign-out superseded the ticket.
    Stale,
}

#[derive(Debug)]
struct Inner {
    generation: u64,
    signed_out: bool,
    state: SessionState,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Every mutation completes under the guard, so a poisoned lock still
    // holds consistent data.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Session snapshot with an explicit restore/teardown lifecycle.
///
/// # Examples
/// ```
/// use hacktrack::domain::{AuthContext, RestoreOutcome, SessionState};
///
/// let ctx = AuthContext::new();
/// let stale = ctx.begin_restore();
/// ctx.sign_out();
/// assert_eq!(ctx.complete_restore(stale, None), RestoreOutcome::Stale);
/// assert_eq!(ctx.state(), SessionState::Anonymous);
/// ```
#[derive(Debug)]
pub struct AuthContext {
    inner: Mutex<Inner>,
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthContext {
    /// A context that has not been restored yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                generation: 0,
                signed_out: false,
                state: SessionState::Loading,
            }),
        }
    }

    /// Start a restore. A context that was never restored reads `Loading`
    /// until one completes.
    pub fn begin_restore(&self) -> RestoreTicket {
        RestoreTicket {
            generation: lock(&self.inner).generation,
        }
    }

    /// Install the restored session, or `Anonymous` when `None`.
    ///
    /// Restores racing each other all apply; only a sign-out makes a ticket
    /// stale.
    pub fn complete_restore(
        &self,
        ticket: RestoreTicket,
        session: Option<AuthenticatedSession>,
    ) -> RestoreOutcome {
        let mut inner = lock(&self.inner);
        if inner.signed_out || inner.generation != ticket.generation {
            return RestoreOutcome::Stale;
        }
        inner.state = session.map_or(SessionState::Anonymous, SessionState::Authenticated);
        RestoreOutcome::Applied
    }

    /// Tear the session down and invalidate in-flight restores.
    pub fn sign_out(&self) {
        let mut inner = lock(&self.inner);
        inner.generation = inner.generation.wrapping_add(1);
        inner.signed_out = true;
        inner.state = SessionState::Anonymous;
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> SessionState {
        lock(&self.inner).state.clone()
    }
}

/// Auth contexts of logins with a restore in flight, keyed by the login's
/// session key.
#[derive(Debug, Default)]
pub struct AuthContexts {
    active: Mutex<HashMap<Uuid, Arc<AuthContext>>>,
}

impl AuthContexts {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for `key`, registering a fresh one when none is in flight.
    pub fn acquire(&self, key: Uuid) -> Arc<AuthContext> {
        lock(&self.active)
            .entry(key)
            .or_insert_with(|| Arc::new(AuthContext::new()))
            .clone()
    }

    /// Hand back a context from [`AuthContexts::acquire`]. The entry is
    /// dropped once no restore holds it.
    pub fn release(&self, key: Uuid, context: Arc<AuthContext>) {
        drop(context);
        let mut active = lock(&self.active);
        if active
            .get(&key)
            .is_some_and(|context| Arc::strong_count(context) == 1)
        {
            active.remove(&key);
        }
    }

    /// Sign out the login behind `key`, discarding its in-flight restores.
    pub fn sign_out(&self, key: Uuid) {
        if let Some(context) = lock(&self.active).remove(&key) {
            context.sign_out();
        }
    }

    /// Keys with a restore in flight.
    #[must_use]
    pub fn in_flight(&self) -> Vec<Uuid> {
        lock(&self.active).keys().copied().collect()
    }
}
