//! Session manager: the single authority over the tab's authentication state.
//!
//! ARCHITECTURE
//! ============
//! One manager is built at startup and passed to whoever needs it (Leptos
//! context, the cross-context listener). It owns the in-memory [`Session`],
//! mirrors `{token, user}` into a [`CredentialStore`], and broadcasts every
//! mutation to observers synchronously, after the mutation and after the
//! matching storage write.
//!
//! TRADE-OFFS
//! ==========
//! Overlapping login/signup calls are not queued or cancelled: `is_loading`
//! and `error` reflect whichever call settled last. A failed login leaves
//! any existing session in place.
//!
//! ERROR HANDLING
//! ==============
//! `restore` never fails; corrupt storage is purged and logged. Identity
//! failures are classified into `Session::error` and the original
//! [`IdentityError`] is returned to the caller. Storage write failures are
//! logged and do not affect the in-memory session.

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::session::{AuthData, Session};
use crate::config::{FailureMessages, SessionConfig};
use crate::net::api::IdentityService;
use crate::net::error::{IdentityError, classify};
use crate::net::types::{Credentials, Registration, User, Verification};
use crate::routing;
use crate::storage::StorageArea;
use crate::storage::credentials::{CredentialStore, StoredCredentials};

type Observer = Rc<dyn Fn(&Session)>;

/// Why a restore pass is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RestoreCause {
    /// Process start: anything incomplete in storage is stale and purged.
    Startup,
    /// Another context wrote a credential slot. A half-written record may
    /// be that context mid-save, so it is read as absent but left alone.
    ExternalChange,
}

struct Inner {
    state: RefCell<Session>,
    store: CredentialStore,
    service: Rc<dyn IdentityService>,
    messages: FailureMessages,
    observers: RefCell<Vec<(u64, Observer)>>,
    next_observer: Cell<u64>,
    in_flight: Cell<u32>,
}

/// Cheap, clonable handle to the session manager.
#[derive(Clone)]
pub struct SessionManager {
    inner: Rc<Inner>,
}

/// Non-owning handle; see [`SessionManager::downgrade`].
#[derive(Clone)]
pub struct WeakSessionManager {
    inner: Weak<Inner>,
}

impl WeakSessionManager {
    #[must_use]
    pub fn upgrade(&self) -> Option<SessionManager> {
        self.inner.upgrade().map(|inner| SessionManager { inner })
    }
}

/// Observer registration; dropping it stops notifications.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    manager: Weak<Inner>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.manager.upgrade() {
            inner.observers.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager").field("state", &*self.inner.state.borrow()).finish_non_exhaustive()
    }
}

/// Tracks one identity-service call; clears `is_loading` if the call's
/// future is dropped before it settles.
struct InFlight<'a> {
    manager: &'a SessionManager,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn begin(manager: &'a SessionManager) -> Self {
        let inner = &manager.inner;
        inner.in_flight.set(inner.in_flight.get() + 1);
        manager.update(|s| {
            s.is_loading = true;
            s.error = None;
        });
        Self { manager, settled: false }
    }

    fn settle(mut self, error: Option<String>) {
        self.settled = true;
        self.manager.update(|s| {
            s.is_loading = false;
            s.error = error;
        });
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let inner = &self.manager.inner;
        inner.in_flight.set(inner.in_flight.get().saturating_sub(1));
        if !self.settled {
            leptos::logging::warn!("identity call dropped before settling");
            self.manager.update(|s| s.is_loading = false);
        }
    }
}

impl SessionManager {
    /// Build a manager over `area` using the keys and messages in `config`.
    ///
    /// The session starts in the restoring state; call
    /// [`SessionManager::restore`] once at startup.
    pub fn new(service: Rc<dyn IdentityService>, area: Rc<dyn StorageArea>, config: &SessionConfig) -> Self {
        let store = CredentialStore::new(area, config.storage_keys.clone());
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(Session::restoring()),
                store,
                service,
                messages: config.messages.clone(),
                observers: RefCell::new(Vec::new()),
                next_observer: Cell::new(0),
                in_flight: Cell::new(0),
            }),
        }
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakSessionManager {
        WeakSessionManager { inner: Rc::downgrade(&self.inner) }
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token().map(str::to_owned)
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().user().cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Landing path for the current user's role, if authenticated.
    #[must_use]
    pub fn landing_path(&self) -> Option<&'static str> {
        self.inner.state.borrow().user().map(|u| routing::landing_path(&u.role))
    }

    /// Register `observer`; it runs after every state change until the
    /// returned [`Subscription`] is dropped.
    pub fn subscribe(&self, observer: impl Fn(&Session) + 'static) -> Subscription {
        let id = self.inner.next_observer.get() + 1;
        self.inner.next_observer.set(id);
        self.inner.observers.borrow_mut().push((id, Rc::new(observer)));
        Subscription { manager: Rc::downgrade(&self.inner), id }
    }

    /// Load the session from storage. Safe to call repeatedly.
    pub fn restore(&self) {
        self.restore_from(RestoreCause::Startup);
    }

    /// Re-read storage after another context changed a credential slot.
    pub fn resync(&self) {
        self.restore_from(RestoreCause::ExternalChange);
    }

    fn restore_from(&self, cause: RestoreCause) {
        let auth = match self.inner.store.inspect() {
            StoredCredentials::Present { token, user } => Some(AuthData { token, user }),
            StoredCredentials::Absent => None,
            StoredCredentials::Partial => {
                if cause == RestoreCause::Startup {
                    self.purge_store("incomplete credential record");
                }
                None
            }
            StoredCredentials::Corrupt { reason } => {
                self.purge_store(&format!("unparseable stored user: {reason}"));
                None
            }
        };
        let still_loading = self.inner.in_flight.get() > 0;
        self.update(|s| {
            s.auth = auth;
            s.restored = true;
            s.is_loading = still_loading;
        });
    }

    /// Authenticate against the identity service.
    ///
    /// On success the session becomes authenticated and is persisted. On
    /// failure any existing session is kept and `error` holds the classified
    /// message.
    ///
    /// # Errors
    ///
    /// Returns the identity service's [`IdentityError`] unchanged.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, IdentityError> {
        let call = InFlight::begin(self);
        match self.inner.service.login(credentials).await {
            Ok(payload) => {
                let user = payload.user.clone();
                self.write_auth(payload.access_token, payload.user);
                call.settle(None);
                Ok(user)
            }
            Err(err) => {
                let failure = classify(&err, &self.inner.messages.login);
                leptos::logging::warn!("login failed: code={} kind={:?}", err.error_code(), failure.kind);
                call.settle(Some(failure.message));
                Err(err)
            }
        }
    }

    /// Register a new account. Success never opens a session; the account
    /// must be verified first (see [`SessionManager::verify`]).
    ///
    /// # Errors
    ///
    /// Returns the identity service's [`IdentityError`] unchanged.
    pub async fn signup(&self, registration: &Registration) -> Result<(), IdentityError> {
        let call = InFlight::begin(self);
        match self.inner.service.signup(registration).await {
            Ok(()) => {
                call.settle(None);
                Ok(())
            }
            Err(err) => {
                let failure = classify(&err, &self.inner.messages.signup);
                leptos::logging::warn!("signup failed: code={} kind={:?}", err.error_code(), failure.kind);
                call.settle(Some(failure.message));
                Err(err)
            }
        }
    }

    /// Complete the verification step that follows signup and open the
    /// resulting session.
    ///
    /// # Errors
    ///
    /// Returns the identity service's [`IdentityError`] unchanged.
    pub async fn verify(&self, verification: &Verification) -> Result<User, IdentityError> {
        let call = InFlight::begin(self);
        match self.inner.service.verify(verification).await {
            Ok(payload) => {
                let user = payload.user.clone();
                self.write_auth(payload.access_token, payload.user);
                call.settle(None);
                Ok(user)
            }
            Err(err) => {
                let failure = classify(&err, &self.inner.messages.verify);
                leptos::logging::warn!("verification failed: code={} kind={:?}", err.error_code(), failure.kind);
                call.settle(Some(failure.message));
                Err(err)
            }
        }
    }

    /// Install `{token, user}` directly, e.g. after an out-of-band
    /// verification handled elsewhere. Callers are trusted.
    pub fn set_auth_data(&self, token: impl Into<String>, user: User) {
        self.write_auth(token.into(), user);
        self.notify();
    }

    /// Drop the session and purge storage. No-op when already anonymous.
    pub fn logout(&self) {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            let changed = state.auth.is_some() || !state.restored;
            state.auth = None;
            state.restored = true;
            changed
        };
        if let Err(e) = self.inner.store.clear() {
            leptos::logging::warn!("failed to purge credentials on logout: {e}");
        }
        if changed {
            self.notify();
        }
    }

    pub fn clear_error(&self) {
        if self.inner.state.borrow().error.is_none() {
            return;
        }
        self.update(|s| s.error = None);
    }

    /// Memory first, then storage; the caller broadcasts.
    fn write_auth(&self, token: String, user: User) {
        let user = user.without_reserved_extra();
        {
            let mut state = self.inner.state.borrow_mut();
            state.auth = Some(AuthData { token: token.clone(), user: user.clone() });
            state.restored = true;
        }
        if let Err(e) = self.inner.store.save(&token, &user) {
            leptos::logging::warn!("failed to persist credentials: {e}");
        }
    }

    fn purge_store(&self, reason: &str) {
        leptos::logging::warn!("discarding stored credentials: {reason}");
        if let Err(e) = self.inner.store.clear() {
            leptos::logging::warn!("failed to purge credentials: {e}");
        }
    }

    fn update(&self, mutate: impl FnOnce(&mut Session)) {
        mutate(&mut self.inner.state.borrow_mut());
        self.notify();
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let observers: Vec<Observer> = self.inner.observers.borrow().iter().map(|(_, o)| Rc::clone(o)).collect();
        for observer in observers {
            observer(&snapshot);
        }
    }
}
