//! Leptos bindings for the session manager.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components read the session through an `RwSignal<Session>` provided
//! via context and apply identical redirect behavior: anonymous users go to
//! `/login`, authenticated users leaving `/login` go to their role's area.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::routing::{LOGIN_PATH, landing_path};
use crate::state::manager::SessionManager;
use crate::state::session::Session;

/// Whether an auth-gated route should bounce to `/login`.
pub fn should_redirect_unauth(state: &Session) -> bool {
    state.restored && !state.is_loading && state.auth.is_none()
}

/// Where an authenticated user on the login page should be sent.
pub fn post_login_target(state: &Session) -> Option<&'static str> {
    if state.is_loading {
        return None;
    }
    state.user().map(|user| landing_path(&user.role))
}

/// Mirror `manager` into a context-provided signal for the current owner.
///
/// The manager itself is provided as a local `StoredValue` so event
/// handlers can call `login`/`logout` via [`use_session_manager`].
pub fn provide_session(manager: SessionManager) -> RwSignal<Session> {
    let session = RwSignal::new(manager.snapshot());
    let subscription = manager.subscribe(move |snapshot| session.set(snapshot.clone()));
    StoredValue::new_local(subscription);
    provide_context(session);
    provide_context(StoredValue::new_local(manager));
    session
}

/// The manager provided by [`provide_session`], if any.
pub fn use_session_manager() -> Option<SessionManager> {
    use_context::<StoredValue<SessionManager, LocalStorage>>().map(|stored| stored.get_value())
}

/// Redirect to `/login` whenever the session has settled with no user.
pub fn install_unauth_redirect<F>(session: RwSignal<Session>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&session.get()) {
            navigate(LOGIN_PATH, NavigateOptions::default());
        }
    });
}

/// Send an authenticated user to their role's landing area.
pub fn install_landing_redirect<F>(session: RwSignal<Session>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if let Some(target) = post_login_target(&session.get()) {
            navigate(target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
