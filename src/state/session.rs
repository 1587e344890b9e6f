//! Snapshot of the tab-wide authentication state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owned by the session manager and handed to observers and the Leptos
//! bridge by value. Token and user live together in [`AuthData`] so one can
//! never be present without the other.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::User;

/// Bearer token plus the user it was issued to.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthData {
    pub token: String,
    pub user: User,
}

/// Coarse lifecycle position derived from a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing has been read from storage yet.
    Uninitialized,
    /// The initial restore pass is running.
    Restoring,
    Anonymous,
    Authenticated,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub auth: Option<AuthData>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Set once the first restore (or an explicit auth write) has happened.
    pub restored: bool,
}

impl Session {
    /// State of a freshly created manager that is about to restore.
    #[must_use]
    pub fn restoring() -> Self {
        Self { is_loading: true, ..Self::default() }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match (&self.auth, self.restored) {
            (Some(_), _) => SessionPhase::Authenticated,
            (None, true) => SessionPhase::Anonymous,
            (None, false) if self.is_loading => SessionPhase::Restoring,
            (None, false) => SessionPhase::Uninitialized,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.token.as_str())
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.auth.as_ref().map(|a| &a.user)
    }
}
