//! In-memory identity service that replays queued responses.
//!
//! Used by unit tests and by downstream crates that exercise session flows
//! without a network. Enabled by the `test-utils` feature.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;

use super::api::IdentityService;
use super::error::IdentityError;
use super::types::{AuthPayload, Credentials, Registration, Verification};

/// One recorded call against a [`ScriptedIdentityService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedCall {
    Login { email: String },
    Signup { email: String },
    Verify { email: String, code: String },
}

#[derive(Debug, Default)]
pub struct ScriptedIdentityService {
    logins: RefCell<VecDeque<Result<AuthPayload, IdentityError>>>,
    signups: RefCell<VecDeque<Result<(), IdentityError>>>,
    verifies: RefCell<VecDeque<Result<AuthPayload, IdentityError>>>,
    calls: RefCell<Vec<ScriptedCall>>,
}

impl ScriptedIdentityService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_login(&self, result: Result<AuthPayload, IdentityError>) {
        self.logins.borrow_mut().push_back(result);
    }

    pub fn push_signup(&self, result: Result<(), IdentityError>) {
        self.signups.borrow_mut().push_back(result);
    }

    pub fn push_verify(&self, result: Result<AuthPayload, IdentityError>) {
        self.verifies.borrow_mut().push_back(result);
    }

    /// Calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ScriptedCall> {
        self.calls.borrow().clone()
    }
}

fn exhausted(op: &str) -> IdentityError {
    IdentityError::Transport(format!("no scripted {op} response"))
}

#[async_trait(?Send)]
impl IdentityService for ScriptedIdentityService {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, IdentityError> {
        self.calls.borrow_mut().push(ScriptedCall::Login { email: credentials.email.clone() });
        let next = self.logins.borrow_mut().pop_front();
        next.unwrap_or_else(|| Err(exhausted("login")))
    }

    async fn signup(&self, registration: &Registration) -> Result<(), IdentityError> {
        self.calls.borrow_mut().push(ScriptedCall::Signup { email: registration.email.clone() });
        let next = self.signups.borrow_mut().pop_front();
        next.unwrap_or_else(|| Err(exhausted("signup")))
    }

    async fn verify(&self, verification: &Verification) -> Result<AuthPayload, IdentityError> {
        self.calls.borrow_mut().push(ScriptedCall::Verify {
            email: verification.email.clone(),
            code: verification.code.clone(),
        });
        let next = self.verifies.borrow_mut().pop_front();
        next.unwrap_or_else(|| Err(exhausted("verify")))
    }
}
