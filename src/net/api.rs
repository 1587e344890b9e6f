//! Identity-service client.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and native builds: calls fail with a transport error
//! since these endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every failure mode maps onto [`IdentityError`]; nothing here panics or
//! retries. Timeouts are whatever the browser fetch imposes.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;

use super::error::IdentityError;
use super::types::{AuthPayload, Credentials, Registration, Verification};
use crate::config::Endpoints;

/// The remote identity service consumed by the session manager.
#[async_trait(?Send)]
pub trait IdentityService {
    /// Exchange credentials for a bearer token and user record.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentityError`] if the service rejects the credentials or
    /// the request fails.
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, IdentityError>;

    /// Register a new account. Success does not open a session.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentityError`] if the registration is rejected or the
    /// request fails.
    async fn signup(&self, registration: &Registration) -> Result<(), IdentityError>;

    /// Complete out-of-band verification, returning a session on success.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentityError`] if the code is rejected or the request fails.
    async fn verify(&self, verification: &Verification) -> Result<AuthPayload, IdentityError>;
}

/// JSON-over-HTTP identity service.
#[derive(Debug, Clone)]
pub struct HttpIdentityService {
    endpoints: Endpoints,
}

impl HttpIdentityService {
    #[must_use]
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn not_json_message(url: &str, err: &impl std::fmt::Display) -> String {
    format!("unexpected response from {url}: {err}")
}

#[cfg(feature = "hydrate")]
async fn post_json<B: serde::Serialize>(url: &str, body: &B) -> Result<gloo_net::http::Response, IdentityError> {
    let resp = gloo_net::http::Request::post(url)
        .json(body)
        .map_err(|e| IdentityError::Transport(e.to_string()))?
        .send()
        .await
        .map_err(|e| IdentityError::Transport(e.to_string()))?;
    if resp.ok() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    Err(IdentityError::from_response(status, &text))
}

#[cfg(feature = "hydrate")]
async fn read_auth_payload(url: &str, resp: gloo_net::http::Response) -> Result<AuthPayload, IdentityError> {
    resp.json::<AuthPayload>()
        .await
        .map_err(|e| IdentityError::Decode(not_json_message(url, &e)))
}

#[async_trait(?Send)]
impl IdentityService for HttpIdentityService {
    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, IdentityError> {
        #[cfg(feature = "hydrate")]
        {
            let url = self.endpoints.login_url();
            let resp = post_json(&url, credentials).await?;
            read_auth_payload(&url, resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(IdentityError::Transport("not available on server".to_owned()))
        }
    }

    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    async fn signup(&self, registration: &Registration) -> Result<(), IdentityError> {
        #[cfg(feature = "hydrate")]
        {
            let url = self.endpoints.signup_url();
            post_json(&url, registration).await?;
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(IdentityError::Transport("not available on server".to_owned()))
        }
    }

    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    async fn verify(&self, verification: &Verification) -> Result<AuthPayload, IdentityError> {
        #[cfg(feature = "hydrate")]
        {
            let url = self.endpoints.verify_url();
            let resp = post_json(&url, verification).await?;
            read_auth_payload(&url, resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(IdentityError::Transport("not available on server".to_owned()))
        }
    }
}
