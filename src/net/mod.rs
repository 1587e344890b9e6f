//! Identity-service boundary.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` defines the service trait and HTTP client, `error` classifies its
//! failures, and `types` defines the wire schema shared with persistence.

pub mod api;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod scripted;
pub mod types;
