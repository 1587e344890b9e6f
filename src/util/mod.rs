//! UI-facing helpers built on the session manager.

pub mod auth;
