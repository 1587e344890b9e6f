//! Durable key/value storage backends and the credential record built on them.
//!
//! SYSTEM CONTEXT
//! ==============
//! `local` wraps browser `localStorage` (hydrate only), `memory` emulates a
//! storage scope shared by several contexts for tests and native hosts, and
//! `credentials` layers the `{token, user}` record on top of either.

pub mod credentials;
pub mod local;
pub mod memory;

/// Errors surfaced by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// No storage is reachable (SSR, disabled storage, private mode).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Reading a key failed.
    #[error("storage read failed for '{key}': {reason}")]
    Read { key: String, reason: String },

    /// Writing or removing a key failed (quota, read-only scope).
    #[error("storage write failed for '{key}': {reason}")]
    Write { key: String, reason: String },

    /// The value to store could not be serialized.
    #[error("storage encode failed: {0}")]
    Encode(String),
}

/// A string-keyed, string-valued storage area with `localStorage` semantics.
pub trait StorageArea {
    /// Read `key`, returning `None` when it is not set.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set `key` to `value`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend rejects the removal.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
