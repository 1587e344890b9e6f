//! Persisted `{token, user}` record stored under two independent keys.
//!
//! ERROR HANDLING
//! ==============
//! Reads never fail: a missing, half-written, or unparseable record is
//! reported as a [`StoredCredentials`] outcome and the caller decides whether
//! to purge. Writes surface backend errors so the caller can log them.

#[cfg(test)]
#[path = "credentials_test.rs"]
mod credentials_test;

use std::rc::Rc;

use super::{StorageArea, StorageError};
use crate::config::StorageKeys;
use crate::net::types::User;

/// What [`CredentialStore::inspect`] found in storage.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredCredentials {
    /// Both slots hold a usable value.
    Present { token: String, user: User },
    /// Neither slot is set.
    Absent,
    /// Exactly one slot is set.
    Partial,
    /// Both slots are set but the user slot does not parse.
    Corrupt { reason: String },
}

#[derive(Clone)]
pub struct CredentialStore {
    area: Rc<dyn StorageArea>,
    keys: StorageKeys,
}

impl CredentialStore {
    pub fn new(area: Rc<dyn StorageArea>, keys: StorageKeys) -> Self {
        Self { area, keys }
    }

    #[must_use]
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Write both slots.
    ///
    /// The token slot is removed first and written last. Readers in this or
    /// any other context therefore see either the previous pair, a partial
    /// record, or the new pair, never a new token beside an old user. A
    /// failed write leaves the record partial.
    ///
    /// `extra` keys that collide with named user fields are not persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Encode`] if the user cannot be serialized, or
    /// the backend's error if any step fails.
    pub fn save(&self, token: &str, user: &User) -> Result<(), StorageError> {
        let user = user.clone().without_reserved_extra();
        let raw_user = serde_json::to_string(&user).map_err(|e| StorageError::Encode(e.to_string()))?;
        self.area.remove_item(&self.keys.token)?;
        self.area.set_item(&self.keys.user, &raw_user)?;
        self.area.set_item(&self.keys.token, token)
    }

    /// `Some((token, user))` only when the record is complete and valid.
    #[must_use]
    pub fn load(&self) -> Option<(String, User)> {
        match self.inspect() {
            StoredCredentials::Present { token, user } => Some((token, user)),
            StoredCredentials::Absent | StoredCredentials::Partial | StoredCredentials::Corrupt { .. } => None,
        }
    }

    /// Classify the current contents of both slots.
    #[must_use]
    pub fn inspect(&self) -> StoredCredentials {
        let token = self.read_slot(&self.keys.token);
        let raw_user = self.read_slot(&self.keys.user);
        match (token, raw_user) {
            (None, None) => StoredCredentials::Absent,
            (Some(_), None) | (None, Some(_)) => StoredCredentials::Partial,
            (Some(token), Some(raw_user)) => match serde_json::from_str::<User>(&raw_user) {
                Ok(user) => StoredCredentials::Present { token, user },
                Err(e) => StoredCredentials::Corrupt { reason: e.to_string() },
            },
        }
    }

    /// Remove both slots. Both removals are attempted; the first failure wins.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if either removal fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.area.remove_item(&self.keys.token);
        let user = self.area.remove_item(&self.keys.user);
        token.and(user)
    }

    /// Read a slot, treating blank values and read failures as unset.
    fn read_slot(&self, key: &str) -> Option<String> {
        match self.area.get_item(key) {
            Ok(Some(value)) if !value.trim().is_empty() => Some(value),
            Ok(_) => None,
            Err(e) => {
                leptos::logging::warn!("credential slot unreadable: {e}");
                None
            }
        }
    }
}
