//! Browser `localStorage` backend.
//!
//! The storage handle is looked up on every call instead of cached so the
//! backend stays a plain value type and SSR paths can no-op with an error.
//!
//! TRADE-OFFS
//! ==========
//! Lookup failures (no window, storage disabled by privacy settings) are
//! reported as [`StorageError::Unavailable`]; the session layer treats them
//! as "nothing persisted" and keeps working in memory.

use super::{StorageArea, StorageError};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

#[cfg(feature = "hydrate")]
fn storage() -> Result<web_sys::Storage, StorageError> {
    let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_owned()))?;
    match window.local_storage() {
        Ok(Some(storage)) => Ok(storage),
        Ok(None) => Err(StorageError::Unavailable("localStorage disabled".to_owned())),
        Err(e) => Err(StorageError::Unavailable(format!("{e:?}"))),
    }
}

impl StorageArea for LocalStorage {
    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "hydrate")]
        {
            storage()?
                .get_item(key)
                .map_err(|e| StorageError::Read { key: key.to_owned(), reason: format!("{e:?}") })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(StorageError::Unavailable("not available on server".to_owned()))
        }
    }

    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            storage()?
                .set_item(key, value)
                .map_err(|e| StorageError::Write { key: key.to_owned(), reason: format!("{e:?}") })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(StorageError::Unavailable("not available on server".to_owned()))
        }
    }

    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            storage()?
                .remove_item(key)
                .map_err(|e| StorageError::Write { key: key.to_owned(), reason: format!("{e:?}") })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(StorageError::Unavailable("not available on server".to_owned()))
        }
    }
}
