//! In-memory storage scope shared by several contexts.
//!
//! DESIGN
//! ======
//! A [`MemoryScope`] plays the role of one browser profile's storage; each
//! [`MemoryStorage`] obtained from it is one context (tab). Writes through a
//! context notify every *other* context's subscribers, mirroring how the
//! browser `storage` event skips the tab that made the change. Writes that
//! leave a value unchanged notify nobody.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use super::{StorageArea, StorageError};
use crate::sync::{ChangeHandler, ChangeSource, ChangeSubscription, StorageChange};

/// Context id used by [`MemoryScope::external_set`]; never handed out.
const EXTERNAL_CONTEXT: u64 = 0;

struct Listener {
    id: u64,
    context: u64,
    handler: ChangeHandler,
}

#[derive(Default)]
struct ScopeInner {
    items: RefCell<BTreeMap<String, String>>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
    next_context: Cell<u64>,
    read_only: Cell<bool>,
}

impl ScopeInner {
    fn notify(&self, origin: u64, change: &StorageChange) {
        let handlers: Vec<ChangeHandler> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.context != origin)
            .map(|l| Rc::clone(&l.handler))
            .collect();
        for handler in handlers {
            handler(change);
        }
    }

    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.read_only.get() {
            return Err(StorageError::Write { key: key.to_owned(), reason: "scope is read-only".to_owned() });
        }
        Ok(())
    }

    fn set(&self, origin: u64, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        let old = self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        if old.as_deref() != Some(value) {
            self.notify(origin, &StorageChange::keyed(key, old, Some(value.to_owned())));
        }
        Ok(())
    }

    fn remove(&self, origin: u64, key: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        let old = self.items.borrow_mut().remove(key);
        if old.is_some() {
            self.notify(origin, &StorageChange::keyed(key, old, None));
        }
        Ok(())
    }
}

/// One storage profile shared by any number of contexts.
#[derive(Clone, Default)]
pub struct MemoryScope {
    inner: Rc<ScopeInner>,
}

impl MemoryScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new context (tab) onto this scope.
    #[must_use]
    pub fn context(&self) -> MemoryStorage {
        let id = self.inner.next_context.get() + 1;
        self.inner.next_context.set(id);
        MemoryStorage { inner: Rc::clone(&self.inner), context: id }
    }

    /// Write as if from a context outside this process (devtools, another
    /// window), notifying every context.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] when the scope is read-only.
    pub fn external_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(EXTERNAL_CONTEXT, key, value)
    }

    /// Remove as if from a context outside this process.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] when the scope is read-only.
    pub fn external_remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(EXTERNAL_CONTEXT, key)
    }

    /// Make every subsequent write fail, emulating an exhausted quota.
    pub fn set_read_only(&self, read_only: bool) {
        self.inner.read_only.set(read_only);
    }

    /// Raw value of `key`, bypassing any context.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.items.borrow().get(key).cloned()
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single context's view of a [`MemoryScope`].
#[derive(Clone)]
pub struct MemoryStorage {
    inner: Rc<ScopeInner>,
    context: u64,
}

impl MemoryStorage {
    /// Remove every key, notifying other contexts with a keyless change.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] when the scope is read-only.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.inner.check_writable("*")?;
        let had_items = {
            let mut items = self.inner.items.borrow_mut();
            let had = !items.is_empty();
            items.clear();
            had
        };
        if had_items {
            self.inner.notify(self.context, &StorageChange::cleared());
        }
        Ok(())
    }
}

impl StorageArea for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(self.context, key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(self.context, key)
    }
}

impl ChangeSource for MemoryStorage {
    fn subscribe(&self, handler: ChangeHandler) -> ChangeSubscription {
        let id = self.inner.next_listener.get() + 1;
        self.inner.next_listener.set(id);
        self.inner.listeners.borrow_mut().push(Listener { id, context: self.context, handler });

        let scope: Weak<ScopeInner> = Rc::downgrade(&self.inner);
        ChangeSubscription::new(move || {
            if let Some(scope) = scope.upgrade() {
                scope.listeners.borrow_mut().retain(|l| l.id != id);
            }
        })
    }
}
