//! Cross-context change propagation.
//!
//! ARCHITECTURE
//! ============
//! A [`ChangeSource`] delivers key-scoped storage notifications written by
//! *other* contexts sharing the same storage scope (sibling tabs, windows).
//! [`CrossContextListener`] filters them down to the two credential keys and
//! re-runs [`SessionManager::restore`](crate::state::manager::SessionManager::restore)
//! so every context converges on the same session.


pub mod browser;

use std::fmt;
use std::rc::Rc;

use crate::config::StorageKeys;
use crate::state::manager::{SessionManager, WeakSessionManager};

/// One storage mutation observed from another context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    /// Changed key; `None` when the whole area was cleared.
    pub key: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl StorageChange {
    #[must_use]
    pub fn keyed(key: impl Into<String>, old_value: Option<String>, new_value: Option<String>) -> Self {
        Self { key: Some(key.into()), old_value, new_value }
    }

    #[must_use]
    pub fn cleared() -> Self {
        Self { key: None, old_value: None, new_value: None }
    }
}

/// Callback invoked for every change a source delivers.
pub type ChangeHandler = Rc<dyn Fn(&StorageChange)>;

/// A publisher of storage change notifications.
pub trait ChangeSource {
    /// Register `handler`. It stays registered until the returned
    /// subscription is dropped.
    fn subscribe(&self, handler: ChangeHandler) -> ChangeSubscription;
}

/// Registration guard; dropping it detaches the handler.
pub struct ChangeSubscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl ChangeSubscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// A subscription with nothing to detach (source unavailable).
    #[must_use]
    pub fn inert() -> Self {
        Self { cancel: None }
    }
}

impl fmt::Debug for ChangeSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeSubscription").field("active", &self.cancel.is_some()).finish()
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Whether `change` touches either credential slot.
///
/// A keyless change means the whole area was cleared, which removes both.
#[must_use]
pub fn is_relevant(change: &StorageChange, keys: &StorageKeys) -> bool {
    change.key.as_deref().is_none_or(|key| keys.contains(key))
}

/// Keeps a session manager in step with credential writes from other contexts.
#[derive(Debug)]
pub struct CrossContextListener {
    _subscription: ChangeSubscription,
}

impl CrossContextListener {
    /// Attach `manager` to `source`, scoped to `keys`.
    ///
    /// The listener holds only a weak handle: once the last manager handle is
    /// dropped, notifications are ignored.
    pub fn attach(source: &dyn ChangeSource, manager: &SessionManager, keys: StorageKeys) -> Self {
        let weak: WeakSessionManager = manager.downgrade();
        let handler: ChangeHandler = Rc::new(move |change: &StorageChange| {
            if !is_relevant(change, &keys) {
                return;
            }
            let Some(manager) = weak.upgrade() else {
                return;
            };
            leptos::logging::log!("credential slot changed in another context: key={:?}", change.key);
            manager.resync();
        });
        Self { _subscription: source.subscribe(handler) }
    }
}
