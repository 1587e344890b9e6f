//! Process-wide session runtime: one manager plus its cross-context listener.
//!
//! ARCHITECTURE
//! ============
//! Built once at startup and handed to the UI root, which provides the
//! manager to components. Dropping the runtime detaches cross-tab sync; the
//! manager handles it gave out keep working in isolation.

#[cfg(test)]
#[path = "runtime_test.rs"]
mod runtime_test;

use crate::config::StorageKeys;
use crate::state::manager::SessionManager;
use crate::sync::{ChangeSource, CrossContextListener};

#[derive(Debug)]
pub struct SessionRuntime {
    manager: SessionManager,
    _listener: CrossContextListener,
}

impl SessionRuntime {
    /// Attach `manager` to `source` and run the startup restore.
    ///
    /// The listener is attached first so a sibling write that lands during
    /// the restore is not missed.
    pub fn new(manager: SessionManager, source: &dyn ChangeSource, keys: StorageKeys) -> Self {
        let listener = CrossContextListener::attach(source, &manager, keys);
        manager.restore();
        Self { manager, _listener: listener }
    }

    #[must_use]
    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }
}

/// Browser entry point: console logging, `localStorage`, HTTP identity
/// service, and `storage`-event sync.
#[cfg(feature = "hydrate")]
pub fn start(config: crate::config::SessionConfig) -> SessionRuntime {
    use std::rc::Rc;

    use crate::net::api::HttpIdentityService;
    use crate::storage::local::LocalStorage;
    use crate::sync::browser::BrowserStorageEvents;

    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger already set: {e}");
    }

    let service = Rc::new(HttpIdentityService::new(config.endpoints.clone()));
    let manager = SessionManager::new(service, Rc::new(LocalStorage), &config);
    log::info!("session runtime starting: token_key={}", config.storage_keys.token);
    SessionRuntime::new(manager, &BrowserStorageEvents, config.storage_keys)
}
