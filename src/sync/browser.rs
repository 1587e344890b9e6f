//! Browser `storage` event source.
//!
//! The browser fires `storage` on every *other* document sharing the origin's
//! storage when a key changes, which is exactly the cross-tab signal the
//! session needs. Requires a browser environment; elsewhere subscriptions
//! are inert.

use super::{ChangeHandler, ChangeSource, ChangeSubscription};
#[cfg(feature = "hydrate")]
use super::StorageChange;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorageEvents;

#[cfg(feature = "hydrate")]
fn change_from_event(event: &web_sys::StorageEvent) -> StorageChange {
    StorageChange { key: event.key(), old_value: event.old_value(), new_value: event.new_value() }
}

impl ChangeSource for BrowserStorageEvents {
    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    fn subscribe(&self, handler: ChangeHandler) -> ChangeSubscription {
        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen::JsCast;
            use wasm_bindgen::closure::Closure;

            let Some(window) = web_sys::window() else {
                leptos::logging::warn!("no window; cross-tab session sync disabled");
                return ChangeSubscription::inert();
            };
            let callback = Closure::wrap(Box::new(move |event: web_sys::StorageEvent| {
                handler(&change_from_event(&event));
            }) as Box<dyn FnMut(web_sys::StorageEvent)>);

            if let Err(e) = window.add_event_listener_with_callback("storage", callback.as_ref().unchecked_ref()) {
                leptos::logging::warn!("failed to attach storage listener: {e:?}");
                return ChangeSubscription::inert();
            }
            ChangeSubscription::new(move || {
                if let Err(e) =
                    window.remove_event_listener_with_callback("storage", callback.as_ref().unchecked_ref())
                {
                    leptos::logging::warn!("failed to detach storage listener: {e:?}");
                }
            })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            ChangeSubscription::inert()
        }
    }
}
