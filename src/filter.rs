//! Persisted Filter Context
//!
//! The issues view reads its filter from client-side storage; writers are
//! the status shortcut bar and the (external) structured-filter editor.
//! Single-writer, multi-reader, last-write-wins; both keys are cleared on
//! page unload by the writer side.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use viewflow::FilterContext;

pub const STRUCTURED_KEY: &str = "workboard.filter.structured";
pub const STATUS_KEY: &str = "workboard.filter.status";

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn read_key(key: &str) -> Option<String> {
    storage().and_then(|s| s.get_item(key).ok().flatten())
}

/// The filter currently honored by the issues view. Structured takes
/// precedence over the status shortcut when both happen to be present.
pub fn read_filter_context() -> FilterContext {
    FilterContext::resolve(read_key(STRUCTURED_KEY), read_key(STATUS_KEY))
}

/// Status shortcut currently persisted, for highlighting the active
/// button in the shortcut bar.
pub fn read_status_shortcut() -> Option<String> {
    read_key(STATUS_KEY)
}

/// Write (or clear) the status shortcut filter.
pub fn write_status_shortcut(status: Option<&str>) {
    let Some(storage) = storage() else { return };
    match status {
        Some(status) => {
            let _ = storage.set_item(STATUS_KEY, status);
        }
        None => {
            let _ = storage.remove_item(STATUS_KEY);
        }
    }
}

/// Drop both persisted filters when the page unloads, so a stale filter
/// never leaks into the next session.
pub fn bind_clear_on_unload() {
    let Some(window) = web_sys::window() else { return };
    let on_unload = Closure::<dyn FnMut()>::new(move || {
        if let Some(storage) = storage() {
            let _ = storage.remove_item(STRUCTURED_KEY);
            let _ = storage.remove_item(STATUS_KEY);
        }
    });
    let _ = window
        .add_event_listener_with_callback("beforeunload", on_unload.as_ref().unchecked_ref());
    on_unload.forget();
}
