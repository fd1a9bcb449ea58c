//! Outside Interaction Binding
//!
//! Document-level pointer listener bound once and forgotten, consulting
//! current state on every event. Used by the inline add-row to commit on
//! a press outside its DOM region.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Bind a document-wide mousedown listener that runs `on_outside` when a
/// press lands outside the node returned by `container`, but only while
/// `is_active` returns true. Callers gate `is_active` on their own guard
/// flags (save in flight, file dialog open).
pub fn bind_outside_mousedown(
    is_active: impl Fn() -> bool + 'static,
    container: impl Fn() -> Option<web_sys::Node> + 'static,
    on_outside: Callback<()>,
) {
    let on_mousedown =
        Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
            if !is_active() {
                return;
            }
            let inside = ev
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
                .zip(container())
                .map(|(node, root)| root.contains(Some(&node)))
                .unwrap_or(false);
            if !inside {
                on_outside.run(());
            }
        });
    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc
                .add_event_listener_with_callback("mousedown", on_mousedown.as_ref().unchecked_ref());
        }
    }
    on_mousedown.forget();
}
