//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;

/// A transient user-facing message
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Trigger to reload the issues table - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to reload the issues table - write
    set_reload_trigger: WriteSignal<u32>,
    /// Transient messages - read
    pub toasts: ReadSignal<Vec<Toast>>,
    /// Transient messages - write
    set_toasts: WriteSignal<Vec<Toast>>,
}

impl AppContext {
    pub fn new(
        reload_trigger: (ReadSignal<u32>, WriteSignal<u32>),
        toasts: (ReadSignal<Vec<Toast>>, WriteSignal<Vec<Toast>>),
    ) -> Self {
        Self {
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
            toasts: toasts.0,
            set_toasts: toasts.1,
        }
    }

    /// Trigger a reload of the issues table
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    /// Show a transient message
    pub fn notify(&self, message: String) {
        let id = js_sys::Date::now() as u64;
        self.set_toasts.update(|list| list.push(Toast { id, message }));
    }

    /// Remove a message by id
    pub fn dismiss(&self, id: u64) {
        self.set_toasts.update(|list| list.retain(|t| t.id != id));
    }
}
