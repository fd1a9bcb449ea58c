//! Status Filter Bar Component
//!
//! Shortcut buttons writing the persisted status filter the issues view
//! honors when no structured filter is present.

use leptos::prelude::*;

use crate::context::AppContext;
use crate::filter;

/// Issue status options
pub const ISSUE_STATUSES: &[(&str, &str)] = &[
    ("open", "Open"),
    ("in_progress", "In Progress"),
    ("resolved", "Resolved"),
    ("closed", "Closed"),
];

/// Status shortcut buttons for the issues table
#[component]
pub fn StatusFilterBar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (active, set_active) = signal(filter::read_status_shortcut());

    let select = move |status: Option<&'static str>| {
        filter::write_status_shortcut(status);
        set_active.set(status.map(str::to_string));
        ctx.reload();
    };

    view! {
        <div class="status-filter-bar">
            <button
                class=move || if active.get().is_none() { "status-btn active" } else { "status-btn" }
                on:click=move |_| select(None)
            >
                "All"
            </button>
            {ISSUE_STATUSES.iter().map(|(value, label)| {
                let val = *value;
                let is_selected = move || active.get().as_deref() == Some(val);
                view! {
                    <button
                        class=move || if is_selected() { "status-btn active" } else { "status-btn" }
                        on:click=move |_| select(Some(val))
                    >
                        {*label}
                    </button>
                }
            }).collect_view()}
        </div>
    }
}
