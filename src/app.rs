//! Workboard Frontend App
//!
//! Main application component with the form column and the issues table.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::{IssueForm, IssueTable, StatusFilterBar, ToastList};
use crate::context::{AppContext, Toast};
use crate::filter;
use crate::store::{store_set_projects, store_set_users, AppState, AppStore};

#[component]
pub fn App() -> impl IntoView {
    let (reload_trigger, set_reload_trigger) = signal(0u32);
    let (toasts, set_toasts) = signal(Vec::<Toast>::new());

    let store = AppStore::new(AppState::default());
    provide_context(store);
    provide_context(AppContext::new(
        (reload_trigger, set_reload_trigger),
        (toasts, set_toasts),
    ));

    // The filter writers drop their persisted state when the page goes away
    filter::bind_clear_on_unload();

    // Load shared lookup data once on mount
    Effect::new(move |_| {
        spawn_local(async move {
            match api::list_users().await {
                Ok(users) => store_set_users(&store, users),
                Err(err) => {
                    web_sys::console::error_1(&format!("[App] loading users failed: {}", err).into());
                }
            }
            match api::list_projects().await {
                Ok(projects) => store_set_projects(&store, projects),
                Err(err) => {
                    web_sys::console::error_1(
                        &format!("[App] loading projects failed: {}", err).into(),
                    );
                }
            }
        });
    });

    view! {
        <div class="app-layout">
            // Left: issue creation form
            <aside class="form-column">
                <IssueForm />
            </aside>

            // Center: issues console
            <main class="main-content">
                <h1>"Workboard"</h1>
                <StatusFilterBar />
                <IssueTable />
            </main>

            <ToastList />
        </div>
    }
}
