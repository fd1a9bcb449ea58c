//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Holds the
//! lookup data shared across forms and table cells.

use leptos::prelude::*;
use reactive_stores::Store;
use crate::models::{Project, User};

/// Shared lookup data loaded once on mount
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Users for the responsible-person selects
    pub users: Vec<User>,
    /// Projects for the first chain stage
    pub projects: Vec<Project>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Replace the user list
pub fn store_set_users(store: &AppStore, users: Vec<User>) {
    *store.users().write() = users;
}

/// Replace the project list
pub fn store_set_projects(store: &AppStore, projects: Vec<Project>) {
    *store.projects().write() = projects;
}

/// Display name for a user id, used by the table's responsible cell
pub fn store_user_name(store: &AppStore, user_id: u64) -> Option<String> {
    store
        .users()
        .read()
        .iter()
        .find(|u| u.id == user_id)
        .map(|u| u.name.clone())
}
