//! UI Components
//!
//! Reusable Leptos components.

mod attachment_input;
mod chain_select;
mod issue_form;
mod issue_table;
mod outside_click;
mod pagination_bar;
mod status_filter_bar;
mod toast;

pub use attachment_input::AttachmentInput;
pub use chain_select::{load_root_options, run_stage_fetch, select_stage, ChainSelect};
pub use issue_form::{IssueForm, ISSUE_PRIORITIES, ISSUE_TYPES};
pub use issue_table::IssueTable;
pub use outside_click::bind_outside_mousedown;
pub use pagination_bar::PaginationBar;
pub use status_filter_bar::{StatusFilterBar, ISSUE_STATUSES};
pub use toast::ToastList;
