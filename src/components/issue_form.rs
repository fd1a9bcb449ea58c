//! Issue Form Component
//!
//! Creation form with the full dependent selection chain
//! (Project -> Milestone -> Task -> Subtask). The chain can be pre-seeded
//! with a fixed project id when the form is opened from inside a project.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use viewflow::{DependentChain, DraftValidation};

use crate::api::{self, CreateIssueArgs};
use crate::components::attachment_input::AttachmentInput;
use crate::components::chain_select::{load_root_options, run_stage_fetch, ChainSelect};
use crate::context::AppContext;
use crate::models::AttachmentDraft;
use crate::store::{use_app_store, AppStateStoreFields};

/// Issue type options
pub const ISSUE_TYPES: &[(&str, &str)] = &[
    ("bug", "Bug"),
    ("feature", "Feature"),
    ("improvement", "Improvement"),
];

/// Issue priority options
pub const ISSUE_PRIORITIES: &[(&str, &str)] = &[
    ("low", "Low"),
    ("medium", "Medium"),
    ("high", "High"),
    ("critical", "Critical"),
];

const CHAIN_KEYS: &[&str] = &["project", "milestone", "task", "subtask"];

/// Form for creating issues
#[component]
pub fn IssueForm(#[prop(optional)] project_id: Option<u64>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();

    let (chain_state, seed_spec) = match project_id {
        Some(id) => DependentChain::seeded(CHAIN_KEYS, id),
        None => (DependentChain::new(CHAIN_KEYS), None),
    };
    let chain = RwSignal::new(chain_state);
    if let Some(spec) = seed_spec {
        run_stage_fetch(chain, spec);
    } else {
        load_root_options(chain);
    }

    let (title, set_title) = signal(String::new());
    let (issue_type, set_issue_type) = signal(String::from("bug"));
    let (priority, set_priority) = signal(String::from("medium"));
    let (responsible, set_responsible) = signal::<Option<u64>>(None);
    let (start_date, set_start_date) = signal(String::new());
    let (end_date, set_end_date) = signal(String::new());
    let (comment, set_comment) = signal(String::new());
    let attachments = RwSignal::new(Vec::<AttachmentDraft>::new());
    // The form has no outside-commit, so only the add-row consumes this
    let (_file_dialog_open, set_file_dialog_open) = signal(false);
    let (validation, set_validation) = signal(DraftValidation::default());
    let (saving, set_saving) = signal(false);

    let reset_fields = move || {
        set_title.set(String::new());
        set_issue_type.set("bug".to_string());
        set_priority.set("medium".to_string());
        set_responsible.set(None);
        set_start_date.set(String::new());
        set_end_date.set(String::new());
        set_comment.set(String::new());
        attachments.set(Vec::new());
        set_validation.set(DraftValidation::default());
        let spec = chain.try_update(|c| c.reset()).flatten();
        match spec {
            Some(spec) => run_stage_fetch(chain, spec),
            // Unseeded chain: reload the project list for stage 0
            None => load_root_options(chain),
        }
    };

    let create_issue = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get() {
            return;
        }
        // The standalone form does not require a task; the chain is there
        // to attach the issue as deep as the user wants.
        let checked = DraftValidation::check(&title.get(), &end_date.get(), None, false);
        set_validation.set(checked);
        if !checked.ok() {
            return;
        }
        set_saving.set(true);

        let title_value = title.get();
        let issue_type_value = issue_type.get();
        let priority_value = priority.get();
        let start_date_value = start_date.get();
        let end_date_value = end_date.get();
        let comment_value = comment.get();
        let responsible_value = responsible.get();
        let (project, milestone, task, subtask) = chain.with_untracked(|c| {
            (
                c.selection("project"),
                c.selection("milestone"),
                c.selection("task"),
                c.selection("subtask"),
            )
        });
        let files = attachments.get_untracked();

        spawn_local(async move {
            let args = CreateIssueArgs {
                title: &title_value,
                issue_type: &issue_type_value,
                priority: &priority_value,
                responsible_id: responsible_value,
                start_date: (!start_date_value.is_empty()).then_some(start_date_value.as_str()),
                end_date: &end_date_value,
                project_id: project,
                milestone_id: milestone,
                task_id: task,
                subtask_id: subtask,
                comment: (!comment_value.is_empty()).then_some(comment_value.as_str()),
                attachments: &files,
            };
            match api::create_issue(&args).await {
                Ok(_) => {
                    reset_fields();
                    ctx.notify("Issue created".to_string());
                    ctx.reload();
                }
                Err(err) => {
                    web_sys::console::error_1(
                        &format!("[IssueForm] create failed: {}", err).into(),
                    );
                    // Entered data stays intact for another attempt
                    ctx.notify(err.user_message());
                }
            }
            set_saving.set(false);
        });
    };

    view! {
        <form class="issue-form" on:submit=create_issue>
            <h2>"New Issue"</h2>

            <input
                type="text"
                class=move || if validation.get().title_missing { "field invalid" } else { "field" }
                placeholder="Issue title..."
                prop:value=move || title.get()
                on:input=move |ev| {
                    let target = ev.target().unwrap();
                    let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                    set_title.set(input.value());
                }
            />

            <div class="chain-row">
                <ChainSelect chain=chain stage_key="project" label="Project" />
                <ChainSelect chain=chain stage_key="milestone" label="Milestone" />
                <ChainSelect chain=chain stage_key="task" label="Task" />
                <ChainSelect chain=chain stage_key="subtask" label="Subtask" />
            </div>

            <div class="type-selector-row">
                {ISSUE_TYPES.iter().map(|(value, label)| {
                    let val = *value;
                    let is_selected = move || issue_type.get() == val;
                    view! {
                        <button
                            type="button"
                            class=move || if is_selected() { "type-btn active" } else { "type-btn" }
                            on:click=move |_| set_issue_type.set(val.to_string())
                        >
                            {*label}
                        </button>
                    }
                }).collect_view()}
            </div>

            <div class="priority-selector-row">
                {ISSUE_PRIORITIES.iter().map(|(value, label)| {
                    let val = *value;
                    let is_selected = move || priority.get() == val;
                    view! {
                        <button
                            type="button"
                            class=move || if is_selected() { "priority-btn active" } else { "priority-btn" }
                            on:click=move |_| set_priority.set(val.to_string())
                        >
                            {*label}
                        </button>
                    }
                }).collect_view()}
            </div>

            <label class="form-field">
                <span>"Responsible"</span>
                <select on:change=move |ev| {
                    let target = ev.target().unwrap();
                    let select = target.dyn_ref::<web_sys::HtmlSelectElement>().unwrap();
                    set_responsible.set(select.value().parse::<u64>().ok());
                }>
                    <option value="">"Unassigned"</option>
                    {move || {
                        store.users().get()
                            .into_iter()
                            .map(|user| {
                                let opt = user.to_option();
                                view! {
                                    <option value=opt.id.to_string()>{opt.label}</option>
                                }
                            })
                            .collect_view()
                    }}
                </select>
            </label>

            <label class="form-field">
                <span>"Start date"</span>
                <input
                    type="date"
                    prop:value=move || start_date.get()
                    on:input=move |ev| {
                        let target = ev.target().unwrap();
                        let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                        set_start_date.set(input.value());
                    }
                />
            </label>

            <label class="form-field">
                <span>"End date"</span>
                <input
                    type="date"
                    class=move || if validation.get().end_date_missing { "field invalid" } else { "field" }
                    prop:value=move || end_date.get()
                    on:input=move |ev| {
                        let target = ev.target().unwrap();
                        let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                        set_end_date.set(input.value());
                    }
                />
            </label>

            <textarea
                class="form-comment"
                placeholder="Comment..."
                prop:value=move || comment.get()
                on:input=move |ev| {
                    let target = ev.target().unwrap();
                    let textarea = target.dyn_ref::<web_sys::HtmlTextAreaElement>().unwrap();
                    set_comment.set(textarea.value());
                }
            ></textarea>

            <AttachmentInput attachments=attachments set_dialog_open=set_file_dialog_open />

            <div class="form-actions">
                <button type="submit" disabled=move || saving.get()>
                    {move || if saving.get() { "Saving..." } else { "Create" }}
                </button>
                <button type="button" class="cancel-btn" on:click=move |_| reset_fields()>
                    "Cancel"
                </button>
            </div>
        </form>
    }
}
