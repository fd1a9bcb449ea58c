//! Issue Table Component
//!
//! Server-paginated issues table with per-field inline editing, an inline
//! add-row, and the sliding pagination window. Edits are serialized by
//! the collection view's single in-flight mutation flag; every mutation
//! is followed by a refetch honoring the persisted filter so the table
//! never diverges from server state.

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use viewflow::{
    CollectionView, CreateAttempt, DependentChain, DraftValidation, FetchPlan, MutationCommand,
};

use crate::api::{self, CreateIssueArgs};
use crate::components::attachment_input::AttachmentInput;
use crate::components::chain_select::{load_root_options, ChainSelect};
use crate::components::issue_form::ISSUE_PRIORITIES;
use crate::components::outside_click::bind_outside_mousedown;
use crate::components::pagination_bar::PaginationBar;
use crate::components::status_filter_bar::ISSUE_STATUSES;
use crate::context::AppContext;
use crate::filter;
use crate::models::{AttachmentDraft, Issue};
use crate::store::{store_user_name, use_app_store, AppStateStoreFields};

const PAGE_SIZE: u32 = 10;

/// Chain used by the add-row; an inline-created issue must land on a task.
const ADD_CHAIN_KEYS: &[&str] = &["project", "milestone", "task"];

async fn run_plan(view: RwSignal<CollectionView<Issue>>, plan: FetchPlan) {
    let result = api::fetch_issue_page(&plan)
        .await
        .map(|page| (page.items, page.pagination));
    view.update(|v| v.load_finished(result));
}

/// The issues collection view
#[component]
pub fn IssueTable() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();

    let view = RwSignal::new(CollectionView::<Issue>::new(PAGE_SIZE));

    let load = move || {
        let filter = filter::read_filter_context();
        let Some(plan) = view.try_update(|v| {
            v.load_started();
            v.fetch_plan(&filter)
        }) else {
            return;
        };
        spawn_local(run_plan(view, plan));
    };

    // Initial load plus every external reload request
    Effect::new(move |_| {
        let _ = ctx.reload_trigger.get();
        load();
    });

    let navigate = move |page: usize| {
        view.update(|v| v.set_page(page));
        load();
    };

    // Execute an edit command the view handed out. Completion always
    // refetches under the filter active at completion time; a failure
    // additionally surfaces its message.
    let run_edit = move |command: Option<MutationCommand>| {
        let Some(command) = command else {
            // Busy (another mutation in flight): ignored, not queued
            return;
        };
        spawn_local(async move {
            let result = api::run_mutation(&command).await;
            let filter = filter::read_filter_context();
            let Some(plan) = view.try_update(|v| v.finish_mutation(result, &filter)) else {
                return;
            };
            if let Some(message) = view.try_update(|v| v.take_mutation_error()).flatten() {
                web_sys::console::error_1(
                    &format!("[IssueTable] mutation failed: {}", message).into(),
                );
                ctx.notify(message);
            }
            view.update(|v| v.load_started());
            run_plan(view, plan).await;
        });
    };

    let edit_field = move |issue_id: u64, field: &'static str, value: String| {
        run_edit(
            view.try_update(|v| v.begin_edit(issue_id, field, &value))
                .flatten(),
        );
    };

    let edit_comment = move |issue_id: u64, text: String| {
        run_edit(
            view.try_update(|v| v.begin_comment_edit(issue_id, &text))
                .flatten(),
        );
    };

    // ========================
    // Inline Add-Row State
    // ========================

    let (add_open, set_add_open) = signal(false);
    let (draft_title, set_draft_title) = signal(String::new());
    let (draft_end_date, set_draft_end_date) = signal(String::new());
    let (draft_priority, set_draft_priority) = signal("medium".to_string());
    let draft_attachments = RwSignal::new(Vec::<AttachmentDraft>::new());
    let (draft_validation, set_draft_validation) = signal(DraftValidation::default());
    let (file_dialog_open, set_file_dialog_open) = signal(false);
    let add_chain = RwSignal::new(DependentChain::new(ADD_CHAIN_KEYS));
    let row_ref = NodeRef::<html::Tr>::new();

    let open_add_row = move || {
        set_add_open.set(true);
        load_root_options(add_chain);
    };

    let clear_add_row = move || {
        set_add_open.set(false);
        set_draft_title.set(String::new());
        set_draft_end_date.set(String::new());
        set_draft_priority.set("medium".to_string());
        draft_attachments.set(Vec::new());
        set_draft_validation.set(DraftValidation::default());
        add_chain.update(|c| {
            c.reset();
        });
    };

    // Commit the draft: validation first (no server call when a required
    // field is missing), then create + reload.
    let commit_add_row = move || {
        let (project, milestone, task) = add_chain.with_untracked(|c| {
            (
                c.selection("project"),
                c.selection("milestone"),
                c.selection("task"),
            )
        });
        let title = draft_title.get_untracked();
        let end_date = draft_end_date.get_untracked();
        let Some(attempt) =
            view.try_update(|v| v.begin_create(&title, &end_date, task, true))
        else {
            return;
        };
        match attempt {
            CreateAttempt::Invalid(validation) => set_draft_validation.set(validation),
            CreateAttempt::Busy => {}
            CreateAttempt::Ready => {
                set_draft_validation.set(DraftValidation::default());
                let priority = draft_priority.get_untracked();
                let files = draft_attachments.get_untracked();
                spawn_local(async move {
                    let args = CreateIssueArgs {
                        title: &title,
                        issue_type: "bug",
                        priority: &priority,
                        responsible_id: None,
                        start_date: None,
                        end_date: &end_date,
                        project_id: project,
                        milestone_id: milestone,
                        task_id: task,
                        subtask_id: None,
                        comment: None,
                        attachments: &files,
                    };
                    let result = api::create_issue(&args).await.map(|_| ());
                    let filter = filter::read_filter_context();
                    let Some(outcome) = view.try_update(|v| v.finish_create(result, &filter))
                    else {
                        return;
                    };
                    if let Some(message) = view.try_update(|v| v.take_mutation_error()).flatten()
                    {
                        web_sys::console::error_1(
                            &format!("[IssueTable] create failed: {}", message).into(),
                        );
                        ctx.notify(message);
                    }
                    if outcome.close_row {
                        clear_add_row();
                    }
                    if let Some(plan) = outcome.refetch {
                        view.update(|v| v.load_started());
                        run_plan(view, plan).await;
                    }
                });
            }
        }
    };

    // A press outside the row commits it (blur-to-save), unless a save is
    // already in flight or the file dialog is open.
    bind_outside_mousedown(
        move || {
            add_open.get_untracked()
                && !view.with_untracked(|v| v.is_updating())
                && !file_dialog_open.get_untracked()
        },
        move || {
            row_ref
                .get_untracked()
                .map(|el| el.unchecked_into::<web_sys::Node>())
        },
        Callback::new(move |_| commit_add_row()),
    );

    let busy = move || view.with(|v| v.is_updating());

    view! {
        <div class="issue-table-wrapper">
            <Show when=move || view.with(|v| v.is_loading())>
                <div class="loading">"Loading..."</div>
            </Show>
            <Show when=move || view.with(|v| v.load_error().is_some())>
                <div class="error-banner">
                    {move || view.with(|v| v.load_error().unwrap_or_default().to_string())}
                </div>
            </Show>

            <table class="issue-table">
                <thead>
                    <tr>
                        <th>"Title"</th>
                        <th>"Status"</th>
                        <th>"Type"</th>
                        <th>"Responsible"</th>
                        <th>"Start"</th>
                        <th>"End"</th>
                        <th>"Priority"</th>
                        <th>"Comment"</th>
                        <th>"Attachments"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || view.with(|v| v.records().to_vec())
                        key=|issue| issue.clone()
                        children=move |issue| {
                            issue_row(issue, store, busy, edit_field, edit_comment)
                        }
                    />

                    <Show when=move || add_open.get()>
                        <tr
                            class="add-row"
                            node_ref=row_ref
                            on:keydown=move |ev: web_sys::KeyboardEvent| {
                                if ev.key() == "Escape" {
                                    clear_add_row();
                                }
                            }
                        >
                            <td>
                                <input
                                    type="text"
                                    class=move || {
                                        if draft_validation.get().title_missing {
                                            "field invalid"
                                        } else {
                                            "field"
                                        }
                                    }
                                    placeholder="New issue title..."
                                    prop:value=move || draft_title.get()
                                    on:input=move |ev| {
                                        let target = ev.target().unwrap();
                                        let input = target
                                            .dyn_ref::<web_sys::HtmlInputElement>()
                                            .unwrap();
                                        set_draft_title.set(input.value());
                                    }
                                />
                            </td>
                            <td colspan="3" class=move || {
                                if draft_validation.get().task_missing {
                                    "chain-cell invalid"
                                } else {
                                    "chain-cell"
                                }
                            }>
                                <ChainSelect chain=add_chain stage_key="project" label="Project" />
                                <ChainSelect chain=add_chain stage_key="milestone" label="Milestone" />
                                <ChainSelect chain=add_chain stage_key="task" label="Task" />
                            </td>
                            <td></td>
                            <td>
                                <input
                                    type="date"
                                    class=move || {
                                        if draft_validation.get().end_date_missing {
                                            "field invalid"
                                        } else {
                                            "field"
                                        }
                                    }
                                    prop:value=move || draft_end_date.get()
                                    on:input=move |ev| {
                                        let target = ev.target().unwrap();
                                        let input = target
                                            .dyn_ref::<web_sys::HtmlInputElement>()
                                            .unwrap();
                                        set_draft_end_date.set(input.value());
                                    }
                                />
                            </td>
                            <td>
                                <select
                                    prop:value=move || draft_priority.get()
                                    on:change=move |ev| {
                                        let target = ev.target().unwrap();
                                        let select = target
                                            .dyn_ref::<web_sys::HtmlSelectElement>()
                                            .unwrap();
                                        set_draft_priority.set(select.value());
                                    }
                                >
                                    {ISSUE_PRIORITIES.iter().map(|(value, label)| {
                                        view! { <option value=*value>{*label}</option> }
                                    }).collect_view()}
                                </select>
                            </td>
                            <td colspan="2">
                                <AttachmentInput
                                    attachments=draft_attachments
                                    set_dialog_open=set_file_dialog_open
                                />
                                <button
                                    type="button"
                                    disabled=busy
                                    on:click=move |_| commit_add_row()
                                >
                                    "Save"
                                </button>
                                <button
                                    type="button"
                                    class="cancel-btn"
                                    on:click=move |_| clear_add_row()
                                >
                                    "Cancel"
                                </button>
                            </td>
                        </tr>
                    </Show>
                </tbody>
            </table>

            <div class="table-footer">
                <Show when=move || !add_open.get()>
                    <button class="add-row-btn" on:click=move |_| open_add_row()>
                        "+ Add issue"
                    </button>
                </Show>

                <PaginationBar
                    page_index=Signal::derive(move || view.with(|v| v.page_index()))
                    total_pages=Signal::derive(move || {
                        view.with(|v| v.meta().total_pages as usize)
                    })
                    on_navigate=Callback::new(move |page| navigate(page))
                />

                <span class="total-count">
                    {move || format!("{} issues", view.with(|v| v.meta().total_count))}
                </span>
            </div>
        </div>
    }
}

/// One issue row with its editable cells.
fn issue_row(
    issue: Issue,
    store: crate::store::AppStore,
    busy: impl Fn() -> bool + Copy + Send + Sync + 'static,
    edit_field: impl Fn(u64, &'static str, String) + Copy + Send + Sync + 'static,
    edit_comment: impl Fn(u64, String) + Copy + Send + Sync + 'static,
) -> impl IntoView {
    let id = issue.id;
    let responsible_name = issue
        .responsible_id
        .and_then(|uid| store_user_name(&store, uid))
        .unwrap_or_else(|| "Unassigned".to_string());
    let attachment_count = issue.attachments.len();
    let comment_text = issue.comment.clone().unwrap_or_default();
    let status = issue.status.clone();
    let priority = issue.priority.clone();
    let responsible_value = issue
        .responsible_id
        .map(|uid| uid.to_string())
        .unwrap_or_default();
    let start_date = issue.start_date.clone().unwrap_or_default();
    let end_date = issue.end_date.clone().unwrap_or_default();

    view! {
        <tr class="issue-row">
            <td>
                <EditableTextCell
                    value=issue.title.clone()
                    on_commit=Callback::new(move |text| edit_field(id, "title", text))
                />
            </td>
            <td>
                <select
                    disabled=busy
                    prop:value=status.clone()
                    on:change=move |ev| {
                        let target = ev.target().unwrap();
                        let select = target.dyn_ref::<web_sys::HtmlSelectElement>().unwrap();
                        edit_field(id, "status", select.value());
                    }
                >
                    {ISSUE_STATUSES.iter().map(|(value, label)| {
                        view! { <option value=*value>{*label}</option> }
                    }).collect_view()}
                </select>
            </td>
            <td class="issue-type">{issue.issue_type.clone()}</td>
            <td title=responsible_name>
                <select
                    disabled=busy
                    prop:value=responsible_value
                    on:change=move |ev| {
                        let target = ev.target().unwrap();
                        let select = target.dyn_ref::<web_sys::HtmlSelectElement>().unwrap();
                        edit_field(id, "responsiblePersonId", select.value());
                    }
                >
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
            </td>
            <td class="issue-date">{start_date}</td>
            <td>
                <input
                    type="date"
                    disabled=busy
                    prop:value=end_date
                    on:change=move |ev| {
                        let target = ev.target().unwrap();
                        let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                        edit_field(id, "endDate", input.value());
                    }
                />
            </td>
            <td>
                <select
                    disabled=busy
                    prop:value=priority.clone()
                    on:change=move |ev| {
                        let target = ev.target().unwrap();
                        let select = target.dyn_ref::<web_sys::HtmlSelectElement>().unwrap();
                        edit_field(id, "priority", select.value());
                    }
                >
                    {ISSUE_PRIORITIES.iter().map(|(value, label)| {
                        view! { <option value=*value>{*label}</option> }
                    }).collect_view()}
                </select>
            </td>
            <td>
                <EditableTextCell
                    value=comment_text
                    multiline=true
                    on_commit=Callback::new(move |text| edit_comment(id, text))
                />
            </td>
            <td class="attachment-count">
                {if attachment_count > 0 {
                    format!("{} files", attachment_count)
                } else {
                    String::new()
                }}
            </td>
        </tr>
    }
}

/// Click-to-edit text cell committing on blur when the value changed.
#[component]
fn EditableTextCell(
    value: String,
    #[prop(into)] on_commit: Callback<String>,
    #[prop(optional)] multiline: bool,
) -> impl IntoView {
    let original = StoredValue::new(value.clone());
    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(value);

    let finish = move || {
        set_editing.set(false);
        let text = draft.get_untracked();
        if text != original.get_value() {
            on_commit.run(text);
        }
    };

    let cancel = move || {
        set_draft.set(original.get_value());
        set_editing.set(false);
    };

    view! {
        <Show
            when=move || editing.get()
            fallback=move || {
                view! {
                    <span class="cell-text" on:click=move |_| set_editing.set(true)>
                        {move || {
                            let text = draft.get();
                            if text.is_empty() { "...".to_string() } else { text }
                        }}
                    </span>
                }
            }
        >
            {if multiline {
                view! {
                    <textarea
                        class="cell-editor"
                        autofocus=true
                        prop:value=move || draft.get()
                        on:input=move |ev| {
                            let target = ev.target().unwrap();
                            let textarea = target
                                .dyn_ref::<web_sys::HtmlTextAreaElement>()
                                .unwrap();
                            set_draft.set(textarea.value());
                        }
                        on:blur=move |_| finish()
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            if ev.key() == "Escape" {
                                cancel();
                            }
                        }
                    ></textarea>
                }
                    .into_any()
            } else {
                view! {
                    <input
                        type="text"
                        class="cell-editor"
                        autofocus=true
                        prop:value=move || draft.get()
                        on:input=move |ev| {
                            let target = ev.target().unwrap();
                            let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                            set_draft.set(input.value());
                        }
                        on:blur=move |_| finish()
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            match ev.key().as_str() {
                                "Enter" => finish(),
                                "Escape" => cancel(),
                                _ => {}
                            }
                        }
                    />
                }
                    .into_any()
            }}
        </Show>
    }
}
