//! Chain Select Component
//!
//! One stage of a dependent selection chain as a remote-backed select,
//! plus the helpers that execute the fetches the chain schedules.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use viewflow::{DependentChain, FetchSpec};

use crate::api;
use crate::models::Project;

/// Execute the fetch a chain operation scheduled. The result is applied
/// back with the scoping id it was issued for, so a response that was
/// superseded by a newer upstream selection is discarded on arrival.
pub fn run_stage_fetch(chain: RwSignal<DependentChain>, spec: FetchSpec) {
    let Some(key) = chain.with_untracked(|c| c.key_of(spec.stage_index)) else {
        return;
    };
    spawn_local(async move {
        let result = api::fetch_stage_options(key, spec.scope_id).await;
        chain.update(|c| c.apply_options(spec.stage_index, spec.scope_id, result));
    });
}

/// Apply a user selection to a stage and run the follow-up fetch, if any.
pub fn select_stage(chain: RwSignal<DependentChain>, key: &'static str, id: Option<u64>) {
    let spec = chain.try_update(|c| c.set_selection(key, id)).flatten();
    if let Some(spec) = spec {
        run_stage_fetch(chain, spec);
    }
}

/// Load the unscoped option list for the first (project) stage.
pub fn load_root_options(chain: RwSignal<DependentChain>) {
    chain.update(|c| c.root_fetch_started());
    spawn_local(async move {
        let result = api::list_projects()
            .await
            .map(|projects| projects.iter().map(Project::to_option).collect());
        chain.update(|c| c.apply_root_options(result));
    });
}

/// A single stage of the chain rendered as a labeled select. Disabled
/// until its upstream stage has produced options; a locked (pre-seeded)
/// stage is never editable.
#[component]
pub fn ChainSelect(
    chain: RwSignal<DependentChain>,
    stage_key: &'static str,
    label: &'static str,
) -> impl IntoView {
    let stage = move || chain.with(|c| c.stage(stage_key).cloned());

    let on_change = move |ev: web_sys::Event| {
        let target = ev.target().unwrap();
        let select = target.dyn_ref::<web_sys::HtmlSelectElement>().unwrap();
        select_stage(chain, stage_key, select.value().parse::<u64>().ok());
    };

    view! {
        <label class="chain-select">
            <span class="chain-select-label">{label}</span>
            <select
                on:change=on_change
                prop:value=move || {
                    stage()
                        .and_then(|s| s.selected)
                        .map(|id| id.to_string())
                        .unwrap_or_default()
                }
                disabled=move || {
                    stage()
                        .map(|s| s.locked || (s.options.is_empty() && !s.loading))
                        .unwrap_or(true)
                }
            >
                <option value="">"Select..."</option>
                {move || {
                    stage().map(|s| {
                        s.options
                            .into_iter()
                            .map(|opt| {
                                view! {
                                    <option value=opt.id.to_string()>{opt.label}</option>
                                }
                            })
                            .collect_view()
                    })
                }}
            </select>
            {move || {
                stage().filter(|s| s.loading).map(|_| {
                    view! { <span class="chain-loading">"Loading..."</span> }
                })
            }}
            {move || {
                stage().and_then(|s| s.error).map(|err| {
                    view! { <span class="chain-error">{err}</span> }
                })
            }}
        </label>
    }
}
