//! Pagination Bar Component
//!
//! Prev/next controls plus the sliding window of page buttons.

use leptos::prelude::*;
use viewflow::pagination::{has_next, has_prev, page_window};

/// Page controls under the issues table. `page_index` is 0-based; the
/// button labels are 1-based.
#[component]
pub fn PaginationBar(
    #[prop(into)] page_index: Signal<usize>,
    #[prop(into)] total_pages: Signal<usize>,
    #[prop(into)] on_navigate: Callback<usize>,
) -> impl IntoView {
    view! {
        <div class="pagination-bar">
            <button
                class="page-btn"
                disabled=move || !has_prev(page_index.get())
                on:click=move |_| {
                    let p = page_index.get();
                    if has_prev(p) {
                        on_navigate.run(p - 1);
                    }
                }
            >
                "Prev"
            </button>

            {move || {
                let current = page_index.get();
                page_window(current, total_pages.get())
                    .into_iter()
                    .map(|p| {
                        view! {
                            <button
                                class=move || if p == current { "page-btn active" } else { "page-btn" }
                                on:click=move |_| on_navigate.run(p)
                            >
                                {p + 1}
                            </button>
                        }
                    })
                    .collect_view()
            }}

            <button
                class="page-btn"
                disabled=move || !has_next(page_index.get(), total_pages.get())
                on:click=move |_| {
                    let p = page_index.get();
                    if has_next(p, total_pages.get()) {
                        on_navigate.run(p + 1);
                    }
                }
            >
                "Next"
            </button>
        </div>
    }
}
