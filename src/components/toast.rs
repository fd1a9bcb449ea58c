//! Toast List Component
//!
//! Transient user-facing messages with auto-dismiss.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::AppContext;

/// How long a message stays visible
const TOAST_MILLIS: u32 = 4000;

/// Stack of transient messages, newest last
#[component]
pub fn ToastList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    view! {
        <div class="toast-list">
            <For
                each=move || ctx.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(TOAST_MILLIS).await;
                        ctx.dismiss(id);
                    });
                    view! {
                        <div class="toast" on:click=move |_| ctx.dismiss(id)>
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
