//! Attachment Input Component
//!
//! File picker reading selected files into base64 drafts for the create
//! payload. Reports when the native file dialog is open so the add-row's
//! outside-click commit can ignore interactions during a pick.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::models::AttachmentDraft;

/// File picker plus chips for the files already read
#[component]
pub fn AttachmentInput(
    attachments: RwSignal<Vec<AttachmentDraft>>,
    set_dialog_open: WriteSignal<bool>,
) -> impl IntoView {
    let on_change = move |ev: web_sys::Event| {
        set_dialog_open.set(false);
        let target = ev.target().unwrap();
        let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
        let Some(files) = input.files() else { return };
        for i in 0..files.length() {
            let Some(file) = files.get(i) else { continue };
            read_file(file, attachments);
        }
        input.set_value("");
    };

    // Regaining window focus means the dialog closed, picked or not
    bind_focus_clears_dialog(set_dialog_open);

    view! {
        <div class="attachment-picker">
            <input
                type="file"
                multiple=true
                on:click=move |_| set_dialog_open.set(true)
                on:change=on_change
            />
            <div class="attachment-chips">
                <For
                    each=move || attachments.get()
                    key=|a| a.name.clone()
                    children=move |draft| {
                        let name = draft.name.clone();
                        let chip_name = draft.name.clone();
                        view! {
                            <span class="attachment-chip">
                                {chip_name}
                                <button
                                    type="button"
                                    on:click=move |_| {
                                        attachments.update(|list| list.retain(|a| a.name != name));
                                    }
                                >
                                    "x"
                                </button>
                            </span>
                        }
                    }
                />
            </div>
        </div>
    }
}

/// Read one file as a data URL and push its base64 payload as a draft.
fn read_file(file: web_sys::File, attachments: RwSignal<Vec<AttachmentDraft>>) {
    let Ok(reader) = web_sys::FileReader::new() else {
        return;
    };
    let name = file.name();
    let mime = file.type_();
    let reader_ref = reader.clone();
    let onloadend = Closure::<dyn FnMut(web_sys::ProgressEvent)>::new(move |_| {
        let Some(url) = reader_ref.result().ok().and_then(|v| v.as_string()) else {
            web_sys::console::error_1(&format!("[AttachmentInput] failed to read {}", name).into());
            return;
        };
        // data:<mime>;base64,<payload>
        if let Some((_, data)) = url.split_once(',') {
            let draft = AttachmentDraft {
                name: name.clone(),
                mime: mime.clone(),
                data_base64: data.to_string(),
            };
            attachments.update(|list| list.push(draft));
        }
    });
    reader.set_onloadend(Some(onloadend.as_ref().unchecked_ref()));
    let _ = reader.read_as_data_url(&file);
    onloadend.forget();
}

fn bind_focus_clears_dialog(set_dialog_open: WriteSignal<bool>) {
    let Some(window) = web_sys::window() else { return };
    let on_focus = Closure::<dyn FnMut()>::new(move || {
        set_dialog_open.set(false);
    });
    let _ = window.add_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref());
    on_focus.forget();
}
