//! Auto-dismissing notifications

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use pixelshelf_core::notices::Notice;

use crate::app::GalleryState;

const TOAST_DURATION_MS: u32 = 4000;

#[component]
pub fn Toasts(state: GalleryState) -> impl IntoView {
    let notices = move || state.controller.with(|c| c.notices().iter().cloned().collect::<Vec<_>>());

    view! {
        <div class="toast-stack">
            <For each=notices key=|n| n.id let:notice>
                <Toast state=state notice=notice />
            </For>
        </div>
    }
}

#[component]
fn Toast(state: GalleryState, notice: Notice) -> impl IntoView {
    let id = notice.id;
    let dismiss = move || state.controller.update(|c| c.notices_mut().dismiss(id));

    Timeout::new(TOAST_DURATION_MS, dismiss).forget();

    view! {
        <div class=format!("toast {}", notice.level.css_class()) role="status">
            <span class="toast-text">{notice.text}</span>
            <button class="toast-close" title="Dismiss" on:click=move |_| dismiss()>
                "×"
            </button>
        </div>
    }
}
