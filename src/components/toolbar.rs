use leptos::prelude::*;
use pixelshelf_core::columns::Density;
use pixelshelf_core::params::PER_PAGE_OPTIONS;

use crate::app::GalleryState;

#[component]
pub fn Toolbar(state: GalleryState) -> impl IntoView {
    let density = move || state.settings.get().density;
    let selection_mode = move || state.selection.get().is_selection_mode();
    let selected_count = move || state.selection.get().len();

    let select_page = move |_: web_sys::MouseEvent| {
        let ids: Vec<_> = state
            .images
            .with(|page| page.as_ref().map(|p| p.items.iter().map(|i| i.id).collect()).unwrap_or_default());
        state.selection.update(|s| s.select_all(ids));
    };

    let (tag_input, set_tag_input) = signal(String::new());
    let on_tag_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() != "Enter" {
            return;
        }
        ev.prevent_default();
        match state.selection.with_untracked(|s| s.add_tag(&tag_input.get_untracked())) {
            Ok(Some(update)) => {
                state.bulk_update(Ok(update));
                set_tag_input.set(String::new());
            }
            Ok(None) => {}
            Err(e) => state.bulk_update(Err(e)),
        }
    };

    let on_trash = move |_: web_sys::MouseEvent| {
        let count = state.selection.with_untracked(|s| s.len());
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&format!("Move {} images to trash?", count)).ok())
            .unwrap_or(false);
        if confirmed {
            state.bulk_delete(state.selection.with_untracked(|s| s.trash()));
        }
    };

    view! {
        <header class="toolbar">
            <div class="toolbar-left">
                <h1 class="app-title">"Pixelshelf"</h1>
                <span class="image-count">
                    {move || state.images.get().map(|p| format!("{} images", p.total)).unwrap_or_default()}
                </span>
            </div>
            <div class="toolbar-right">
                <select
                    class="density-dropdown"
                    title="Grid size"
                    prop:value=move || density().id()
                    on:change=move |ev| {
                        if let Some(d) = Density::from_id(&event_target_value(&ev)) {
                            state.settings.update(|s| s.density = d);
                        }
                    }
                >
                    <For
                        each=move || Density::all().iter().copied()
                        key=|d| d.id()
                        children=move |d| view! { <option value=d.id()>{d.label()}</option> }
                    />
                </select>
                <select
                    class="per-page-dropdown"
                    title="Images per page"
                    prop:value=move || state.controller.with(|c| c.committed().per_page.to_string())
                    on:change=move |ev| {
                        if let Ok(n) = event_target_value(&ev).parse::<u32>() {
                            state.set_per_page(n);
                        }
                    }
                >
                    {PER_PAGE_OPTIONS
                        .iter()
                        .map(|n| view! { <option value=n.to_string()>{format!("{} / page", n)}</option> })
                        .collect::<Vec<_>>()}
                </select>
                <button
                    class="select-btn"
                    class:active=selection_mode
                    on:click=move |_| state.selection.update(|s| s.set_selection_mode(!s.is_selection_mode()))
                >
                    {move || if selection_mode() { "Done" } else { "Select" }}
                </button>
                <Show when=selection_mode>
                    <span class="selection-count">{move || format!("{} selected", selected_count())}</span>
                    <button class="select-all-btn" on:click=select_page>"Select page"</button>
                    <button class="clear-selection-btn" on:click=move |_| state.selection.update(|s| s.clear())>
                        "Clear"
                    </button>
                    <Show when=move || { selected_count() > 0 }>
                        <div class="batch-actions">
                            {(1..=5u8)
                                .map(|n| {
                                    view! {
                                        <button
                                            class="batch-rate-btn"
                                            title=format!("Set rating to {}", n)
                                            on:click=move |_| state.bulk_update(state.selection.with_untracked(|s| s.rate(n)))
                                        >
                                            {"★".repeat(n as usize)}
                                        </button>
                                    }
                                })
                                .collect::<Vec<_>>()}
                            <button
                                class="batch-favorite-btn"
                                title="Add to favorites"
                                on:click=move |_| state.bulk_update(state.selection.with_untracked(|s| s.favorite(true)))
                            >
                                "♥"
                            </button>
                            <input
                                type="text"
                                class="batch-tag-input"
                                placeholder="Add tag..."
                                prop:value=move || tag_input.get()
                                on:input=move |ev| set_tag_input.set(event_target_value(&ev))
                                on:keydown=on_tag_keydown
                            />
                            <button class="batch-trash-btn" title="Move to trash" on:click=on_trash>
                                "Trash"
                            </button>
                        </div>
                    </Show>
                </Show>
            </div>
        </header>
    }
}
