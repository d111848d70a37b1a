//! Sidebar with smart folders

use leptos::prelude::*;
use leptos::task::spawn_local;
use pixelshelf_core::filters::has_active_conditions;
use pixelshelf_core::models::SmartFolder;
use uuid::Uuid;

use crate::api;
use crate::app::GalleryState;

#[component]
pub fn Sidebar(state: GalleryState) -> impl IntoView {
    let (show_create_dialog, set_show_create_dialog) = signal(false);
    let (new_folder_name, set_new_folder_name) = signal(String::new());
    let (new_folder_icon, set_new_folder_icon) = signal(String::new());
    let (name_error, set_name_error) = signal::<Option<String>>(None);

    // Load smart folders on mount
    spawn_local(async move {
        let config = state.config.get_value();
        let result = api::list_smart_folders(&config).await;
        if let Ok(folders) = &result {
            tracing::debug!(count = folders.len(), "loaded smart folders");
        }
        state.controller.update(|c| c.on_smart_folders_loaded(result));
    });

    let folders = move || state.controller.with(|c| c.smart_folders().to_vec());
    let selected_folder = Memo::new(move |_| state.controller.with(|c| c.matched_smart_folder().map(|f| f.id)));
    let showing_all = move || state.controller.with(|c| !has_active_conditions(c.filters()));

    let do_create_folder = move || {
        let name = new_folder_name.get_untracked();
        let icon = Some(new_folder_icon.get_untracked());
        let body = match state.controller.with_untracked(|c| c.prepare_smart_folder(&name, icon)) {
            Ok(body) => body,
            Err(e) => {
                set_name_error.set(Some(e.to_string()));
                return;
            }
        };
        set_name_error.set(None);
        spawn_local(async move {
            let config = state.config.get_value();
            let result = api::create_smart_folder(&config, &body).await;
            if result.is_ok() {
                set_new_folder_name.set(String::new());
                set_new_folder_icon.set(String::new());
                set_show_create_dialog.set(false);
            }
            state.controller.update(|c| c.on_smart_folder_created(result));
        });
    };

    let on_create_keypress = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" {
            do_create_folder();
        }
    };

    let on_show_all = move |_: web_sys::MouseEvent| state.reset();

    let on_folder_click = move |id: Uuid| match state.controller.try_update(|c| c.apply_smart_folder(id)) {
        Some(Ok(ticket)) => {
            state.selection.update(|s| s.clear());
            state.run(ticket);
        }
        Some(Err(e)) => state.notify_error(e.to_string()),
        None => {}
    };

    view! {
        <aside class="sidebar">
            <nav class="folder-list">
                <button class="folder-item" class:selected=showing_all on:click=on_show_all>
                    <span class="folder-name">"All Images"</span>
                </button>
            </nav>

            <div class="sidebar-header folders-header">
                <h2>"Smart Folders"</h2>
                <button
                    class="add-folder-btn"
                    title="Create a smart folder from the current filters"
                    on:click=move |_| set_show_create_dialog.set(true)
                >
                    "+"
                </button>
            </div>
            <nav class="folder-list">
                <For
                    each=folders
                    key=|f| (f.id, f.name.clone(), f.icon.clone())
                    let:folder
                >
                    <FolderItem
                        state=state
                        folder=folder
                        selected_folder=selected_folder
                        on_click=on_folder_click
                    />
                </For>
                {move || folders().is_empty().then(|| view! {
                    <div class="empty-folders">"No smart folders yet"</div>
                })}
            </nav>

            <Show when=move || show_create_dialog.get()>
                <div class="dialog-overlay" on:click=move |_| set_show_create_dialog.set(false)>
                    <div class="dialog" on:click=|ev| ev.stop_propagation()>
                        <h3>"Create Smart Folder"</h3>
                        <input
                            type="text"
                            class="dialog-input"
                            placeholder="Folder name"
                            maxlength="100"
                            prop:value=move || new_folder_name.get()
                            on:input=move |ev| {
                                set_new_folder_name.set(event_target_value(&ev));
                                set_name_error.set(None);
                            }
                            on:keypress=on_create_keypress
                        />
                        <input
                            type="text"
                            class="dialog-input"
                            placeholder="Icon (optional)"
                            prop:value=move || new_folder_icon.get()
                            on:input=move |ev| set_new_folder_icon.set(event_target_value(&ev))
                        />
                        {move || name_error.get().map(|e| view! { <p class="dialog-error">{e}</p> })}
                        <div class="dialog-actions">
                            <button class="dialog-cancel" on:click=move |_| set_show_create_dialog.set(false)>
                                "Cancel"
                            </button>
                            <button class="dialog-confirm" on:click=move |_| do_create_folder()>
                                "Create"
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </aside>
    }
}

#[component]
fn FolderItem(
    state: GalleryState,
    folder: SmartFolder,
    selected_folder: Memo<Option<Uuid>>,
    on_click: impl Fn(Uuid) + Copy + 'static,
) -> impl IntoView {
    let id = folder.id;
    let name = folder.name.clone();
    let icon = folder.icon.clone();

    let on_delete = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        spawn_local(async move {
            let config = state.config.get_value();
            let result = api::delete_smart_folder(&config, id).await;
            state.controller.update(|c| c.on_smart_folder_deleted(id, result));
        });
    };

    // Point the folder at whatever is filtered right now
    let on_update = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let update = match state.controller.with_untracked(|c| c.prepare_smart_folder_overwrite(id)) {
            Ok(update) => update,
            Err(e) => {
                state.notify_error(e.to_string());
                return;
            }
        };
        spawn_local(async move {
            let config = state.config.get_value();
            let result = api::update_smart_folder(&config, id, &update).await;
            state.controller.update(|c| c.on_smart_folder_updated(result));
        });
    };

    let can_update = move || {
        selected_folder.get() != Some(id) && state.controller.with(|c| has_active_conditions(c.filters()))
    };

    view! {
        <div
            class="folder-item"
            class:selected=move || selected_folder.get() == Some(id)
            on:click=move |_| on_click(id)
        >
            {icon.map(|i| view! { <span class="folder-icon">{i}</span> })}
            <span class="folder-name">{name}</span>
            <Show when=can_update>
                <button class="update-folder-btn" title="Use current filters" on:click=on_update>
                    "↻"
                </button>
            </Show>
            <button class="delete-folder-btn" title="Delete smart folder" on:click=on_delete>
                "x"
            </button>
        </div>
    }
}
