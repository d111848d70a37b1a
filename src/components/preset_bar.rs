//! Saved search presets above the grid

use leptos::prelude::*;
use leptos::task::spawn_local;
use uuid::Uuid;

use crate::api;
use crate::app::GalleryState;

#[component]
pub fn PresetBar(state: GalleryState) -> impl IntoView {
    let (show_save_dialog, set_show_save_dialog) = signal(false);
    let (new_preset_name, set_new_preset_name) = signal(String::new());
    let (name_error, set_name_error) = signal::<Option<String>>(None);
    // Preset the user applied last; offered for overwrite once the filters drift
    let (last_applied, set_last_applied) = signal::<Option<Uuid>>(None);

    spawn_local(async move {
        let config = state.config.get_value();
        let result = api::list_presets(&config).await;
        state.controller.update(|c| c.on_presets_loaded(result));
    });

    let presets = move || state.controller.with(|c| c.presets().to_vec());
    let matched = move || state.controller.with(|c| c.matched_preset().map(|p| p.id));
    let offer_save = move || state.controller.with(|c| c.should_offer_save());
    let overwrite_target = move || {
        let id = last_applied.get()?;
        state.controller.with(|c| {
            let preset = c.presets().iter().find(|p| p.id == id)?;
            c.should_offer_save().then(|| (preset.id, preset.name.clone()))
        })
    };

    let on_apply = move |ev: web_sys::Event| {
        let Ok(id) = Uuid::parse_str(&event_target_value(&ev)) else {
            return;
        };
        match state.controller.try_update(|c| c.apply_preset(id)) {
            Some(Ok(ticket)) => {
                set_last_applied.set(Some(id));
                state.selection.update(|s| s.clear());
                state.run(ticket);
            }
            Some(Err(e)) => state.notify_error(e.to_string()),
            None => {}
        }
    };

    let do_save = move || {
        let body = state.controller.with_untracked(|c| c.prepare_preset(&new_preset_name.get_untracked()));
        let body = match body {
            Ok(body) => body,
            Err(e) => {
                set_name_error.set(Some(e.to_string()));
                return;
            }
        };
        set_name_error.set(None);
        spawn_local(async move {
            let config = state.config.get_value();
            let result = api::create_preset(&config, &body).await;
            if let Ok(preset) = &result {
                set_last_applied.set(Some(preset.id));
                set_new_preset_name.set(String::new());
                set_show_save_dialog.set(false);
            }
            state.controller.update(|c| c.on_preset_created(result));
        });
    };

    let on_overwrite = move |_: web_sys::MouseEvent| {
        let Some((id, _)) = overwrite_target() else {
            return;
        };
        let update = match state.controller.with_untracked(|c| c.prepare_preset_overwrite(id)) {
            Ok(update) => update,
            Err(e) => {
                state.notify_error(e.to_string());
                return;
            }
        };
        spawn_local(async move {
            let config = state.config.get_value();
            let result = api::update_preset(&config, id, &update).await;
            state.controller.update(|c| c.on_preset_updated(result));
        });
    };

    let on_delete = move |_: web_sys::MouseEvent| {
        let Some(id) = matched() else {
            return;
        };
        spawn_local(async move {
            let config = state.config.get_value();
            let result = api::delete_preset(&config, id).await;
            state.controller.update(|c| c.on_preset_deleted(id, result));
        });
    };

    let on_save_keypress = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" {
            do_save();
        }
    };

    view! {
        <div class="preset-bar">
            <select
                class="preset-select"
                prop:value=move || matched().map(|id| id.to_string()).unwrap_or_default()
                on:change=on_apply
            >
                <option value="">{move || if presets().is_empty() { "No presets" } else { "Presets..." }}</option>
                <For
                    each=presets
                    key=|p| (p.id, p.name.clone())
                    let:preset
                >
                    <option value=preset.id.to_string()>{preset.name.clone()}</option>
                </For>
            </select>

            <Show when=move || matched().is_some()>
                <span class="preset-match">
                    {move || state.controller.with(|c| c.matched_preset().map(|p| p.name.clone()))}
                </span>
                <button class="preset-delete" title="Delete preset" on:click=on_delete>"Delete"</button>
            </Show>

            {move || overwrite_target().map(|(_, name)| view! {
                <button class="preset-overwrite" on:click=on_overwrite>
                    {format!("Update \"{}\"", name)}
                </button>
            })}

            <Show when=offer_save>
                <button class="preset-save" on:click=move |_| set_show_save_dialog.set(true)>
                    "Save as preset"
                </button>
            </Show>

            <Show when=move || show_save_dialog.get()>
                <div class="dialog-overlay" on:click=move |_| set_show_save_dialog.set(false)>
                    <div class="dialog" on:click=|ev| ev.stop_propagation()>
                        <h3>"Save Preset"</h3>
                        <input
                            type="text"
                            class="dialog-input"
                            placeholder="Preset name"
                            maxlength="100"
                            prop:value=move || new_preset_name.get()
                            on:input=move |ev| {
                                set_new_preset_name.set(event_target_value(&ev));
                                set_name_error.set(None);
                            }
                            on:keypress=on_save_keypress
                        />
                        {move || name_error.get().map(|e| view! { <p class="dialog-error">{e}</p> })}
                        <div class="dialog-actions">
                            <button class="dialog-cancel" on:click=move |_| set_show_save_dialog.set(false)>
                                "Cancel"
                            </button>
                            <button class="dialog-confirm" on:click=move |_| do_save()>
                                "Save"
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}
