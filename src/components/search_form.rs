//! Filter form
//!
//! Edits a draft copy of the committed filters. Nothing reaches the URL or
//! the API until the form is submitted.

use chrono::NaiveDate;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pixelshelf_core::filters::{
    has_active_conditions, FilterSet, Orientation, RatingControl, RatingMode, RatingState, SortField, SortOrder,
    MODEL_TYPES, SOURCE_TOOLS,
};

use crate::api;
use crate::app::GalleryState;

/// Delay before asking the server for tag suggestions
const SUGGEST_DEBOUNCE_MS: u32 = 200;

fn text_value(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn flag_id(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "true",
        Some(false) => "false",
        None => "",
    }
}

fn flag_from_id(id: &str) -> Option<bool> {
    match id {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn number_value(raw: String) -> Option<u32> {
    raw.trim().parse().ok().filter(|n| *n > 0)
}

#[component]
pub fn SearchForm(state: GalleryState) -> impl IntoView {
    let draft = RwSignal::new(state.controller.with_untracked(|c| c.filters().clone()));
    let rating = RwSignal::new(RatingControl::from_filters(&draft.get_untracked()));
    let (expanded, set_expanded) = signal(false);

    // Presets, folders and the sidebar change the committed filters from
    // outside the form; pull those back into the draft. Notices and saved
    // search syncs also touch the controller, so only a change in the
    // filters themselves may reach the draft.
    let committed = Memo::new(move |_| state.controller.with(|c| c.filters().clone()));
    Effect::new(move |_| {
        let committed = committed.get();
        rating.set(RatingControl::from_filters(&committed));
        draft.set(committed);
    });

    let is_active = move || state.controller.with(|c| has_active_conditions(c.filters()));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        state.commit(draft.get_untracked());
    };

    let on_reset = move |_: web_sys::MouseEvent| state.reset();

    let set_text = move |apply: fn(&mut FilterSet, Option<String>)| {
        move |ev: web_sys::Event| draft.update(|f| apply(f, text_value(event_target_value(&ev))))
    };

    view! {
        <form class="search-form" on:submit=on_submit>
            <div class="search-row">
                <input
                    type="text"
                    class="search-input"
                    placeholder="Search prompts..."
                    prop:value=move || draft.with(|f| f.q.clone().unwrap_or_default())
                    on:input=set_text(|f, v| f.q = v)
                />
                <button
                    type="button"
                    class="filters-toggle"
                    class:active=is_active
                    on:click=move |_| set_expanded.update(|e| *e = !*e)
                >
                    "Filters"
                    <Show when=is_active>
                        <span class="active-dot"></span>
                    </Show>
                </button>
                <button type="submit" class="search-btn">"Search"</button>
                <Show when=is_active>
                    <button type="button" class="reset-btn" title="Clear all filters" on:click=on_reset>
                        "×"
                    </button>
                </Show>
            </div>

            <Show when=move || expanded.get()>
                <div class="filter-grid">
                    <label class="filter-field">
                        <span>"Source Tool"</span>
                        <select
                            prop:value=move || draft.with(|f| f.source_tool.clone().unwrap_or_default())
                            on:change=set_text(|f, v| f.source_tool = v)
                        >
                            <option value="">"All"</option>
                            {SOURCE_TOOLS.iter().map(|t| view! { <option value=*t>{*t}</option> }).collect::<Vec<_>>()}
                        </select>
                    </label>

                    <label class="filter-field">
                        <span>"Model Type"</span>
                        <select
                            prop:value=move || draft.with(|f| f.model_type.clone().unwrap_or_default())
                            on:change=set_text(|f, v| f.model_type = v)
                        >
                            <option value="">"All"</option>
                            {MODEL_TYPES.iter().map(|t| view! { <option value=*t>{*t}</option> }).collect::<Vec<_>>()}
                        </select>
                    </label>

                    <label class="filter-field">
                        <span>"Model Name"</span>
                        <input
                            type="text"
                            placeholder="Filter by model..."
                            prop:value=move || draft.with(|f| f.model_name.clone().unwrap_or_default())
                            on:input=set_text(|f, v| f.model_name = v)
                        />
                    </label>

                    <label class="filter-field">
                        <span>"Sampler"</span>
                        <input
                            type="text"
                            placeholder="e.g. euler_a"
                            prop:value=move || draft.with(|f| f.sampler_name.clone().unwrap_or_default())
                            on:input=set_text(|f, v| f.sampler_name = v)
                        />
                    </label>

                    <label class="filter-field">
                        <span>"LoRA"</span>
                        <input
                            type="text"
                            placeholder="LoRA name"
                            prop:value=move || draft.with(|f| f.lora_name.clone().unwrap_or_default())
                            on:input=set_text(|f, v| f.lora_name = v)
                        />
                    </label>

                    <RatingField draft=draft rating=rating />

                    <FlagField
                        label="Favorites"
                        draft=draft
                        read={|f| f.is_favorite}
                        write={|f, v| f.is_favorite = v}
                        yes="Favorites only"
                        no="Not favorited"
                    />
                    <FlagField
                        label="Needs Improvement"
                        draft=draft
                        read={|f| f.needs_improvement}
                        write={|f, v| f.needs_improvement = v}
                        yes="Flagged"
                        no="Not flagged"
                    />
                    <FlagField
                        label="Grid Filter"
                        draft=draft
                        read={|f| f.is_xyz_grid}
                        write={|f, v| f.is_xyz_grid = v}
                        yes="Grid Only"
                        no="Non-Grid Only"
                    />
                    <FlagField
                        label="Upscaled"
                        draft=draft
                        read={|f| f.is_upscaled}
                        write={|f, v| f.is_upscaled = v}
                        yes="Upscaled only"
                        no="Not upscaled"
                    />

                    <label class="filter-field">
                        <span>"Orientation"</span>
                        <select
                            prop:value=move || draft.with(|f| f.orientation.map(|o| o.as_str()).unwrap_or_default())
                            on:change=move |ev| draft.update(|f| f.orientation = event_target_value(&ev).parse().ok())
                        >
                            <option value="">"Any"</option>
                            {Orientation::all()
                                .iter()
                                .map(|o| view! { <option value=o.as_str()>{o.label()}</option> })
                                .collect::<Vec<_>>()}
                        </select>
                    </label>

                    <label class="filter-field">
                        <span>"Min Width"</span>
                        <input
                            type="number"
                            min="0"
                            prop:value=move || draft.with(|f| f.min_width.map(|w| w.to_string()).unwrap_or_default())
                            on:input=move |ev| draft.update(|f| f.min_width = number_value(event_target_value(&ev)))
                        />
                    </label>

                    <label class="filter-field">
                        <span>"Min Height"</span>
                        <input
                            type="number"
                            min="0"
                            prop:value=move || draft.with(|f| f.min_height.map(|h| h.to_string()).unwrap_or_default())
                            on:input=move |ev| draft.update(|f| f.min_height = number_value(event_target_value(&ev)))
                        />
                    </label>

                    <label class="filter-field">
                        <span>"Created After"</span>
                        <input
                            type="date"
                            prop:value=move || draft.with(|f| f.date_from.map(|d| d.to_string()).unwrap_or_default())
                            on:change=move |ev| {
                                draft.update(|f| f.date_from = event_target_value(&ev).parse::<NaiveDate>().ok())
                            }
                        />
                    </label>

                    <label class="filter-field">
                        <span>"Sort By"</span>
                        <select
                            prop:value=move || draft.with(|f| f.sort_by.unwrap_or_default().as_str())
                            on:change=move |ev| draft.update(|f| f.sort_by = event_target_value(&ev).parse().ok())
                        >
                            {SortField::all()
                                .iter()
                                .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                                .collect::<Vec<_>>()}
                        </select>
                    </label>

                    <label class="filter-field">
                        <span>"Order"</span>
                        <select
                            prop:value=move || draft.with(|f| f.sort_order.unwrap_or_default().as_str())
                            on:change=move |ev| draft.update(|f| f.sort_order = event_target_value(&ev).parse().ok())
                        >
                            <option value=SortOrder::Desc.as_str()>"Descending"</option>
                            <option value=SortOrder::Asc.as_str()>"Ascending"</option>
                        </select>
                    </label>

                    <TagField state=state draft=draft />
                </div>
            </Show>
        </form>
    }
}

/// Star value plus "at least" / "exactly" selector
#[component]
fn RatingField(draft: RwSignal<FilterSet>, rating: RwSignal<RatingControl>) -> impl IntoView {
    let value = move || {
        draft
            .with(|f| RatingState::of(f).value())
            .map(|v| v.to_string())
            .unwrap_or_default()
    };

    let on_mode = move |ev: web_sys::Event| {
        let Some(mode) = RatingMode::from_id(&event_target_value(&ev)) else {
            return;
        };
        let mut control = rating.get_untracked();
        draft.update(|f| control.select_mode(mode, f));
        rating.set(control);
    };

    let on_value = move |ev: web_sys::Event| {
        let stars = event_target_value(&ev).parse::<u8>().ok().filter(|v| *v > 0);
        let mut control = rating.get_untracked();
        draft.update(|f| control.set_value(stars, f));
        rating.set(control);
    };

    view! {
        <div class="filter-field rating-field">
            <span>"Rating"</span>
            <div class="rating-inputs">
                <select prop:value=move || rating.get().mode().id() on:change=on_mode>
                    <option value=RatingMode::Min.id()>"At least"</option>
                    <option value=RatingMode::Exact.id()>"Exactly"</option>
                </select>
                <select prop:value=value on:change=on_value>
                    <option value="">"Any"</option>
                    {(1..=5u8)
                        .map(|n| view! { <option value=n.to_string()>{"★".repeat(n as usize)}</option> })
                        .collect::<Vec<_>>()}
                </select>
            </div>
        </div>
    }
}

/// Tri-state select for a boolean filter
#[component]
fn FlagField(
    label: &'static str,
    draft: RwSignal<FilterSet>,
    read: fn(&FilterSet) -> Option<bool>,
    write: fn(&mut FilterSet, Option<bool>),
    yes: &'static str,
    no: &'static str,
) -> impl IntoView {
    view! {
        <label class="filter-field">
            <span>{label}</span>
            <select
                prop:value=move || flag_id(draft.with(read))
                on:change=move |ev| draft.update(|f| write(f, flag_from_id(&event_target_value(&ev))))
            >
                <option value="">"All"</option>
                <option value="true">{yes}</option>
                <option value="false">{no}</option>
            </select>
        </label>
    }
}

/// Tag chips with server-side suggestions
#[component]
fn TagField(state: GalleryState, draft: RwSignal<FilterSet>) -> impl IntoView {
    let (input, set_input) = signal(String::new());
    let suggestions = RwSignal::new(Vec::<String>::new());
    // Bumped on every keystroke; only the latest lookup may fill the list.
    let lookup_seq = StoredValue::new(0u64);

    let lookup = move |text: String| {
        lookup_seq.update_value(|n| *n += 1);
        let seq = lookup_seq.get_value();
        spawn_local(async move {
            TimeoutFuture::new(SUGGEST_DEBOUNCE_MS).await;
            if lookup_seq.get_value() != seq {
                return;
            }
            let config = state.config.get_value();
            match api::suggest_tags(&config, &text, None).await {
                Ok(tags) if lookup_seq.get_value() == seq => suggestions.set(tags),
                Ok(_) => {}
                Err(e) => tracing::warn!("tag suggestions failed: {}", e),
            }
        });
    };

    let add_tag = move |tag: String| {
        draft.update(|f| f.add_tag(&tag));
        set_input.set(String::new());
        suggestions.set(Vec::new());
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" {
            ev.prevent_default();
            let tag = input.get_untracked();
            if !tag.trim().is_empty() {
                add_tag(tag.trim().to_string());
            }
        }
    };

    view! {
        <div class="filter-field tag-field">
            <span>"Tags"</span>
            <div class="tag-chips">
                <For
                    each=move || draft.with(|f| f.tags.clone().unwrap_or_default())
                    key=|t| t.clone()
                    let:tag
                >
                    {
                        let tag_for_remove = tag.clone();
                        view! {
                            <span class="tag-chip">
                                {tag}
                                <button
                                    type="button"
                                    class="tag-remove"
                                    on:click=move |_| draft.update(|f| f.remove_tag(&tag_for_remove))
                                >
                                    "×"
                                </button>
                            </span>
                        }
                    }
                </For>
            </div>
            <input
                type="text"
                placeholder="Add tag..."
                prop:value=move || input.get()
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    set_input.set(text.clone());
                    lookup(text);
                }
                on:focus=move |_| lookup(input.get_untracked())
                on:keydown=on_keydown
            />
            <Show when=move || !suggestions.get().is_empty()>
                <ul class="tag-suggestions">
                    <For
                        each=move || suggestions.get()
                        key=|t| t.clone()
                        let:tag
                    >
                        {
                            let tag_for_click = tag.clone();
                            view! {
                                <li on:mousedown=move |_| add_tag(tag_for_click.clone())>{tag}</li>
                            }
                        }
                    </For>
                </ul>
            </Show>
        </div>
    }
}
