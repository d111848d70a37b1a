//! Thumbnail grid with row virtualization
//!
//! Layout comes from [`GridViewport`]: short pages render as a plain CSS
//! grid, long ones only materialize the rows near the viewport.

use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use pixelshelf_core::models::ImageSummary;
use pixelshelf_core::virtual_grid::{GridOutput, GridViewport};
use wasm_bindgen::JsCast;

use crate::app::GalleryState;
use crate::browser;

/// Used until the container has been measured
const INITIAL_CONTAINER_HEIGHT: f64 = 800.0;

fn px(value: f64) -> String {
    format!("{}px", value)
}

fn grid_columns(column_count: u32) -> String {
    format!("repeat({}, minmax(0, 1fr))", column_count)
}

#[component]
pub fn ImageGrid(state: GalleryState) -> impl IntoView {
    let container_ref = NodeRef::<html::Div>::new();
    let viewport = RwSignal::new(GridViewport::new(
        browser::viewport_width(),
        INITIAL_CONTAINER_HEIGHT,
        state.settings.get_untracked().density,
    ));

    let item_count = move || state.images.with_untracked(|p| p.as_ref().map_or(0, |p| p.items.len()));

    let measure = move || {
        let height = container_ref
            .get_untracked()
            .map(|el| el.client_height() as f64)
            .filter(|h| *h > 0.0)
            .unwrap_or(INITIAL_CONTAINER_HEIGHT);
        let count = item_count();
        viewport.update(|v| {
            v.resize(browser::viewport_width(), height);
            v.clamp_scroll(count);
        });
    };

    // Re-layout on density change
    Effect::new(move |_| {
        let density = state.settings.with(|s| s.density);
        let count = item_count();
        viewport.update(|v| {
            v.relayout(browser::viewport_width(), density);
            v.clamp_scroll(count);
        });
    });

    // A new page starts at the top
    Effect::new(move |_| {
        state.images.track();
        if let Some(el) = container_ref.get_untracked() {
            el.set_scroll_top(0);
        }
        viewport.update(|v| v.set_scroll_top(0.0));
        measure();
    });

    let resize_handle = window_event_listener(ev::resize, move |_| measure());
    on_cleanup(move || resize_handle.remove());

    let on_scroll = move |ev: web_sys::Event| {
        if let Some(target) = ev.target() {
            let element: web_sys::HtmlElement = target.unchecked_into();
            viewport.update(|v| v.set_scroll_top(element.scroll_top() as f64));
        }
    };

    view! {
        <div class="image-grid-scroll" node_ref=container_ref on:scroll=on_scroll>
            {move || {
                let loading = state.loading.get();
                let Some(items) = state.images.with(|p| p.as_ref().map(|p| p.items.clone())) else {
                    return if loading {
                        view! { <div class="loading">"Loading images..."</div> }.into_any()
                    } else {
                        view! { <div class="grid-placeholder"></div> }.into_any()
                    };
                };

                match viewport.with(|v| v.render(&items, ImageSummary::clone)) {
                    GridOutput::Empty => view! {
                        <div class="empty-state">
                            <p>"No images found"</p>
                        </div>
                    }
                    .into_any(),
                    GridOutput::Static { column_count, rows } => view! {
                        <div class="image-grid" style:grid-template-columns=grid_columns(column_count)>
                            {rows
                                .into_iter()
                                .flat_map(|row| row.cells)
                                .map(|image| view! { <ImageCard state=state image=image /> })
                                .collect::<Vec<_>>()}
                        </div>
                    }
                    .into_any(),
                    GridOutput::Windowed { column_count, total_height, rows, .. } => {
                        let row_height = viewport.with(|v| v.layout().row_height);
                        view! {
                            <div class="virtual-container" style:position="relative" style:height=px(total_height)>
                                {rows
                                    .into_iter()
                                    .map(|row| view! {
                                        <div
                                            class="image-grid virtual-row"
                                            style:position="absolute"
                                            style:top=px(row.top)
                                            style:left="0"
                                            style:right="0"
                                            style:height=px(row_height)
                                            style:grid-template-columns=grid_columns(column_count)
                                        >
                                            {row
                                                .cells
                                                .into_iter()
                                                .map(|image| view! { <ImageCard state=state image=image /> })
                                                .collect::<Vec<_>>()}
                                        </div>
                                    })
                                    .collect::<Vec<_>>()}
                            </div>
                        }
                        .into_any()
                    }
                }
            }}
            {move || (state.loading.get() && state.images.with(|p| p.is_some())).then(|| view! {
                <div class="loading-more">"Loading..."</div>
            })}
        </div>
    }
}

#[component]
fn ImageCard(state: GalleryState, image: ImageSummary) -> impl IntoView {
    let id = image.id;
    let href = format!("/images/{}", id);
    let thumbnail = image.thumbnail_url();
    let model = image.display_model().to_string();
    let stars = format!("{}{}", "★".repeat(image.rating.min(5) as usize), "☆".repeat(5 - image.rating.min(5) as usize));
    let is_favorite = image.is_favorite;
    let dimensions = format!("{}×{}", image.width, image.height);

    let selection_mode = move || state.selection.with(|s| s.is_selection_mode());
    let is_selected = move || state.selection.with(|s| s.is_selected(&id));

    let on_click = move |ev: web_sys::MouseEvent| {
        if selection_mode() {
            ev.prevent_default();
            state.selection.update(|s| s.toggle(id));
        }
    };

    view! {
        <a
            class="image-card"
            class:selectable=selection_mode
            class:selected=is_selected
            href=href
            on:click=on_click
        >
            <div class="image-thumb">
                <img src=thumbnail alt=model.clone() loading="lazy" />
                {is_favorite.then(|| view! { <span class="favorite-badge">"♥"</span> })}
                <Show when=selection_mode>
                    <span class="select-check" class:checked=is_selected></span>
                </Show>
            </div>
            <div class="image-info">
                <span class="image-model" title=model.clone()>{model.clone()}</span>
                <span class="image-rating">{stars}</span>
                <span class="image-size">{dimensions}</span>
            </div>
        </a>
    }
}
