use leptos::prelude::*;
use pixelshelf_core::pagination::{page_items, PageItem};

use crate::app::GalleryState;

#[component]
pub fn Pagination(state: GalleryState) -> impl IntoView {
    let current = move || state.controller.with(|c| c.committed().page);
    let total_pages = move || state.images.with(|p| p.as_ref().map_or(0, |p| p.total_pages));
    let visible = move || state.images.with(|p| p.as_ref().is_some_and(|p| p.shows_pagination()));

    view! {
        <Show when=visible>
            <nav class="pagination">
                <button
                    class="page-btn page-prev"
                    disabled=move || current() <= 1
                    on:click=move |_| state.go_to_page(current().saturating_sub(1).max(1))
                >
                    "‹"
                </button>
                {move || {
                    page_items(current(), total_pages())
                        .into_iter()
                        .map(|item| match item {
                            PageItem::Page(n) => view! {
                                <button
                                    class="page-btn"
                                    class:active=move || current() == n
                                    on:click=move |_| state.go_to_page(n)
                                >
                                    {n}
                                </button>
                            }
                            .into_any(),
                            PageItem::Gap => view! { <span class="page-gap">"..."</span> }.into_any(),
                        })
                        .collect::<Vec<_>>()
                }}
                <button
                    class="page-btn page-next"
                    disabled=move || current() >= total_pages()
                    on:click=move |_| state.go_to_page(current() + 1)
                >
                    "›"
                </button>
            </nav>
        </Show>
    }
}
