use leptos::prelude::*;
use leptos::task::spawn_local;
use pixelshelf_core::config::ClientConfig;
use pixelshelf_core::controller::{QueryTicket, SearchController};
use pixelshelf_core::filters::FilterSet;
use pixelshelf_core::error::ValidationError;
use pixelshelf_core::models::{BatchDelete, BatchUpdate, ImageSummary, PaginationEnvelope};
use pixelshelf_core::selection::SelectionSet;
use pixelshelf_core::settings::GallerySettings;

use crate::api;
use crate::browser::{self, BrowserUrl};
use crate::components::{ImageGrid, Pagination, PresetBar, SearchForm, Sidebar, Toasts, Toolbar};

/// Shared gallery page state, handed to every component
#[derive(Clone, Copy)]
pub struct GalleryState {
    pub config: StoredValue<ClientConfig>,
    pub controller: RwSignal<SearchController<BrowserUrl>>,
    pub settings: RwSignal<GallerySettings>,
    pub images: RwSignal<Option<PaginationEnvelope<ImageSummary>>>,
    pub loading: RwSignal<bool>,
    pub selection: RwSignal<SelectionSet>,
}

impl GalleryState {
    /// Fetch the listing for `ticket`. The response is dropped if another
    /// search was committed while it was in flight.
    pub fn run(&self, ticket: QueryTicket) {
        let state = *self;
        state.loading.set(true);
        spawn_local(async move {
            let config = state.config.get_value();
            let result = api::list_images(&config, ticket.params()).await;
            let Some(result) = state.controller.with_untracked(|c| c.accept(&ticket, result)) else {
                return;
            };
            match result {
                Ok(envelope) => {
                    tracing::debug!(total = envelope.total, page = envelope.page, "loaded images");
                    state.images.set(Some(envelope));
                }
                Err(e) => {
                    state.notify_error(format!("Failed to load images: {}", e));
                }
            }
            state.loading.set(false);
        });
    }

    pub fn commit(&self, filters: FilterSet) {
        self.selection.update(|s| s.clear());
        if let Some(ticket) = self.controller.try_update(|c| c.commit(filters)) {
            self.run(ticket);
        }
    }

    /// Drop every filter
    pub fn reset(&self) {
        self.selection.update(|s| s.clear());
        if let Some(ticket) = self.controller.try_update(|c| c.reset()) {
            self.run(ticket);
        }
    }

    pub fn go_to_page(&self, page: u32) {
        self.selection.update(|s| s.clear());
        if let Some(ticket) = self.controller.try_update(|c| c.set_page(page)) {
            self.run(ticket);
        }
    }

    pub fn set_per_page(&self, per_page: u32) {
        self.settings.update(|s| s.set_per_page(per_page));
        if let Some(ticket) = self.controller.try_update(|c| c.set_per_page(per_page)) {
            self.run(ticket);
        }
    }

    /// Fetch the committed search again without touching the URL
    pub fn reload(&self) {
        if let Some(ticket) = self.controller.try_update(|c| c.reload()) {
            self.run(ticket);
        }
    }

    /// Apply a change to every selected image, then refresh the page
    pub fn bulk_update(&self, request: Result<BatchUpdate, ValidationError>) {
        let update = match request {
            Ok(update) => update,
            Err(e) => return self.notify_error(e.to_string()),
        };
        let state = *self;
        spawn_local(async move {
            let config = state.config.get_value();
            match api::bulk_update(&config, &update).await {
                Ok(_) => {
                    state.notify_success(format!("Updated {} images", update.ids.len()));
                    state.reload();
                }
                Err(e) => state.notify_error(format!("Failed to update images: {}", e)),
            }
        });
    }

    /// Move the selected images to the trash and leave selection mode
    pub fn bulk_delete(&self, request: Result<BatchDelete, ValidationError>) {
        let delete = match request {
            Ok(delete) => delete,
            Err(e) => return self.notify_error(e.to_string()),
        };
        let state = *self;
        spawn_local(async move {
            let config = state.config.get_value();
            match api::bulk_delete(&config, &delete).await {
                Ok(_) => {
                    state.selection.update(|s| s.clear());
                    state.notify_success(format!("Moved {} images to trash", delete.ids.len()));
                    state.reload();
                }
                Err(e) => state.notify_error(format!("Failed to delete images: {}", e)),
            }
        });
    }

    pub fn notify_success(&self, text: String) {
        self.controller.update(|c| {
            c.notices_mut().success(text);
        });
    }

    pub fn notify_error(&self, text: String) {
        self.controller.update(|c| {
            c.notices_mut().error(text);
        });
    }
}

#[component]
pub fn App() -> impl IntoView {
    let settings = browser::load_settings();
    let (controller, first_ticket) = SearchController::mount(BrowserUrl, settings.per_page);

    let state = GalleryState {
        config: StoredValue::new(ClientConfig::default()),
        controller: RwSignal::new(controller),
        settings: RwSignal::new(settings),
        images: RwSignal::new(None),
        loading: RwSignal::new(false),
        selection: RwSignal::new(SelectionSet::default()),
    };

    // Persist preferences whenever they change
    Effect::new(move |_| {
        let settings = state.settings.get();
        browser::save_settings(&settings);
    });

    state.run(first_ticket);

    view! {
        <div class="app-container">
            <Toolbar state=state />
            <div class="main-content">
                <Sidebar state=state />
                <main class="gallery">
                    <SearchForm state=state />
                    <PresetBar state=state />
                    <ImageGrid state=state />
                    <Pagination state=state />
                    <footer class="build-info">
                        {format!("{} · {}", env!("BUILD_HASH"), env!("BUILD_TIMESTAMP"))}
                    </footer>
                </main>
            </div>
            <Toasts state=state />
        </div>
    }
}
