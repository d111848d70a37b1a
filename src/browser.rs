//! Browser glue: address bar, localStorage and window size

use pixelshelf_core::controller::UrlPort;
use pixelshelf_core::settings::{GallerySettings, SETTINGS_STORAGE_KEY};
use wasm_bindgen::JsValue;

/// The real address bar. Writes go through `history.replaceState`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserUrl;

impl UrlPort for BrowserUrl {
    fn read_query(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default()
    }

    fn replace_query(&mut self, query: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let path = window.location().pathname().unwrap_or_else(|_| "/".to_string());
        let url = if query.is_empty() { path } else { format!("{}?{}", path, query) };
        let Ok(history) = window.history() else {
            return;
        };
        if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(&url)) {
            tracing::warn!("replaceState failed: {:?}", e);
        }
    }
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

pub fn load_settings() -> GallerySettings {
    storage()
        .and_then(|s| s.get_item(SETTINGS_STORAGE_KEY).ok().flatten())
        .map(|json| GallerySettings::from_json(&json))
        .unwrap_or_default()
}

pub fn save_settings(settings: &GallerySettings) {
    let Some(storage) = storage() else {
        return;
    };
    if let Err(e) = storage.set_item(SETTINGS_STORAGE_KEY, &settings.to_json()) {
        tracing::warn!("failed to persist gallery settings: {:?}", e);
    }
}

/// Inner width of the window in CSS pixels
pub fn viewport_width() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}
