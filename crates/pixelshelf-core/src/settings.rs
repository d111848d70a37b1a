//! Per-browser gallery preferences

use serde::{Deserialize, Serialize};

use crate::columns::Density;
use crate::params::{clamp_per_page, PER_PAGE_OPTIONS};

/// `localStorage` key the frontend persists settings under
pub const SETTINGS_STORAGE_KEY: &str = "gallery-settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GallerySettings {
    #[serde(default = "default_per_page", alias = "perPage")]
    pub per_page: u32,
    #[serde(default, alias = "gridSize")]
    pub density: Density,
}

fn default_per_page() -> u32 {
    48
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            density: Density::default(),
        }
    }
}

impl GallerySettings {
    /// Load from stored JSON, falling back to defaults on anything unreadable.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<GallerySettings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable gallery settings");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn set_per_page(&mut self, per_page: u32) {
        self.per_page = clamp_per_page(per_page);
    }

    fn sanitized(mut self) -> Self {
        if !PER_PAGE_OPTIONS.contains(&self.per_page) {
            self.per_page = default_per_page();
        }
        self
    }
}
