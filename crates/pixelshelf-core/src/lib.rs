//! Pixelshelf core
//!
//! Browser-independent logic behind the gallery frontend: filter sets and
//! their URL form, column and row layout for the thumbnail grid, and the
//! controller that keeps the URL, saved searches and list requests in step.

pub mod columns;
pub mod config;
pub mod controller;
pub mod error;
pub mod filters;
pub mod models;
pub mod notices;
pub mod pagination;
pub mod params;
pub mod selection;
pub mod settings;
pub mod virtual_grid;

pub use columns::{resolve_columns, Density};
pub use controller::{find_match, QueryTicket, SearchController, UrlPort};
pub use error::{ApiError, ValidationError};
pub use filters::{filters_equal, has_active_conditions, FilterSet};
pub use models::{ImageSummary, PaginationEnvelope, Preset, SmartFolder};
pub use params::SearchParams;
