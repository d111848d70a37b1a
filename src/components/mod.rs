mod image_grid;
mod pagination;
mod preset_bar;
mod search_form;
mod sidebar;
mod toasts;
mod toolbar;

pub use image_grid::ImageGrid;
pub use pagination::Pagination;
pub use preset_bar::PresetBar;
pub use search_form::SearchForm;
pub use sidebar::Sidebar;
pub use toasts::Toasts;
pub use toolbar::Toolbar;
