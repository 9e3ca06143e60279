mod nav_bar;
mod overlay;
mod page;
mod scene;
mod status_bar;

pub use nav_bar::NavBarWidget;
pub use overlay::RangeOverlayWidget;
pub use page::PageWidget;
pub use status_bar::StatusBarWidget;
