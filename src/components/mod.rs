pub mod app;
pub mod import_panel;
pub mod registry_summary;
pub mod search_bar;

pub use app::App;
pub use import_panel::ImportPanel;
pub use registry_summary::RegistrySummary;
pub use search_bar::SearchBar;
