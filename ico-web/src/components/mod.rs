//! UI Components

pub mod action_panel;
pub mod error_banner;
pub mod navbar;
pub mod stats_panel;

pub use action_panel::ActionPanel;
pub use error_banner::ErrorBanner;
pub use navbar::Navbar;
pub use stats_panel::StatsPanel;
