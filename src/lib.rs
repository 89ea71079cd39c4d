pub mod app;
pub use app::run;

pub mod config;
pub mod desktop;
pub mod dispatch;
pub mod error;
pub mod hotkey;
pub mod model;
pub mod record;
pub mod resolver;
pub mod session;
pub mod url;
pub mod utils;
pub mod watcher;

// Platform abstraction layer
pub mod platform;

// UI modules (cross-platform)
pub mod ui {
    pub mod icon;
    pub mod menu;
    pub mod tray;
}

// Re-export platform-specific implementations through unified interface
pub mod dialog {
    pub use crate::platform::current::dialog::*;
}

pub mod browser {
    pub use crate::platform::current::browser::*;
}
