//! Linux implementations (X11/Wayland desktops with zenity installed)

pub mod browser;
pub mod dialog;
