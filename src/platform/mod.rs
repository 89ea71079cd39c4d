//! Platform abstraction layer
//!
//! This module provides platform-specific implementations for:
//! - Native dialogs (text prompt, chooser, yes/no, message)
//! - Opening URLs in the default browser

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "linux")]
pub mod linux;

// Re-export the current platform's modules
#[cfg(target_os = "macos")]
pub use macos as current;

#[cfg(target_os = "windows")]
pub use windows as current;

#[cfg(target_os = "linux")]
pub use linux as current;
