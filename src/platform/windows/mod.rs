//! Windows-specific implementations

pub mod browser;
pub mod dialog;
