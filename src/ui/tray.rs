//! Tray icon. Shown on macOS and Windows; elsewhere the helper runs headless
//! and is driven by the hotkey and the settings file alone.

use crate::config::Settings;
use crate::model::{Feedback, MenuAction};

#[cfg(any(target_os = "macos", target_os = "windows"))]
pub struct Tray {
    icon: tray_icon::TrayIcon,
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
impl Tray {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        use anyhow::Context;
        use tray_icon::TrayIconBuilder;

        use crate::ui::icon::create_icon;
        use crate::ui::menu::{build_menu, build_tooltip};

        let icon = create_icon().context("failed to create tray icon image")?;
        let menu = build_menu(settings).context("failed to build tray menu")?;
        let icon = TrayIconBuilder::new()
            .with_icon(icon)
            .with_menu(Box::new(menu))
            .with_tooltip(build_tooltip(settings, None))
            .build()
            .context("failed to create tray icon")?;
        icon.set_visible(true)
            .context("failed to show tray icon")?;
        Ok(Self { icon })
    }

    /// Menu clicks since the last call.
    pub fn poll_actions(&self) -> Vec<MenuAction> {
        let receiver = tray_icon::menu::MenuEvent::receiver();
        let mut actions = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            if let Some(action) = crate::ui::menu::parse_menu_action(event.id().as_ref()) {
                actions.push(action);
            }
        }
        actions
    }

    pub fn refresh(&self, settings: &Settings, feedback: Option<&Feedback>) {
        use crate::ui::menu::{build_menu, build_tooltip};

        match build_menu(settings) {
            Ok(menu) => self.icon.set_menu(Some(Box::new(menu))),
            Err(err) => log::error!("Failed to rebuild menu: {}", err),
        }
        let tooltip = build_tooltip(settings, feedback);
        if let Err(err) = self.icon.set_tooltip(Some(tooltip.as_str())) {
            log::error!("Failed to update tooltip: {}", err);
        }
    }
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub struct Tray;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
impl Tray {
    pub fn new(_settings: &Settings) -> anyhow::Result<Self> {
        log::info!("No tray on this platform; use the hotkey or edit the settings file");
        Ok(Self)
    }

    pub fn poll_actions(&self) -> Vec<MenuAction> {
        Vec::new()
    }

    pub fn refresh(&self, settings: &Settings, feedback: Option<&Feedback>) {
        log::debug!(
            "{}",
            crate::ui::menu::build_tooltip(settings, feedback).replace('\n', " | ")
        );
    }
}
