use crate::config::Settings;
use crate::model::{Feedback, FeedbackSeverity, MenuAction};
use crate::session::APP_TITLE;

#[cfg(any(target_os = "macos", target_os = "windows"))]
const MENU_ID_HEADER: &str = "header";
const MENU_ID_RELOAD: &str = "reload";
const MENU_ID_RESET_SETTINGS: &str = "reset_settings";
const MENU_ID_QUIT: &str = "quit";

#[cfg(any(target_os = "macos", target_os = "windows"))]
pub fn build_menu(settings: &Settings) -> anyhow::Result<tray_icon::menu::Menu> {
    use tray_icon::menu::{Menu, MenuItem, PredefinedMenuItem};

    let menu = Menu::new();
    let header = MenuItem::with_id(MENU_ID_HEADER, header_label(settings), false, None);
    menu.append(&header)?;
    menu.append(&PredefinedMenuItem::separator())?;
    menu.append(&MenuItem::with_id(MENU_ID_RELOAD, "Reload", true, None))?;
    menu.append(&MenuItem::with_id(
        MENU_ID_RESET_SETTINGS,
        "Reset Settings",
        true,
        None,
    ))?;
    menu.append(&PredefinedMenuItem::separator())?;
    menu.append(&MenuItem::with_id(MENU_ID_QUIT, "Exit", true, None))?;
    Ok(menu)
}

/// Disabled first line: which instance and hotkey are active.
pub fn header_label(settings: &Settings) -> String {
    format!(
        "{}.service-now.com · {}",
        settings.company_name, settings.hotkey
    )
}

pub fn parse_menu_action(raw: &str) -> Option<MenuAction> {
    match raw {
        MENU_ID_RELOAD => Some(MenuAction::Reload),
        MENU_ID_RESET_SETTINGS => Some(MenuAction::ResetSettings),
        MENU_ID_QUIT => Some(MenuAction::Quit),
        _ => None,
    }
}

pub fn build_tooltip(settings: &Settings, feedback: Option<&Feedback>) -> String {
    let mut lines = vec![
        APP_TITLE.to_string(),
        format!("{} · {}", settings.company_name, settings.hotkey),
    ];
    if let Some(feedback) = feedback {
        let prefix = match feedback.severity {
            FeedbackSeverity::Info => "",
            FeedbackSeverity::Warning => "⚠️ ",
            FeedbackSeverity::Error => "⛔ ",
        };
        lines.push(format!("Last action: {}{}", prefix, feedback.message));
    }
    lines.join("\n")
}
