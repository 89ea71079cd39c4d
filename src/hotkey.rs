//! Global hotkey parsing, registration and the listener thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

use crossbeam_channel::Sender;
use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};

use crate::error::AppError;
use crate::model::AppEvent;

/// No hotkey registered.
const NO_HOTKEY: u32 = 0;

/// Parses combos like `ctrl+shift+o`, `alt+F9` or `cmd+space`.
/// Exactly one non-modifier key is required; case is ignored.
pub fn parse_hotkey(combo: &str) -> Result<HotKey, AppError> {
    let invalid = || AppError::InvalidSettings(format!("Invalid hotkey: '{}'", combo));

    let mut mods = Modifiers::empty();
    let mut code: Option<Code> = None;
    for part in combo.split('+').map(str::trim) {
        if part.is_empty() {
            return Err(invalid());
        }
        let lower = part.to_ascii_lowercase();
        match lower.as_str() {
            "ctrl" | "control" => mods |= Modifiers::CONTROL,
            "shift" => mods |= Modifiers::SHIFT,
            "alt" | "option" => mods |= Modifiers::ALT,
            "cmd" | "command" | "super" | "win" | "windows" | "meta" => mods |= Modifiers::SUPER,
            key => {
                if code.is_some() {
                    return Err(invalid());
                }
                code = Some(key_code(key).ok_or_else(invalid)?);
            }
        }
    }
    let code = code.ok_or_else(invalid)?;
    let mods = if mods.is_empty() { None } else { Some(mods) };
    Ok(HotKey::new(mods, code))
}

fn key_code(key: &str) -> Option<Code> {
    let code = match key {
        "a" => Code::KeyA,
        "b" => Code::KeyB,
        "c" => Code::KeyC,
        "d" => Code::KeyD,
        "e" => Code::KeyE,
        "f" => Code::KeyF,
        "g" => Code::KeyG,
        "h" => Code::KeyH,
        "i" => Code::KeyI,
        "j" => Code::KeyJ,
        "k" => Code::KeyK,
        "l" => Code::KeyL,
        "m" => Code::KeyM,
        "n" => Code::KeyN,
        "o" => Code::KeyO,
        "p" => Code::KeyP,
        "q" => Code::KeyQ,
        "r" => Code::KeyR,
        "s" => Code::KeyS,
        "t" => Code::KeyT,
        "u" => Code::KeyU,
        "v" => Code::KeyV,
        "w" => Code::KeyW,
        "x" => Code::KeyX,
        "y" => Code::KeyY,
        "z" => Code::KeyZ,
        "0" => Code::Digit0,
        "1" => Code::Digit1,
        "2" => Code::Digit2,
        "3" => Code::Digit3,
        "4" => Code::Digit4,
        "5" => Code::Digit5,
        "6" => Code::Digit6,
        "7" => Code::Digit7,
        "8" => Code::Digit8,
        "9" => Code::Digit9,
        "f1" => Code::F1,
        "f2" => Code::F2,
        "f3" => Code::F3,
        "f4" => Code::F4,
        "f5" => Code::F5,
        "f6" => Code::F6,
        "f7" => Code::F7,
        "f8" => Code::F8,
        "f9" => Code::F9,
        "f10" => Code::F10,
        "f11" => Code::F11,
        "f12" => Code::F12,
        "space" => Code::Space,
        "enter" | "return" => Code::Enter,
        "tab" => Code::Tab,
        "esc" | "escape" => Code::Escape,
        "insert" => Code::Insert,
        "home" => Code::Home,
        "end" => Code::End,
        "pageup" => Code::PageUp,
        "pagedown" => Code::PageDown,
        "up" => Code::ArrowUp,
        "down" => Code::ArrowDown,
        "left" => Code::ArrowLeft,
        "right" => Code::ArrowRight,
        ";" | "semicolon" => Code::Semicolon,
        "," | "comma" => Code::Comma,
        "." | "period" => Code::Period,
        "/" | "slash" => Code::Slash,
        _ => return None,
    };
    Some(code)
}

/// Registration of the one global hotkey.
pub trait HotkeyBinder {
    /// Registers `combo`, replacing whatever was bound before. Binding the
    /// combo that is already registered is a no-op.
    fn rebind(&mut self, combo: &str) -> Result<(), AppError>;
}

/// The single rebindable hotkey. Must live on the UI thread.
pub struct HotkeyBinding {
    manager: GlobalHotKeyManager,
    current: Option<HotKey>,
    active_id: Arc<AtomicU32>,
}

impl HotkeyBinding {
    pub fn new() -> Result<Self, AppError> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| AppError::Hotkey(format!("failed to create hotkey manager: {}", e)))?;
        Ok(Self {
            manager,
            current: None,
            active_id: Arc::new(AtomicU32::new(NO_HOTKEY)),
        })
    }

    /// Shared with the listener thread so it can tell our hotkey apart.
    pub fn active_id(&self) -> Arc<AtomicU32> {
        self.active_id.clone()
    }
}

impl HotkeyBinder for HotkeyBinding {
    /// On failure nothing stays bound, so the next call retries.
    fn rebind(&mut self, combo: &str) -> Result<(), AppError> {
        let hotkey = parse_hotkey(combo)?;
        if self.current == Some(hotkey) {
            return Ok(());
        }

        if let Some(old) = self.current.take() {
            self.active_id.store(NO_HOTKEY, Ordering::SeqCst);
            if let Err(e) = self.manager.unregister(old) {
                log::warn!("Failed to unregister previous hotkey: {}", e);
            }
        }

        self.manager
            .register(hotkey)
            .map_err(|e| AppError::Hotkey(format!("failed to register '{}': {}", combo, e)))?;
        self.active_id.store(hotkey.id(), Ordering::SeqCst);
        self.current = Some(hotkey);
        log::info!("Hotkey '{}' registered (id {})", combo, hotkey.id());
        Ok(())
    }
}

/// Forwards presses of the active hotkey as [`AppEvent::OpenInterface`].
pub fn spawn_hotkey_listener(
    tx: Sender<AppEvent>,
    active_id: Arc<AtomicU32>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let receiver = GlobalHotKeyEvent::receiver();
        for event in receiver.iter() {
            if event.state != HotKeyState::Pressed {
                continue;
            }
            if event.id != active_id.load(Ordering::SeqCst) {
                log::debug!("Ignoring stale hotkey event id={}", event.id);
                continue;
            }
            if tx.send(AppEvent::OpenInterface).is_err() {
                break;
            }
        }
        log::debug!("Hotkey listener exiting");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_combo() {
        let hotkey = parse_hotkey("ctrl+shift+o").unwrap();
        assert_eq!(
            hotkey,
            HotKey::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::KeyO)
        );
    }

    #[test]
    fn parsing_ignores_case_and_spacing() {
        assert_eq!(
            parse_hotkey(" Alt + F9 ").unwrap(),
            HotKey::new(Some(Modifiers::ALT), Code::F9)
        );
        assert_eq!(
            parse_hotkey("cmd+space").unwrap(),
            HotKey::new(Some(Modifiers::SUPER), Code::Space)
        );
        assert_eq!(parse_hotkey("f12").unwrap(), HotKey::new(None, Code::F12));
    }

    #[test]
    fn rejects_malformed_combos() {
        for combo in ["", "ctrl+shift", "ctrl++o", "ctrl+o+p", "hyper+o", "ctrl+ä"] {
            assert!(
                matches!(parse_hotkey(combo), Err(AppError::InvalidSettings(_))),
                "expected '{}' to be rejected",
                combo
            );
        }
    }
}
