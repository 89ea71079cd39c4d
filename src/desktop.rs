//! Native implementations of the interaction seams.

use anyhow::Result;

use crate::model::FeedbackSeverity;
use crate::{browser, dialog};
use crate::session::{Browser, ClipboardSource, Prompter};

/// Dialogs of the running desktop. Failures are logged and treated as a
/// dismissed dialog.
#[derive(Debug, Default)]
pub struct NativeDialogs;

impl Prompter for NativeDialogs {
    fn ask_text(&mut self, title: &str, prompt: &str, initial: &str) -> Option<String> {
        dialog::ask_text(title, prompt, initial).unwrap_or_else(|e| {
            log::error!("Text prompt failed: {:#}", e);
            None
        })
    }

    fn choose(&mut self, title: &str, prompt: &str, options: &[&str]) -> Option<String> {
        dialog::choose(title, prompt, options).unwrap_or_else(|e| {
            log::error!("Chooser failed: {:#}", e);
            None
        })
    }

    fn confirm(&mut self, title: &str, question: &str) -> bool {
        dialog::confirm(title, question).unwrap_or_else(|e| {
            log::error!("Confirmation dialog failed: {:#}", e);
            false
        })
    }

    fn show(&mut self, severity: FeedbackSeverity, title: &str, message: &str) {
        if let Err(e) = dialog::show_message(severity, title, message) {
            log::error!("Message dialog failed: {:#}", e);
        }
    }
}

#[derive(Debug, Default)]
pub struct NativeBrowser;

impl Browser for NativeBrowser {
    fn open(&mut self, url: &str) -> Result<()> {
        browser::open_url(url)
    }
}

/// Read-only system clipboard. The handle is opened lazily and dropped after
/// a failure so a later read can retry.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Option<String> {
        if self.inner.is_none() {
            match arboard::Clipboard::new() {
                Ok(clipboard) => self.inner = Some(clipboard),
                Err(e) => {
                    log::warn!("Failed to access clipboard: {}", e);
                    return None;
                }
            }
        }
        let clipboard = self.inner.as_mut()?;
        match clipboard.get_text() {
            Ok(text) => Some(text),
            Err(arboard::Error::ContentNotAvailable) => None,
            Err(e) => {
                log::warn!("Failed to read clipboard: {}", e);
                self.inner = None;
                None
            }
        }
    }
}
