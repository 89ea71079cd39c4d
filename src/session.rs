//! One invocation of the ticket interface, and the settings form.
//!
//! Dialogs, the clipboard and the browser are reached through small traits so
//! the flow can run against native implementations or scripted test doubles.

use crate::config::{Settings, parse_ticket_length};
use crate::error::AppError;
use crate::hotkey::parse_hotkey;
use crate::model::FeedbackSeverity;
use crate::record::{Identifier, LookupType, RecordType, Target};
use crate::resolver::IdentifierResolver;
use crate::url::{lookup_url, record_url};

pub const APP_TITLE: &str = "ServiceNow Helper";

/// Blocking dialogs. `None`/`false` means the user dismissed the dialog.
pub trait Prompter {
    fn ask_text(&mut self, title: &str, prompt: &str, initial: &str) -> Option<String>;
    fn choose(&mut self, title: &str, prompt: &str, options: &[&str]) -> Option<String>;
    fn confirm(&mut self, title: &str, question: &str) -> bool;
    fn show(&mut self, severity: FeedbackSeverity, title: &str, message: &str);
}

pub trait Browser {
    fn open(&mut self, url: &str) -> anyhow::Result<()>;
}

pub trait ClipboardSource {
    /// Current clipboard text; `None` when empty or not text.
    fn read_text(&mut self) -> Option<String>;
}

/// What a finished invocation did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Opened {
    Record(Identifier, String),
    Lookup(LookupType, String),
}

impl Opened {
    pub fn url(&self) -> &str {
        match self {
            Opened::Record(_, url) | Opened::Lookup(_, url) => url,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Opened::Record(id, _) => format!("Opened {}", id),
            Opened::Lookup(lt, _) => format!("Opened {} lookup", lt),
        }
    }
}

pub struct Session<'a, P, B, C> {
    settings: &'a Settings,
    resolver: &'a IdentifierResolver,
    prompter: &'a mut P,
    browser: &'a mut B,
    clipboard: &'a mut C,
}

impl<'a, P, B, C> Session<'a, P, B, C>
where
    P: Prompter,
    B: Browser,
    C: ClipboardSource,
{
    pub fn new(
        settings: &'a Settings,
        resolver: &'a IdentifierResolver,
        prompter: &'a mut P,
        browser: &'a mut B,
        clipboard: &'a mut C,
    ) -> Self {
        Self {
            settings,
            resolver,
            prompter,
            browser,
            clipboard,
        }
    }

    /// Clipboard pre-check, then the chooser. `Ok(None)` means the chooser
    /// was dismissed, which ends the invocation without a dialog.
    pub fn run_interface(&mut self) -> Result<Option<Opened>, AppError> {
        let clipboard = self.clipboard.read_text().unwrap_or_default();
        if let Some(id) = self.resolver.find_exact(&clipboard) {
            log::debug!("Clipboard holds {}, opening directly", id);
            return self.launch_record(id).map(Some);
        }

        let labels: Vec<&str> = Target::ALL.iter().map(|t| t.label()).collect();
        let Some(choice) = self.prompter.choose(
            "ServiceNow Ticket Interface",
            "Open which record or lookup?",
            &labels,
        ) else {
            return Ok(None);
        };
        let opened = match Target::from_label(&choice) {
            Some(Target::Record(rt)) => self.open_record(rt),
            Some(Target::Lookup(lt)) => self.open_lookup(lt),
            // Bare lookup tags are accepted too
            None => {
                let lookup = LookupType::from_tag(&choice)?;
                self.open_lookup(lookup)
            }
        }?;
        Ok(Some(opened))
    }

    pub fn open_record(&mut self, record_type: RecordType) -> Result<Opened, AppError> {
        let clipboard = self.clipboard.read_text().unwrap_or_default();
        let initial = self
            .resolver
            .search(record_type, &clipboard)
            .map(|id| id.to_string())
            .unwrap_or_default();

        let input = self
            .prompter
            .ask_text(
                "Input",
                &format!("Enter a {} number (full or short):", record_type),
                &initial,
            )
            .ok_or(AppError::UserCancelled)?;

        let id = self
            .resolver
            .resolve(record_type, &input)
            .ok_or(AppError::InvalidInput { record_type })?;
        self.launch_record(id)
    }

    pub fn open_lookup(&mut self, lookup: LookupType) -> Result<Opened, AppError> {
        let input = self
            .prompter
            .ask_text(
                "Lookup",
                &format!("Lookup {} in ServiceNow (e.g. email for users):", lookup),
                "",
            )
            .filter(|s| !s.is_empty())
            .ok_or(AppError::UserCancelled)?;

        let url = lookup_url(&self.settings.company_name, lookup, &input);
        self.launch(&url)?;
        Ok(Opened::Lookup(lookup, url))
    }

    fn launch_record(&mut self, id: Identifier) -> Result<Opened, AppError> {
        let url = record_url(&self.settings.company_name, &id);
        self.launch(&url)?;
        Ok(Opened::Record(id, url))
    }

    fn launch(&mut self, url: &str) -> Result<(), AppError> {
        log::info!("Opening {}", url);
        self.browser
            .open(url)
            .map_err(|e| AppError::Browser(format!("{:#}", e)))
    }
}

/// Shows an invocation error the way the user expects to see it.
pub fn report_error<P: Prompter>(prompter: &mut P, err: &AppError) {
    prompter.show(err.severity(), err.title(), &err.to_string());
}

pub fn running_notice(hotkey: &str) -> String {
    format!(
        "ServiceNow helper running.\nUse {} to open ticket interface.\nRight-click tray icon for more options.",
        hotkey
    )
}

/// Settings form. Invalid fields re-ask instead of closing the form.
/// Returns `None` if the user cancels at any step.
pub fn settings_form<P: Prompter>(prompter: &mut P, current: &Settings) -> Option<Settings> {
    const TITLE: &str = "Company Setup";

    let company_name = loop {
        let value = prompter.ask_text(TITLE, "Company name:", &current.company_name)?;
        let value = value.trim().to_string();
        if value.is_empty() {
            prompter.show(
                FeedbackSeverity::Warning,
                "Invalid",
                "Company name must not be empty.",
            );
            continue;
        }
        break value;
    };

    let mut length_text = current.ticket_length.to_string();
    let ticket_length = loop {
        length_text = prompter.ask_text(TITLE, "Ticket length (7-10):", &length_text)?;
        match parse_ticket_length(&length_text) {
            Ok(length) => break length,
            Err(e) => report_error(prompter, &e),
        }
    };

    let mut hotkey = current.hotkey.clone();
    loop {
        hotkey = prompter.ask_text(TITLE, "Hotkey (e.g., ctrl+shift+o):", &hotkey)?;
        hotkey = hotkey.trim().to_string();
        match parse_hotkey(&hotkey) {
            Ok(_) => break,
            Err(e) => report_error(prompter, &e),
        }
    }

    let never_ask_again = prompter.confirm(TITLE, "Never ask again on startup?");

    Some(Settings {
        company_name,
        ticket_length,
        never_ask_again,
        hotkey,
    })
}
