use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{error, info, warn};
use winit::event::{Event, StartCause};
use winit::event_loop::{ControlFlow, EventLoop};

use crate::config::{Settings, SettingsStore, get_settings_path};
use crate::desktop::{NativeBrowser, NativeDialogs, SystemClipboard};
use crate::dispatch::Dispatcher;
use crate::error::AppError;
use crate::hotkey::{HotkeyBinder, HotkeyBinding, spawn_hotkey_listener};
use crate::model::{AppEvent, Feedback, FeedbackSeverity, MenuAction};
use crate::resolver::IdentifierResolver;
use crate::session::{APP_TITLE, Prompter, Session, report_error, running_notice, settings_form};
use crate::ui::tray::Tray;
use crate::watcher::spawn_settings_watcher;

const DISPATCH_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReloadTrigger {
    Menu,
    FileChanged,
}

/// State owned by the UI thread.
struct App<P = NativeDialogs, H = HotkeyBinding> {
    store: SettingsStore,
    settings: Settings,
    resolver: IdentifierResolver,
    hotkey: Option<H>,
    dialogs: P,
    browser: NativeBrowser,
    clipboard: SystemClipboard,
    tray: Option<Tray>,
    last_feedback: Option<Feedback>,
}

pub fn run() -> Result<()> {
    let store = SettingsStore::new(get_settings_path());
    let mut dialogs = NativeDialogs;
    let settings = load_startup_settings(&store, &mut dialogs);
    let resolver =
        IdentifierResolver::new(settings.ticket_length).context("failed to build resolver")?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let dispatcher = Dispatcher::new();

    let hotkey = match HotkeyBinding::new() {
        Ok(binding) => Some(binding),
        Err(e) => {
            error!("{}", e);
            None
        }
    };
    let _hotkey_listener = hotkey
        .as_ref()
        .map(|binding| spawn_hotkey_listener(dispatcher.sender(), binding.active_id()));

    let mut app = App {
        store,
        settings,
        resolver,
        hotkey,
        dialogs,
        browser: NativeBrowser,
        clipboard: SystemClipboard::new(),
        tray: None,
        last_feedback: None,
    };
    app.startup();

    let _settings_watcher =
        spawn_settings_watcher(app.store.path().to_path_buf(), dispatcher.sender());

    app.tray = Some(Tray::new(&app.settings).context("failed to create tray")?);
    info!("{} running (settings: {:?})", APP_TITLE, app.store.path());

    #[allow(deprecated)]
    let run_result = event_loop.run(move |event, event_loop| match event {
        Event::NewEvents(StartCause::Init) => {
            event_loop.set_control_flow(ControlFlow::WaitUntil(
                Instant::now() + DISPATCH_POLL_INTERVAL,
            ));
        }
        Event::NewEvents(StartCause::ResumeTimeReached { .. }) => {
            if let Some(tray) = app.tray.as_ref() {
                for action in tray.poll_actions() {
                    dispatcher.post(AppEvent::MenuAction(action));
                }
            }
            // One event at a time; a dialog blocks until the user answers.
            for event in dispatcher.drain() {
                if !app.handle(event) {
                    event_loop.exit();
                    return;
                }
            }
            event_loop.set_control_flow(ControlFlow::WaitUntil(
                Instant::now() + DISPATCH_POLL_INTERVAL,
            ));
        }
        _ => {}
    });

    run_result.context("event loop terminated with error")?;
    Ok(())
}

/// A broken settings file must not keep the helper from starting.
fn load_startup_settings(store: &SettingsStore, prompter: &mut impl Prompter) -> Settings {
    match store.load_validated() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Falling back to default settings: {}", e);
            prompter.show(
                FeedbackSeverity::Warning,
                APP_TITLE,
                &format!("{}\nUsing default settings for now.", e),
            );
            Settings::default()
        }
    }
}

impl<P: Prompter, H: HotkeyBinder> App<P, H> {
    fn startup(&mut self) {
        if let Err(e) = self.rebind_hotkey() {
            self.fail(&e);
        }
        if self.settings.never_ask_again {
            let notice = running_notice(&self.settings.hotkey);
            self.dialogs.show(FeedbackSeverity::Info, APP_TITLE, &notice);
        } else {
            self.open_settings_form();
        }
    }

    /// Returns false when the helper should exit.
    fn handle(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::OpenInterface => self.open_interface(),
            AppEvent::SettingsFileChanged => self.reload(ReloadTrigger::FileChanged),
            AppEvent::MenuAction(MenuAction::Reload) => {
                self.dialogs
                    .show(FeedbackSeverity::Info, "Reload", "Reloading configuration.");
                self.reload(ReloadTrigger::Menu);
            }
            AppEvent::MenuAction(MenuAction::ResetSettings) => self.reset_settings(),
            AppEvent::MenuAction(MenuAction::Quit) => {
                info!("Exit requested from tray");
                return false;
            }
        }
        true
    }

    fn open_interface(&mut self) {
        let result = Session::new(
            &self.settings,
            &self.resolver,
            &mut self.dialogs,
            &mut self.browser,
            &mut self.clipboard,
        )
        .run_interface();
        match result {
            Ok(Some(opened)) => self.set_feedback(Feedback::info(opened.describe())),
            Ok(None) => log::debug!("Ticket interface dismissed"),
            Err(e) => self.fail(&e),
        }
    }

    fn open_settings_form(&mut self) {
        let Some(updated) = settings_form(&mut self.dialogs, &self.settings) else {
            info!("Settings form canceled");
            return;
        };
        if let Err(e) = self.store.save(&updated) {
            self.fail(&e);
            return;
        }
        self.dialogs.show(
            FeedbackSeverity::Info,
            "Saved",
            &format!(
                "Company: {}, Length: {}, Hotkey: {}",
                updated.company_name, updated.ticket_length, updated.hotkey
            ),
        );
        let notice = running_notice(&updated.hotkey);
        if let Err(e) = self.apply_settings(updated) {
            self.fail(&e);
            return;
        }
        self.dialogs.show(FeedbackSeverity::Info, APP_TITLE, &notice);
    }

    /// Swaps in new settings wholesale: resolver, tray and hotkey follow.
    fn apply_settings(&mut self, settings: Settings) -> Result<(), AppError> {
        let resolver = IdentifierResolver::new(settings.ticket_length)?;
        self.settings = settings;
        self.resolver = resolver;
        self.refresh_tray();
        self.rebind_hotkey()
    }

    /// Registers the configured hotkey. Runs on every apply so a binding that
    /// failed earlier is retried.
    fn rebind_hotkey(&mut self) -> Result<(), AppError> {
        let Some(binding) = self.hotkey.as_mut() else {
            return Ok(());
        };
        binding.rebind(&self.settings.hotkey).inspect_err(|e| error!("{}", e))
    }

    fn reload(&mut self, trigger: ReloadTrigger) {
        let loaded = match self.store.load_validated() {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Settings reload failed: {}", e);
                self.fail(&AppError::InvalidSettings(format!("Reload failed: {}", e)));
                return;
            }
        };
        if trigger == ReloadTrigger::FileChanged && loaded == self.settings {
            log::debug!("Settings file touched without changes");
            if let Err(e) = self.rebind_hotkey() {
                self.set_feedback(Feedback::new(e.to_string(), e.severity()));
            }
            return;
        }
        if let Err(e) = self.apply_settings(loaded) {
            self.fail(&e);
            return;
        }
        self.set_feedback(Feedback::info("Configuration reloaded".to_string()));
        if trigger == ReloadTrigger::FileChanged {
            self.dialogs.show(
                FeedbackSeverity::Info,
                "Config Reloaded",
                "Configuration was updated automatically.",
            );
        }
    }

    fn reset_settings(&mut self) {
        match self.store.reset() {
            Ok(()) => {
                self.set_feedback(Feedback::info("Configuration reset".to_string()));
                self.dialogs.show(
                    FeedbackSeverity::Info,
                    "Reset",
                    "Configuration reset! Relaunch the helper to enter new values.",
                );
            }
            Err(e) => self.fail(&e),
        }
    }

    fn fail(&mut self, err: &AppError) {
        self.set_feedback(Feedback::new(err.to_string(), err.severity()));
        report_error(&mut self.dialogs, err);
    }

    fn set_feedback(&mut self, feedback: Feedback) {
        self.last_feedback = Some(feedback);
        self.refresh_tray();
    }

    fn refresh_tray(&self) {
        if let Some(tray) = self.tray.as_ref() {
            tray.refresh(&self.settings, self.last_feedback.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordType;
    use std::collections::VecDeque;
    use std::fs;

    /// Answers text prompts from a queue and records every message shown.
    #[derive(Default)]
    struct RecordingPrompter {
        texts: VecDeque<&'static str>,
        never_ask_again: bool,
        shown: Vec<(FeedbackSeverity, String, String)>,
    }

    impl RecordingPrompter {
        fn titles(&self) -> Vec<&str> {
            self.shown.iter().map(|(_, title, _)| title.as_str()).collect()
        }
    }

    impl Prompter for RecordingPrompter {
        fn ask_text(&mut self, _title: &str, _prompt: &str, _initial: &str) -> Option<String> {
            self.texts.pop_front().map(String::from)
        }

        fn choose(&mut self, _title: &str, _prompt: &str, _options: &[&str]) -> Option<String> {
            None
        }

        fn confirm(&mut self, _title: &str, _question: &str) -> bool {
            self.never_ask_again
        }

        fn show(&mut self, severity: FeedbackSeverity, title: &str, message: &str) {
            self.shown
                .push((severity, title.to_string(), message.to_string()));
        }
    }

    /// Records every registration attempt; fails while `busy` is set.
    #[derive(Default)]
    struct FakeBinder {
        calls: Vec<String>,
        bound: Option<String>,
        busy: bool,
    }

    impl HotkeyBinder for FakeBinder {
        fn rebind(&mut self, combo: &str) -> Result<(), AppError> {
            self.calls.push(combo.to_string());
            if self.busy {
                self.bound = None;
                return Err(AppError::Hotkey(format!("'{}' is taken", combo)));
            }
            self.bound = Some(combo.to_string());
            Ok(())
        }
    }

    fn test_app(dir: &tempfile::TempDir) -> App<RecordingPrompter, FakeBinder> {
        let store = SettingsStore::new(dir.path().join("settings.toml"));
        let settings = Settings {
            company_name: "acme".into(),
            never_ask_again: true,
            ..Settings::default()
        };
        store.save(&settings).unwrap();
        App {
            store,
            resolver: IdentifierResolver::new(settings.ticket_length).unwrap(),
            settings,
            hotkey: Some(FakeBinder::default()),
            dialogs: RecordingPrompter::default(),
            browser: NativeBrowser,
            clipboard: SystemClipboard::new(),
            tray: None,
            last_feedback: None,
        }
    }

    fn binder(app: &mut App<RecordingPrompter, FakeBinder>) -> &mut FakeBinder {
        app.hotkey.as_mut().unwrap()
    }

    #[test]
    fn file_change_applies_new_ticket_length() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        let mut updated = app.settings.clone();
        updated.ticket_length = 8;
        app.store.save(&updated).unwrap();

        assert!(app.handle(AppEvent::SettingsFileChanged));

        assert_eq!(app.settings.ticket_length, 8);
        assert_eq!(app.resolver.ticket_length(), 8);
        assert_eq!(app.resolver.resolve(RecordType::Incident, "INC1234567"), None);
        assert_eq!(
            app.resolver
                .resolve(RecordType::Incident, "INC12345678")
                .unwrap()
                .to_string(),
            "INC12345678"
        );
        assert_eq!(app.dialogs.titles(), vec!["Config Reloaded"]);
        assert_eq!(binder(&mut app).calls, vec!["ctrl+shift+o"]);
    }

    #[test]
    fn invalid_file_keeps_running_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        let before = app.settings.clone();

        fs::write(
            app.store.path(),
            "[Settings]\nCompanyName = \"acme\"\nTicketLength = 11\n",
        )
        .unwrap();
        app.handle(AppEvent::SettingsFileChanged);
        assert_eq!(app.settings, before);
        assert_eq!(app.resolver.ticket_length(), 7);

        fs::write(app.store.path(), "[Settings\nTicketLength = = 8\n").unwrap();
        app.handle(AppEvent::MenuAction(MenuAction::Reload));
        assert_eq!(app.settings, before);
        assert_eq!(app.resolver.ticket_length(), 7);

        assert_eq!(app.dialogs.titles(), vec!["Invalid", "Reload", "Invalid"]);
        assert!(binder(&mut app).calls.is_empty());
        assert_eq!(
            app.last_feedback.as_ref().map(|f| f.severity),
            Some(FeedbackSeverity::Warning)
        );
    }

    #[test]
    fn unchanged_file_reload_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        let before = app.settings.clone();
        app.store.save(&before).unwrap();

        app.handle(AppEvent::SettingsFileChanged);

        assert!(app.dialogs.shown.is_empty());
        assert_eq!(app.settings, before);
        assert!(app.last_feedback.is_none());
    }

    #[test]
    fn menu_reload_retries_a_failed_registration() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        binder(&mut app).busy = true;
        app.startup();
        assert_eq!(binder(&mut app).bound, None);
        assert!(app.dialogs.titles().contains(&"Hotkey"));

        // The other application released the combo.
        binder(&mut app).busy = false;
        app.handle(AppEvent::MenuAction(MenuAction::Reload));

        let binder = binder(&mut app);
        assert_eq!(binder.calls, vec!["ctrl+shift+o", "ctrl+shift+o"]);
        assert_eq!(binder.bound.as_deref(), Some("ctrl+shift+o"));
    }

    #[test]
    fn unchanged_file_reload_retries_registration_quietly() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        binder(&mut app).busy = true;
        app.handle(AppEvent::SettingsFileChanged);

        assert!(app.dialogs.shown.is_empty());
        assert_eq!(binder(&mut app).calls.len(), 1);
        assert!(
            app.last_feedback
                .as_ref()
                .is_some_and(|f| f.message.contains("is taken"))
        );
    }

    #[test]
    fn failed_registration_after_save_skips_running_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.dialogs.texts = VecDeque::from(["globex", "8", "alt+f9"]);
        binder(&mut app).busy = true;

        app.open_settings_form();

        assert_eq!(app.store.load().unwrap().company_name, "globex");
        assert_eq!(app.settings.hotkey, "alt+f9");
        assert_eq!(app.dialogs.titles(), vec!["Saved", "Hotkey"]);
    }

    #[test]
    fn saved_settings_show_running_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.dialogs.texts = VecDeque::from(["globex", "8", "alt+f9"]);

        app.open_settings_form();

        assert_eq!(app.dialogs.titles(), vec!["Saved", APP_TITLE]);
        assert_eq!(binder(&mut app).bound.as_deref(), Some("alt+f9"));
        assert_eq!(app.resolver.ticket_length(), 8);
    }

    #[test]
    fn quit_stops_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        assert!(!app.handle(AppEvent::MenuAction(MenuAction::Quit)));
    }
}
