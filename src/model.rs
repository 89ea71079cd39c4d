/// Everything the background threads and the tray may post to the UI thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    /// Hotkey pressed: show the ticket interface.
    OpenInterface,
    /// The settings file was modified on disk.
    SettingsFileChanged,
    MenuAction(MenuAction),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Reload,
    ResetSettings,
    Quit,
}

/// Outcome of the last action, shown in the tray tooltip and in dialogs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub severity: FeedbackSeverity,
}

impl Feedback {
    pub fn new(message: String, severity: FeedbackSeverity) -> Self {
        Self { message, severity }
    }

    pub fn info(message: String) -> Self {
        Self::new(message, FeedbackSeverity::Info)
    }

    pub fn warning(message: String) -> Self {
        Self::new(message, FeedbackSeverity::Warning)
    }

    pub fn error(message: String) -> Self {
        Self::new(message, FeedbackSeverity::Error)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackSeverity {
    Info,
    Warning,
    Error,
}
