use thiserror::Error;

use crate::model::FeedbackSeverity;
use crate::record::RecordType;

/// Everything that can end an invocation early.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Operation canceled.")]
    UserCancelled,

    #[error("Invalid input for {record_type}!")]
    InvalidInput { record_type: RecordType },

    #[error("{0}")]
    InvalidSettings(String),

    #[error("Unsupported lookup type: {0}")]
    UnsupportedLookupType(String),

    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    SettingsSerialize(#[from] toml::ser::Error),

    #[error("failed to compile identifier pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("hotkey error: {0}")]
    Hotkey(String),

    #[error("failed to open browser: {0}")]
    Browser(String),
}

impl AppError {
    pub fn severity(&self) -> FeedbackSeverity {
        match self {
            Self::UserCancelled => FeedbackSeverity::Info,
            Self::InvalidInput { .. }
            | Self::InvalidSettings(_)
            | Self::UnsupportedLookupType(_)
            | Self::SettingsParse(_)
            | Self::Hotkey(_) => FeedbackSeverity::Warning,
            Self::Io(_) | Self::SettingsSerialize(_) | Self::Pattern(_) | Self::Browser(_) => {
                FeedbackSeverity::Error
            }
        }
    }

    /// Dialog title used when the error is surfaced to the user.
    pub fn title(&self) -> &'static str {
        match self {
            Self::UserCancelled => "Canceled",
            Self::InvalidInput { .. } | Self::InvalidSettings(_) => "Invalid",
            Self::UnsupportedLookupType(_) => "Unsupported",
            Self::Hotkey(_) => "Hotkey",
            _ => "Error",
        }
    }
}
