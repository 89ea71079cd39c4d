use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::hotkey::parse_hotkey;

pub const CONFIG_ENV_VAR: &str = "SERVICENOW_HELPER_CONFIG";
pub const MIN_TICKET_LENGTH: u32 = 7;
pub const MAX_TICKET_LENGTH: u32 = 10;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    #[serde(rename = "CompanyName", default = "default_company_name")]
    pub company_name: String,
    #[serde(rename = "TicketLength", default = "default_ticket_length")]
    pub ticket_length: u32,
    #[serde(
        rename = "NeverAskAgain",
        default = "default_never_ask_again",
        with = "flag"
    )]
    pub never_ask_again: bool,
    #[serde(rename = "Hotkey", default = "default_hotkey")]
    pub hotkey: String,
}

/// On-disk layout: a single `[Settings]` section.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
struct SettingsFile {
    #[serde(rename = "Settings", default)]
    settings: Settings,
}

fn default_company_name() -> String {
    "mycompany".to_string()
}

fn default_ticket_length() -> u32 {
    7
}

fn default_never_ask_again() -> bool {
    false
}

fn default_hotkey() -> String {
    "ctrl+shift+o".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            ticket_length: default_ticket_length(),
            never_ask_again: default_never_ask_again(),
            hotkey: default_hotkey(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.company_name.trim().is_empty() {
            return Err(AppError::InvalidSettings(
                "Company name must not be empty.".to_string(),
            ));
        }
        validate_ticket_length(self.ticket_length)?;
        parse_hotkey(&self.hotkey)?;
        Ok(())
    }
}

pub fn validate_ticket_length(length: u32) -> Result<(), AppError> {
    if (MIN_TICKET_LENGTH..=MAX_TICKET_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(AppError::InvalidSettings(format!(
            "Ticket length must be between {}-{}.",
            MIN_TICKET_LENGTH, MAX_TICKET_LENGTH
        )))
    }
}

/// Parses the ticket-length field of the settings form.
pub fn parse_ticket_length(raw: &str) -> Result<u32, AppError> {
    let length = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| AppError::InvalidSettings("Ticket length must be a number.".to_string()))?;
    validate_ticket_length(length)?;
    Ok(length)
}

// `NeverAskAgain` is stored as 0/1; `true`/`false` are accepted on read.
mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Bool(bool),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(i64::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(v) => v != 0,
            Raw::Bool(v) => v,
        })
    }
}

pub fn get_settings_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("servicenow-helper")
        .join("settings.toml")
}

/// Flat-file settings persistence.
#[derive(Clone, Debug)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file, writing defaults first when it does not exist.
    /// Missing keys fall back to their defaults.
    pub fn load(&self) -> Result<Settings, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(toml::from_str::<SettingsFile>(&content)?.settings),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let settings = Settings::default();
                self.write(&settings)?;
                Ok(settings)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`load`](Self::load) but rejects out-of-range values.
    pub fn load_validated(&self) -> Result<Settings, AppError> {
        let settings = self.load()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects invalid settings without touching the file.
    pub fn save(&self, settings: &Settings) -> Result<(), AppError> {
        settings.validate()?;
        self.write(settings)
    }

    /// Deletes the backing file. A missing file is not an error.
    pub fn reset(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, settings: &Settings) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let file = SettingsFile {
            settings: settings.clone(),
        };
        let content = toml::to_string_pretty(&file)?;
        fs::write(&self.path, content)?;
        log::debug!("Settings written to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::IdentifierResolver;
    use crate::record::RecordType;

    fn store_in(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("nested").join("settings.toml"))
    }

    #[test]
    fn load_creates_defaults_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let settings = store.load().unwrap();
        assert_eq!(settings, Settings::default());
        assert!(store.path().exists());

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("[Settings]"));
        assert!(content.contains("CompanyName = \"mycompany\""));
        assert!(content.contains("NeverAskAgain = 0"));
        assert!(content.contains("TicketLength = 7"));
        assert!(content.contains("Hotkey = \"ctrl+shift+o\""));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let settings = Settings {
            company_name: "acme".into(),
            ticket_length: 9,
            never_ask_again: true,
            hotkey: "alt+shift+k".into(),
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("NeverAskAgain = 1"));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            "[Settings]\nCompanyName = \"globex\"\nNeverAskAgain = true\n",
        )
        .unwrap();
        let settings = store.load().unwrap();
        assert_eq!(settings.company_name, "globex");
        assert!(settings.never_ask_again);
        assert_eq!(settings.ticket_length, 7);
        assert_eq!(settings.hotkey, "ctrl+shift+o");
    }

    #[test]
    fn saving_out_of_range_ticket_length_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let original = store.load().unwrap();

        let mut bad = original.clone();
        bad.ticket_length = 11;
        let err = store.save(&bad).unwrap_err();
        assert!(matches!(err, AppError::InvalidSettings(_)));
        assert_eq!(store.load().unwrap(), original);
    }

    #[test]
    fn load_validated_rejects_hand_edited_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "[Settings]\nTicketLength = 3\n").unwrap();
        assert!(store.load().is_ok());
        assert!(matches!(
            store.load_validated(),
            Err(AppError::InvalidSettings(_))
        ));

        fs::write(store.path(), "[Settings]\nTicketLength = \"seven\"\n").unwrap();
        assert!(matches!(store.load(), Err(AppError::SettingsParse(_))));
    }

    #[test]
    fn reset_deletes_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.load().unwrap();
        store.reset().unwrap();
        assert!(!store.path().exists());
        store.reset().unwrap();
    }

    #[test]
    fn ticket_length_change_applies_after_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let settings = store.load().unwrap();
        let resolver = IdentifierResolver::new(settings.ticket_length).unwrap();
        assert!(resolver.resolve(RecordType::Incident, "INC0000042").is_some());

        store
            .save(&Settings {
                ticket_length: 8,
                ..settings
            })
            .unwrap();
        let reloaded = store.load_validated().unwrap();
        let resolver = IdentifierResolver::new(reloaded.ticket_length).unwrap();
        assert!(resolver.resolve(RecordType::Incident, "INC0000042").is_none());
        assert_eq!(
            resolver
                .resolve(RecordType::Incident, "42")
                .unwrap()
                .to_string(),
            "INC00000042"
        );
    }

    #[test]
    fn parses_form_ticket_length() {
        assert_eq!(parse_ticket_length(" 8 ").unwrap(), 8);
        let err = parse_ticket_length("eight").unwrap_err();
        assert_eq!(err.to_string(), "Ticket length must be a number.");
        let err = parse_ticket_length("11").unwrap_err();
        assert_eq!(err.to_string(), "Ticket length must be between 7-10.");
    }

    #[test]
    fn blank_company_name_is_invalid() {
        let settings = Settings {
            company_name: "  ".into(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(AppError::InvalidSettings(_))
        ));
    }
}
