//! Appearance settings and their JSON file.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use meddash_model::{Notice, Notifier, TracingNotifier};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{SettingsError, SettingsResult};

/// Color theme of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light colors.
    Light,
    /// Dark colors.
    Dark,
    /// Follow the operating system preference.
    #[default]
    System,
}

impl Theme {
    /// Every theme, in the order the settings page lists them.
    pub const ALL: [Theme; 3] = [Self::Light, Self::Dark, Self::System];

    /// Returns the serialized name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Maps `System` to a concrete theme given the OS preference.
    pub fn resolve(self, prefers_dark: bool) -> Theme {
        match self {
            Self::System if prefers_dark => Self::Dark,
            Self::System => Self::Light,
            concrete => concrete,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownTheme(s.to_string()))
    }
}

/// User-adjustable appearance settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Selected theme.
    #[serde(default)]
    pub theme: Theme,
}

impl Settings {
    /// Returns settings with `theme` selected.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

/// Loads and saves [`Settings`] as a JSON file.
pub struct SettingsStore {
    path: PathBuf,
    notifier: Arc<dyn Notifier>,
}

impl SettingsStore {
    /// Creates a store for the file at `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            notifier: Arc::new(TracingNotifier),
        }
    }

    /// Sets the receiver of save notices.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the settings file. A missing file yields the defaults.
    pub fn load(&self) -> SettingsResult<Settings> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => return Err(SettingsError::io_error(&self.path, e)),
        };
        let reader = BufReader::new(file);
        let settings: Settings = serde_json::from_reader(reader)
            .map_err(|e| SettingsError::Deserialization(e.to_string()))?;
        debug!(path = %self.path.display(), theme = %settings.theme, "settings loaded");
        Ok(settings)
    }

    /// Writes `settings`, creating parent directories as needed.
    pub fn save(&self, settings: &Settings) -> SettingsResult<()> {
        let result = self.write(settings);
        match &result {
            Ok(()) => {
                info!(path = %self.path.display(), theme = %settings.theme, "settings saved");
                self.notifier
                    .notify(Notice::success("Theme settings saved successfully"));
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to save settings");
                self.notifier.notify(Notice::error(err.to_string()));
            }
        }
        result
    }

    fn write(&self, settings: &Settings) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SettingsError::io_error(parent, e))?;
        }
        let file = File::create(&self.path).map_err(|e| SettingsError::io_error(&self.path, e))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, settings)
            .map_err(|e| SettingsError::Serialization(e.to_string()))?;
        Ok(())
    }
}

impl fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsStore")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_theme_default_is_system() {
        assert_eq!(Theme::default(), Theme::System);
        assert_eq!(Settings::default().theme, Theme::System);
    }

    #[test]
    fn test_theme_resolve() {
        assert_eq!(Theme::System.resolve(true), Theme::Dark);
        assert_eq!(Theme::System.resolve(false), Theme::Light);
        assert_eq!(Theme::Light.resolve(true), Theme::Light);
        assert_eq!(Theme::Dark.resolve(false), Theme::Dark);
    }

    #[test]
    fn test_theme_parse() {
        for theme in Theme::ALL {
            assert_eq!(theme.as_str().parse::<Theme>().unwrap(), theme);
        }
        assert!(matches!(
            "Dark".parse::<Theme>(),
            Err(SettingsError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_settings_json_shape() {
        let json = serde_json::to_string(&Settings::default().with_theme(Theme::Dark)).unwrap();
        assert_eq!(json, r#"{"theme":"dark"}"#);

        let empty: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Settings::default());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"theme":"sepia"}"#).unwrap();

        let err = SettingsStore::new(&path).load().unwrap_err();
        assert!(matches!(err, SettingsError::Deserialization(_)));
    }
}
