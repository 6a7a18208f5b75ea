use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CarteiraError, Result};

/// Layout preference for rendering a client timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineLayout {
    Alternating,
    SingleSide,
}

impl Default for TimelineLayout {
    fn default() -> Self {
        TimelineLayout::Alternating
    }
}

/// User-facing application settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub timeline_layout: TimelineLayout,
}

/// Settings component with an explicit load-at-startup / persist-on-change
/// lifecycle. The file lives under the user configuration directory unless
/// an explicit path is provided.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    settings: AppSettings,
}

impl SettingsStore {
    /// Opens the settings file at the default location, creating defaults
    /// when the file does not exist yet.
    pub fn open_default() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| CarteiraError::ConfigError("diretório de configuração indisponível".into()))?;
        Self::open(base.join("carteira").join("settings.json"))
    }

    /// Opens the settings file at the provided path.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let settings = Self::read_or_default(&path)?;
        Ok(Self { path, settings })
    }

    fn read_or_default(path: &Path) -> Result<AppSettings> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(AppSettings::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Updates the layout preference and persists immediately.
    pub fn set_timeline_layout(&mut self, layout: TimelineLayout) -> Result<()> {
        self.settings.timeline_layout = layout;
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.settings)
            .map_err(|err| CarteiraError::SerializationError(err.to_string()))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
