// Engine configuration
// Stored as RON by default; `.json` files are read and written as JSON.

use crate::error::{MetronomeError, MetronomeResult};
use crate::sequencer::{Tempo, TimeSignature};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "practice-metronome";
const CONFIG_FILE: &str = "config.ron";

/// Count-in defaults applied when playback is assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CountInSettings {
    pub enabled: bool,
    /// Number of count-in bars
    pub length: u32,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub count_in: CountInSettings,
    /// Time signature given to newly added bars
    pub default_time_signature: TimeSignature,
    /// Tempo given to newly added bars
    pub default_tempo: Tempo,
    /// Capacity of the playback notification channel
    pub notification_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            count_in: CountInSettings::default(),
            default_time_signature: TimeSignature::default(),
            default_tempo: Tempo::default(),
            notification_capacity: 256,
        }
    }
}

impl EngineConfig {
    pub fn from_ron_str(ron_data: &str) -> MetronomeResult<Self> {
        ron::from_str(ron_data).map_err(|e| {
            MetronomeError::ConfigFormat(format!("Failed to parse RON config: {}", e))
        })
    }

    pub fn to_ron_string(&self) -> MetronomeResult<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).map_err(|e| {
            MetronomeError::ConfigFormat(format!("Failed to serialize config to RON: {}", e))
        })
    }

    pub fn from_json_str(json_data: &str) -> MetronomeResult<Self> {
        serde_json::from_str(json_data).map_err(|e| {
            MetronomeError::ConfigFormat(format!("Failed to parse JSON config: {}", e))
        })
    }

    pub fn to_json_string(&self) -> MetronomeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            MetronomeError::ConfigFormat(format!("Failed to serialize config to JSON: {}", e))
        })
    }

    /// Load from `path`, choosing the format from the file extension
    pub fn load(path: &Path) -> MetronomeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        if is_json(path) {
            Self::from_json_str(&content)
        } else {
            Self::from_ron_str(&content)
        }
    }

    /// Save to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> MetronomeResult<()> {
        let content = if is_json(path) {
            self.to_json_string()?
        } else {
            self.to_ron_string()?
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `<platform config dir>/practice-metronome/config.ron`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default path, falling back to defaults when the file is
    /// missing or unreadable
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
