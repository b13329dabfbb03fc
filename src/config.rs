//! Persistent converter settings
//!
//! Stored in ~/.config/playlist-converter/config.json. Every field is
//! optional in the file; missing fields take their defaults. CLI flags and
//! environment variables override whatever is loaded here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::convert::{ConvertOptions, MissingLocationPolicy};

/// Port used by the original upload server
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3003";

/// Default upload limit in MiB
pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;

/// Converter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Handling of tracks without a location
    pub missing_location: MissingLocationPolicy,
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Largest accepted upload, in MiB
    pub max_upload_mb: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            missing_location: MissingLocationPolicy::default(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }
}

impl Settings {
    /// Load settings from the user config directory
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("Could not determine config directory, using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Load settings from a specific file, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;

        let settings: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {:?}", path))?;

        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;

        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Get the settings file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("playlist-converter").join("config.json"))
    }

    /// Upload limit in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            missing_location: self.missing_location,
        }
    }
}
