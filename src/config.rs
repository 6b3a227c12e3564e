//! User configuration
//!
//! Settings are read once at startup from a JSON file:
//! - Linux: ~/.config/image-viewer/config.json
//! - macOS: ~/Library/Application Support/image-viewer/config.json
//! - Windows: %APPDATA%\image-viewer\config.json
//!
//! Every field is optional; missing fields take their default value.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::state::library::{ScanOptions, DEFAULT_EXTENSIONS};

/// Side of the initial crop selection in image pixels
pub const DEFAULT_CROP_SIZE: u32 = 300;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory the open dialogs start in
    pub initial_dir: Option<PathBuf>,
    pub theme: ThemeChoice,
    /// File extensions picked up when browsing a directory (no leading dot)
    pub extensions: Vec<String>,
    /// Include subdirectories when opening a directory
    pub recursive: bool,
    pub window_width: f32,
    pub window_height: f32,
    /// Side of the square selection shown when the crop tool opens
    pub default_crop_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_dir: None,
            theme: ThemeChoice::Dark,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            recursive: false,
            window_width: 1024.0,
            window_height: 768.0,
            default_crop_size: DEFAULT_CROP_SIZE,
        }
    }
}

impl Config {
    /// Get the path where the config file is expected
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("image-viewer");
            path.push("config.json");
            path
        })
    }

    /// Read the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::io(path, e)),
        };

        let mut config: Config = serde_json::from_str(&json)?;
        config.normalize();
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Like `load`, but a broken file only produces a warning
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config file: {}", e);
                Self::default()
            }
        }
    }

    /// Convert to JSON string (used to show the effective settings)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            extensions: self.extensions.clone(),
            recursive: self.recursive,
        }
    }

    fn normalize(&mut self) {
        self.extensions = self
            .extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        if self.extensions.is_empty() {
            self.extensions = Self::default().extensions;
        }
        if self.default_crop_size == 0 {
            self.default_crop_size = DEFAULT_CROP_SIZE;
        }
    }
}
