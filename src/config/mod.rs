// mysqldumper/src/config/mod.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::params;

const PREFS_FILE: &str = "mysqldumper_prefs.json";

/// Last-used values persisted between runs, one flat JSON object.
///
/// The password is deliberately absent from this struct; it can never end up
/// in the serialized form because there is no field to hold it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    #[serde(default)]
    pub db_user: String,
    #[serde(default)]
    pub db_host: String,
    #[serde(default)]
    pub db_port: String,
    #[serde(default)]
    pub db_name: String,
    #[serde(default)]
    pub mysqldump_path: String,
    #[serde(default)]
    pub output_folder: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            db_user: String::from("root"),
            db_host: String::from("localhost"),
            db_port: String::new(),
            db_name: String::new(),
            mysqldump_path: String::new(),
            output_folder: String::new(),
        }
    }
}

impl Preferences {
    /// Platform config directory, falling back to the working directory when
    /// the platform reports none.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("mysqldumper").join(PREFS_FILE))
            .unwrap_or_else(|| PathBuf::from(PREFS_FILE))
    }

    /// Loads preferences from `path`. A missing file yields the defaults; a
    /// present but unreadable file is an error. A stored port that no longer
    /// parses as a positive integer is dropped rather than carried forward.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Preferences::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read preferences file at {}", path.display()))?;
        let mut prefs: Preferences = serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse preferences file at {}", path.display())
        })?;
        if params::parse_port(&prefs.db_port).is_err() {
            prefs.db_port.clear();
        }
        Ok(prefs)
    }

    /// Writes preferences to `path`, creating parent directories as needed.
    /// Called immediately before each execution attempt so a crash mid-run
    /// does not lose them.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create preferences directory {}",
                        parent.display()
                    )
                })?;
            }
        }
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize preferences")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write preferences file at {}", path.display()))
    }
}

/// Default output location: the user's desktop, matching what the front ends
/// pre-fill when no preference is stored.
pub fn default_output_dir() -> PathBuf {
    dirs::desktop_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Desktop")))
        .unwrap_or_else(|| PathBuf::from("."))
}
