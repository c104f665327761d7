//! # Configuration Module
//!
//! Session tuning loaded from a JSON file. Nothing is ever written back; the
//! engine keeps no state across runs.
//!
//! ## Location
//!
//! The file is looked up in the platform-standard config directory:
//! - Linux: `~/.config/playwise/config.json`
//! - macOS: `~/Library/Application Support/playwise/config.json`
//! - Windows: `%APPDATA%\playwise\config.json`
//!
//! `--config <PATH>` (or `PLAYWISE_CONFIG`) points somewhere else. A missing
//! file means defaults; a malformed one is an error.

use crate::snapshot::DEFAULT_SNAPSHOT_SIZE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the default config file path.
///
/// # Errors
///
/// Fails when the platform has no config directory.
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system config directory. \
             Pass --config to point at a file explicitly."
        )
    })?;
    Ok(config_dir.join("playwise").join("config.json"))
}

/// Tunables for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Favourites listed by `top` without an argument.
    pub top_k: usize,
    /// Entries in each list section of a snapshot.
    pub snapshot_size: usize,
    /// Plays listed by `history` without an argument.
    pub history_limit: usize,
    /// Refuse to add a track whose title and artist were already added.
    pub dedupe_on_add: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            snapshot_size: DEFAULT_SNAPSHOT_SIZE,
            history_limit: 5,
            dedupe_on_add: false,
        }
    }
}

impl SessionConfig {
    /// Reads the config at `path`, falling back to defaults if it is missing.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads from `explicit` when given, otherwise from the default location.
    ///
    /// # Errors
    ///
    /// See [`SessionConfig::load_from`] and [`get_config_path`].
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&get_config_path()?),
        }
    }
}
