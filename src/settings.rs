//! Persisted user settings.
//!
//! Settings live in a flat JSON key/value file at a platform-specific
//! user-data location. A missing file is replaced by one holding the
//! documented defaults; a present file is read key by key, and every
//! missing or wrong-typed key falls back to its default independently of
//! the others.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::error::TrellisError;

/// Flat user settings, as stored in `settings.json`.
///
/// `line_style` selects the connector rendering: 0 draws curved connectors,
/// 1 draws straight lines with arrowheads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub line_style: i64,
    pub theme_style: i64,
    pub is_show_grid: bool,
    pub is_show_debug_text: bool,
    pub is_enable_node_collision: bool,
    pub camera_scale_exponent: f64,
    pub camera_move_amplitude: i64,
    pub camera_move_friction: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            line_style: 0,
            theme_style: 0,
            is_show_grid: true,
            is_show_debug_text: true,
            is_enable_node_collision: true,
            camera_scale_exponent: 1.1,
            camera_move_amplitude: 2,
            camera_move_friction: 0.1,
        }
    }
}

impl Settings {
    /// Loads settings from the given file.
    ///
    /// A missing or empty file yields the defaults; the missing file is
    /// created so the user has something to edit. Individual keys that are
    /// absent or hold a value of the wrong type fall back to their default
    /// without affecting the other keys.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TrellisError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = path.display().to_string(); "Settings file missing, writing defaults");
            let settings = Self::default();
            settings.save(path)?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(&content)?;
        Ok(Self::from_value(&value))
    }

    /// Extracts settings from a parsed JSON document, key by key
    fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        Self {
            line_style: value
                .get("line_style")
                .and_then(Value::as_i64)
                .unwrap_or(defaults.line_style),
            theme_style: value
                .get("theme_style")
                .and_then(Value::as_i64)
                .unwrap_or(defaults.theme_style),
            is_show_grid: value
                .get("is_show_grid")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.is_show_grid),
            is_show_debug_text: value
                .get("is_show_debug_text")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.is_show_debug_text),
            is_enable_node_collision: value
                .get("is_enable_node_collision")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.is_enable_node_collision),
            camera_scale_exponent: value
                .get("camera_scale_exponent")
                .and_then(Value::as_f64)
                .unwrap_or(defaults.camera_scale_exponent),
            camera_move_amplitude: value
                .get("camera_move_amplitude")
                .and_then(Value::as_i64)
                .unwrap_or(defaults.camera_move_amplitude),
            camera_move_friction: value
                .get("camera_move_friction")
                .and_then(Value::as_f64)
                .unwrap_or(defaults.camera_move_friction),
        }
    }

    /// Saves the settings to the given file, overwriting it as a whole
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TrellisError> {
        let path = path.as_ref();
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)?,
            _ => {}
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the platform-specific settings file location, if one can be
    /// determined for this user
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "trellis", "trellis")
            .map(|dirs| dirs.data_dir().join("settings.json"))
    }
}
