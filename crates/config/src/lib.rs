//! Configuration and local persistence for Vapor applications
//!
//! Everything Vapor stores on disk is a small JSON file in the shared
//! config directory (~/.config/vapor/): the mailbox credential record,
//! optional client settings. This crate owns the directory layout and the
//! read/write/remove primitives.
//!
//! Call [`init`] at application startup to bootstrap the config directory.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Initialize the Vapor config directory.
///
/// Creates ~/.config/vapor/ if it doesn't exist.
/// Call this once at application startup.
pub fn init() -> Result<PathBuf> {
    ensure_config_dir()
}

/// Get the Vapor config directory (~/.config/vapor/)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vapor"))
}

/// Get the path to a file within the Vapor config directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|p| p.join(filename))
}

/// Load and parse a JSON file from the Vapor config directory
pub fn load_json<T: DeserializeOwned>(filename: &str) -> Result<T> {
    let path = config_path(filename).context("Could not determine config directory")?;
    load_json_file(&path)
}

/// Load and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse file: {}", path.display()))
}

/// Save a value as pretty-printed JSON to a file in the Vapor config directory
pub fn save_json<T: serde::Serialize>(filename: &str, value: &T) -> Result<()> {
    let dir = ensure_config_dir()?;
    save_json_file(&dir.join(filename), value)
}

/// Save a value as pretty-printed JSON to an arbitrary path, creating
/// parent directories as needed
pub fn save_json_file<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Remove a file from the Vapor config directory.
///
/// Removing a file that does not exist is not an error.
pub fn remove(filename: &str) -> Result<()> {
    let path = config_path(filename).context("Could not determine config directory")?;
    remove_file(&path)
}

/// Remove a file at an arbitrary path, tolerating absence
pub fn remove_file(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove file: {}", path.display())),
    }
}

/// Check if a file exists in the Vapor config directory
pub fn config_exists(filename: &str) -> bool {
    config_path(filename).is_some_and(|p| p.exists())
}

/// Ensure the Vapor config directory exists
pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir().context("Could not determine config directory")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    Ok(dir)
}
