//! Plugin configuration: extra symbol search paths.
//!
//! Search paths are merged in order: host-configured symbol path, the
//! `LINEINFO_SYMBOL_PATH` environment variable (`;`-separated), then an
//! optional JSON config file pointed at by `LINEINFO_CONFIG`. Config load
//! failures are never fatal; the plugin falls back to defaults with a
//! warning.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "LINEINFO_CONFIG";
/// Environment variable holding `;`-separated extra symbol search paths.
pub const SYMBOL_PATH_ENV: &str = "LINEINFO_SYMBOL_PATH";

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", default)]
pub struct PluginConfig {
    /// Extra directories to probe for debug-symbol files.
    pub search_paths: Vec<PathBuf>,
}

impl PluginConfig {
    /// Parse a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load the config from the process environment.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            match std::fs::read_to_string(&path) {
                Ok(text) => match Self::from_json(&text) {
                    Ok(parsed) => config = parsed,
                    Err(err) => {
                        warn!(path = %Path::new(&path).display(), %err, "ignoring malformed config file")
                    }
                },
                Err(err) => {
                    warn!(path = %Path::new(&path).display(), %err, "ignoring unreadable config file")
                }
            }
        }

        if let Ok(paths) = std::env::var(SYMBOL_PATH_ENV) {
            config
                .search_paths
                .splice(0..0, split_search_path(&paths));
        }

        config
    }

    /// Candidate symbol search paths, host-configured path first, deduped.
    pub fn merged_search_paths(&self, host_path: Option<&str>) -> Vec<PathBuf> {
        let mut merged: Vec<PathBuf> = Vec::new();
        if let Some(host_path) = host_path {
            merged.extend(split_search_path(host_path));
        }
        for path in &self.search_paths {
            if !merged.contains(path) {
                merged.push(path.clone());
            }
        }
        merged
    }
}

/// Split a `;`-separated search path, expanding `~/` prefixes and dropping
/// empty components.
fn split_search_path(raw: &str) -> Vec<PathBuf> {
    raw.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(expand_path)
        .collect()
}

/// Expand `~/` prefix to the user's home directory.
pub fn expand_path(path: &str) -> PathBuf {
    path.strip_prefix("~/")
        .and_then(|stripped| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(stripped)))
        .unwrap_or_else(|| PathBuf::from(path))
}
