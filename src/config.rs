//! Project configuration.
//!
//! Settings live in a `.lokeyrc.json` at the project root (found by
//! walking up from the working directory to the repository root). Missing
//! fields fall back to defaults, so a partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".lokeyrc.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Master switch; when false every operation is a silent no-op.
    pub enabled: bool,
    /// Explicit resource module path, relative to the project root.
    /// Empty disables the explicit candidate.
    pub locale_path: String,
    /// Also probe conventional locale locations.
    pub auto_detect: bool,
    /// Lookup-expression prefixes recognized by the scanner.
    pub key_prefixes: Vec<String>,
    /// Markup attribute names whose values are scanned for keys.
    pub attribute_names: Vec<String>,
    /// File name suffixes identifying resource modules.
    pub resource_file_names: Vec<String>,
    /// Annotation debounce window in milliseconds.
    pub debounce_ms: u64,
    /// Buffers larger than this many bytes are never scanned.
    pub max_buffer_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            locale_path: default_locale_path(),
            auto_detect: default_auto_detect(),
            key_prefixes: default_key_prefixes(),
            attribute_names: default_attribute_names(),
            resource_file_names: default_resource_file_names(),
            debounce_ms: default_debounce_ms(),
            max_buffer_bytes: default_max_buffer_bytes(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_locale_path() -> String {
    "app/iframe/locale/zh.js".to_string()
}

fn default_auto_detect() -> bool {
    true
}

fn default_key_prefixes() -> Vec<String> {
    vec!["R".to_string(), "_t.R".to_string(), "LanData.R".to_string()]
}

fn default_attribute_names() -> Vec<String> {
    vec!["data-i18n".to_string(), "i18n-key".to_string()]
}

fn default_resource_file_names() -> Vec<String> {
    vec![
        "zh.js".to_string(),
        "zh_cn.js".to_string(),
        "locale.js".to_string(),
    ]
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_max_buffer_bytes() -> usize {
    100_000
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.key_prefixes.iter().any(|p| p.trim().is_empty()) {
            bail!("keyPrefixes must not contain empty entries");
        }
        if self.attribute_names.iter().any(|a| a.trim().is_empty()) {
            bail!("attributeNames must not contain empty entries");
        }
        if self.max_buffer_bytes == 0 {
            bail!("maxBufferBytes must be greater than zero");
        }
        Ok(())
    }
}

/// The default configuration serialized as pretty JSON, for `init`.
pub fn default_config_json() -> String {
    // Serializing a plain struct of owned fields cannot fail.
    serde_json::to_string_pretty(&Config::default()).unwrap_or_default()
}

/// Walk up from `start` looking for the config file, stopping at the
/// repository root (a directory containing `.git`) or the filesystem root.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").exists() {
            return None;
        }
        dir = dir.parent()?;
    }
}

#[derive(Debug)]
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the file the config came from, if any.
    pub from_file: Option<PathBuf>,
}

/// Load the configuration for a project rooted at or above `start`.
/// No file means defaults; a malformed or invalid file is an error.
pub fn load_config(start: &Path) -> Result<ConfigLoadResult> {
    let Some(path) = find_config_file(start) else {
        return Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: None,
        });
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;

    Ok(ConfigLoadResult {
        config,
        from_file: Some(path),
    })
}
