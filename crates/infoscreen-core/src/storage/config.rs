use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::kernel::constants::{
    DEFAULT_API_BIND, DEFAULT_API_PORT, DEFAULT_PLUGINS_DIR, DEFAULT_WINDOW_HEIGHT,
    DEFAULT_WINDOW_WIDTH,
};
use crate::navigation::StepPolicy;
use crate::storage::error::StorageSystemError;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// Size of the kiosk window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub step_policy: StepPolicy,
    /// Advance to the next screen every `rotate_secs` seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate_secs: Option<u64>,
}

/// Remote control settings. The line protocol listens on `bind:apiport`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebServerConfig {
    pub enabled: bool,
    /// Listen address, loopback unless set
    pub bind: String,
    pub apiport: u16,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind: DEFAULT_API_BIND.to_string(),
            apiport: DEFAULT_API_PORT,
        }
    }
}

/// Application configuration. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directories scanned for screen plugins, in order
    pub plugin_dirs: Vec<PathBuf>,
    /// Extra dependency names the host declares resolvable
    pub capabilities: Vec<String>,
    pub window: WindowConfig,
    pub navigation: NavigationConfig,
    pub webserver: WebServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            plugin_dirs: vec![PathBuf::from(DEFAULT_PLUGINS_DIR)],
            capabilities: Vec::new(),
            window: WindowConfig::default(),
            navigation: NavigationConfig::default(),
            webserver: WebServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, StorageSystemError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            StorageSystemError::UnsupportedConfigFormat(
                path.extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
            )
        })?;

        if !path.exists() {
            info!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path)
            .map_err(|e| StorageSystemError::io(e, "read_config", path.to_path_buf()))?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_str(&data, format)
    }

    /// Parse configuration text
    pub fn from_str(data: &str, format: ConfigFormat) -> Result<Self, StorageSystemError> {
        match format {
            ConfigFormat::Json => serde_json::from_str(data)
                .map_err(|e| StorageSystemError::deserialization("JSON", e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data)
                .map_err(|e| StorageSystemError::deserialization("YAML", e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => {
                toml::from_str(data).map_err(|e| StorageSystemError::deserialization("TOML", e))
            }
        }
    }

    pub fn to_string(&self, format: ConfigFormat) -> Result<String, StorageSystemError> {
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| StorageSystemError::serialization("JSON", e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                serde_yaml::to_string(self).map_err(|e| StorageSystemError::serialization("YAML", e))
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| StorageSystemError::serialization("TOML", e)),
        }
    }

    /// Write to `path` in the format its extension names
    pub fn save(&self, path: &Path) -> Result<(), StorageSystemError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            StorageSystemError::UnsupportedConfigFormat(path.display().to_string())
        })?;
        let data = self.to_string(format)?;
        fs::write(path, data)
            .map_err(|e| StorageSystemError::io(e, "write_config", path.to_path_buf()))
    }
}
