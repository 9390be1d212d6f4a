//! # InfoScreen Plugin System Errors
//!
//! Defines error types specific to the InfoScreen plugin system.
//!
//! [`PluginSystemError`] covers the per-plugin failures of an activation
//! (unmet dependencies, load failures), the defensive registry errors
//! (duplicate screens, unknown screens) and catalog problems while reading
//! plugin manifests from disk.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PluginSystemError {
    #[error("Unmet dependencies for screen '{plugin_name}': {}", .unresolved.join(", "))]
    DependencyFailure {
        plugin_name: String,
        unresolved: Vec<String>,
    },

    #[error("Could not load screen '{plugin_name}': {error_description}")]
    LoadFailure {
        plugin_name: String,
        error_description: String,
    },

    #[error("Screen already registered: {0}")]
    DuplicateScreen(String),

    #[error("Screen not found: {0}")]
    ScreenNotFound(String),

    #[error("Plugin manifest error for '{path}': {message}")]
    ManifestError {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Plugin catalog I/O error during '{operation}' on '{path}': {source}")]
    CatalogIo {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

impl PluginSystemError {
    pub fn catalog_io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        PluginSystemError::CatalogIo {
            path,
            operation: operation.into(),
            source,
        }
    }
}
