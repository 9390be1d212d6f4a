//! # InfoScreen UI Bridge Errors
//!
//! Defines error types for the boundary between the core and the UI layer:
//! the screen container (UI root) and the resource system that loads each
//! plugin's visual description.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiBridgeError {
    #[error("Resource not loaded: {0}")]
    ResourceNotFound(PathBuf),

    #[error("Failed to load resource '{path}': {source}")]
    ResourceLoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to acquire lock for '{entity}' during operation '{operation}'")]
    LockError {
        entity: String,
        operation: String,
    },
}

impl UiBridgeError {
    /// Whether the error only says the resource was never loaded
    pub fn is_not_found(&self) -> bool {
        matches!(self, UiBridgeError::ResourceNotFound(_))
    }
}
