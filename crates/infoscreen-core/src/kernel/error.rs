//! # InfoScreen Kernel Errors
//!
//! Defines the top-level error type of the InfoScreen core.
//!
//! [`Error`] wraps the typed errors of each subsystem (plugin system,
//! storage, UI bridge) and adds the few failure modes that belong to the
//! kernel itself: lifecycle misuse, a closed shell command channel, and
//! control surfaces that cannot serve.
use std::result::Result as StdResult;

use crate::plugin_system::error::PluginSystemError;
use crate::storage::error::StorageSystemError;
use crate::ui_bridge::error::UiBridgeError;
use thiserror::Error as ThisError;

/// Custom error type for the InfoScreen application
#[derive(Debug, ThisError)]
pub enum Error {
    /// Specific, typed plugin system error
    #[error("Plugin system error: {0}")]
    PluginSystem(#[from] PluginSystemError),

    /// Specific, typed storage system error
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// UI Bridge system error
    #[error("UI Bridge system error: {0}")]
    UiBridge(#[from] UiBridgeError),

    /// Error occurring during a specific kernel lifecycle phase.
    #[error("Kernel lifecycle error during {phase:?}: {message}")]
    KernelLifecycleError {
        phase: KernelLifecyclePhase,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// The shell dropped its command receiver
    #[error("Shell command channel is closed")]
    ShellClosed,

    /// A control surface could not bind or serve
    #[error("Control surface '{surface}' failed: {source}")]
    ControlSurface {
        surface: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase in the kernel's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum KernelLifecyclePhase {
    #[error("Activate")]
    Activate,
    #[error("Run")]
    Run,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// Helper for control surface I/O failures
    pub fn control(surface: impl Into<String>, source: std::io::Error) -> Self {
        Error::ControlSurface {
            surface: surface.into(),
            source,
        }
    }
}
