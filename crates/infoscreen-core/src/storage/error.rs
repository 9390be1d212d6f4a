//! # InfoScreen Storage Errors
//!
//! [`StorageSystemError`] covers reading and parsing the application
//! configuration file.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageSystemError {
    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization to '{format}' failed: {source}")]
    SerializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Deserialization from '{format}' failed: {source}")]
    DeserializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedConfigFormat(String),
}

impl StorageSystemError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        StorageSystemError::Io {
            source,
            operation: operation.into(),
            path,
        }
    }

    pub(crate) fn serialization(
        format: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StorageSystemError::SerializationError {
            format: format.to_string(),
            source: Box::new(source),
        }
    }

    pub(crate) fn deserialization(
        format: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StorageSystemError::DeserializationError {
            format: format.to_string(),
            source: Box::new(source),
        }
    }
}
