//! # InfoScreen Storage
//!
//! Application configuration: [`AppConfig`] loaded from a JSON, YAML or TOML
//! file, picked by extension. YAML and TOML sit behind the `yaml-config` and
//! `toml-config` features.
pub mod config;
pub mod error;

pub use config::{AppConfig, ConfigFormat, NavigationConfig, WebServerConfig, WindowConfig};
pub use error::StorageSystemError;
