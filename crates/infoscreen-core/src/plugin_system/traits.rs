use serde::de::DeserializeOwned;

use crate::shell::ShellHandle;

/// Boxed error returned by screen constructors
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Core trait that all screens must implement
pub trait Screen: Send {
    /// The name the screen was registered under
    fn name(&self) -> &str;

    /// Text content shown by the UI root
    fn render(&self) -> String;

    /// Lifecycle hook run once, right before the screen is destroyed.
    /// The default implementation does nothing.
    fn unload(&mut self) {}
}

/// Everything a screen constructor receives
#[derive(Debug, Clone)]
pub struct ScreenContext {
    /// Name from the plugin descriptor
    pub name: String,
    /// Back-reference to the host shell
    pub master: ShellHandle,
    /// Params from the plugin descriptor, untouched
    pub params: serde_json::Value,
}

impl ScreenContext {
    /// Get a param by key, `None` when missing or of the wrong type
    pub fn param<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.params
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Get a param with default
    pub fn param_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.param(key).unwrap_or(default)
    }
}
