use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, info};

use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::loader::panic_message;
use crate::plugin_system::traits::Screen;

/// Registry owning every live screen instance
#[derive(Default)]
pub struct ScreenRegistry {
    /// Active screen names in activation order
    order: Vec<String>,
    /// Live instances keyed by screen name
    screens: HashMap<String, Box<dyn Screen>>,
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a screen and append it to the active ordering
    pub fn register(&mut self, name: &str, instance: Box<dyn Screen>) -> Result<(), PluginSystemError> {
        if self.screens.contains_key(name) {
            return Err(PluginSystemError::DuplicateScreen(name.to_string()));
        }
        self.screens.insert(name.to_string(), instance);
        self.order.push(name.to_string());
        debug!("Registered screen '{}' ({} active)", name, self.order.len());
        Ok(())
    }

    /// Run the screen's unload hook and drop it. Returns `false` if the
    /// name was not registered. A panicking hook is logged; the screen is
    /// dropped either way.
    pub fn unregister(&mut self, name: &str) -> bool {
        let Some(mut instance) = self.screens.remove(name) else {
            return false;
        };
        // Drop every occurrence, duplicates included
        self.order.retain(|n| n != name);

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| instance.unload())) {
            error!(
                "Screen '{}' panicked while unloading: {}",
                name,
                panic_message(payload.as_ref())
            );
        }
        info!("Screen: {} unloaded.", name);
        true
    }

    pub fn get(&self, name: &str) -> Option<&dyn Screen> {
        self.screens.get(name).map(|screen| screen.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.screens.contains_key(name)
    }

    /// Active names in activation order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}

impl fmt::Debug for ScreenRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenRegistry")
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}
