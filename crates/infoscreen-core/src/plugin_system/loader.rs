use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{error, info, warn};

use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::manifest::PluginDescriptor;
use crate::plugin_system::traits::{BoxError, Screen, ScreenContext};
use crate::shell::ShellHandle;

/// Constructor registered for one entry point
pub type ScreenConstructor =
    Arc<dyn Fn(ScreenContext) -> Result<Box<dyn Screen>, BoxError> + Send + Sync>;

/// Load failure for a single plugin. Never propagated as a fault, only reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not load screen '{plugin_name}': {error_description}")]
pub struct LoadError {
    pub plugin_name: String,
    pub error_description: String,
}

impl LoadError {
    pub fn new(plugin_name: &str, error_description: impl Into<String>) -> Self {
        Self {
            plugin_name: plugin_name.to_string(),
            error_description: error_description.into(),
        }
    }
}

impl From<LoadError> for PluginSystemError {
    fn from(err: LoadError) -> Self {
        PluginSystemError::LoadFailure {
            plugin_name: err.plugin_name,
            error_description: err.error_description,
        }
    }
}

/// Named entry points of one implementation unit
#[derive(Clone, Default)]
pub struct ScreenModule {
    entry_points: HashMap<String, ScreenConstructor>,
}

impl ScreenModule {
    /// Register (or replace) an entry point
    pub fn register_entry_point<F>(&mut self, entry_point: &str, constructor: F)
    where
        F: Fn(ScreenContext) -> Result<Box<dyn Screen>, BoxError> + Send + Sync + 'static,
    {
        self.entry_points
            .insert(entry_point.to_string(), Arc::new(constructor));
    }

    pub fn entry_point(&self, entry_point: &str) -> Option<&ScreenConstructor> {
        self.entry_points.get(entry_point)
    }

    pub fn entry_point_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entry_points.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for ScreenModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenModule")
            .field("entry_points", &self.entry_point_names())
            .finish()
    }
}

/// Build-time factory map: module locator -> entry point -> constructor.
///
/// Populated once at startup by the binary, which links every screen
/// plugin statically and calls each plugin's `register` function.
#[derive(Clone, Default, Debug)]
pub struct ModuleRegistry {
    modules: HashMap<String, ScreenModule>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor, creating the module on first use
    pub fn register<F>(&mut self, module: &str, entry_point: &str, constructor: F)
    where
        F: Fn(ScreenContext) -> Result<Box<dyn Screen>, BoxError> + Send + Sync + 'static,
    {
        self.modules
            .entry(module.to_string())
            .or_default()
            .register_entry_point(entry_point, constructor);
    }

    pub fn module(&self, locator: &str) -> Option<&ScreenModule> {
        self.modules.get(locator)
    }

    pub fn contains(&self, locator: &str) -> bool {
        self.modules.contains_key(locator)
    }

    /// Sorted module locators
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Instantiates screens from the module registry
#[derive(Debug, Clone, Default)]
pub struct ModuleLoader {
    modules: ModuleRegistry,
}

impl ModuleLoader {
    pub fn new(modules: ModuleRegistry) -> Self {
        Self { modules }
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    /// Resolve and construct the screen for `descriptor`.
    ///
    /// A missing module, a missing entry point, a constructor error and a
    /// constructor panic all come back as a [`LoadError`].
    pub fn load(&self, descriptor: &PluginDescriptor, master: &ShellHandle) -> Result<Box<dyn Screen>, LoadError> {
        let name = descriptor.name.as_str();

        let result = self.construct(descriptor, master);
        match &result {
            Ok(_) => info!("Screen: {} loaded.", name),
            Err(e) => error!("Could not import {} screen ({}). Skipping...", name, e.error_description),
        }
        result
    }

    fn construct(&self, descriptor: &PluginDescriptor, master: &ShellHandle) -> Result<Box<dyn Screen>, LoadError> {
        let name = descriptor.name.as_str();

        let module = self
            .modules
            .module(&descriptor.module)
            .ok_or_else(|| LoadError::new(name, format!("module '{}' not found", descriptor.module)))?;

        let constructor = module.entry_point(&descriptor.entry_point).ok_or_else(|| {
            LoadError::new(
                name,
                format!(
                    "entry point '{}' not found in module '{}'",
                    descriptor.entry_point, descriptor.module
                ),
            )
        })?;

        let context = ScreenContext {
            name: descriptor.name.clone(),
            master: master.clone(),
            params: descriptor.params.clone(),
        };

        // A panicking constructor must not take the shell down with it
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| constructor(context)));
        let screen = match outcome {
            Ok(Ok(screen)) => screen,
            Ok(Err(e)) => return Err(LoadError::new(name, e.to_string())),
            Err(payload) => {
                return Err(LoadError::new(
                    name,
                    format!("constructor panicked: {}", panic_message(payload.as_ref())),
                ));
            }
        };

        if screen.name() != name {
            warn!(
                "Screen constructed for '{}' reports name '{}'; registering under '{}'",
                name,
                screen.name(),
                name
            );
        }
        Ok(screen)
    }
}

/// Text of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
