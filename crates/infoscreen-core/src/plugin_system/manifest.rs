use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Describes one screen plugin as the catalog knows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Unique identifier, doubles as screen name and navigation key
    pub name: String,

    /// Identifiers that must be resolvable before the plugin may load
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Module locator resolved through the module registry
    pub module: String,

    /// Constructor to instantiate within the module
    #[serde(alias = "screen")]
    pub entry_point: String,

    /// Passed verbatim to the constructor
    #[serde(default)]
    pub params: serde_json::Value,

    /// Visual-description resource loaded in lockstep with the screen
    #[serde(default, alias = "kv")]
    pub resource: Option<PathBuf>,

    /// Disabled plugins are only listed when inactive ones are requested
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl PluginDescriptor {
    /// Create a new enabled descriptor without dependencies, params or resource
    pub fn new(name: &str, module: &str, entry_point: &str) -> Self {
        Self {
            name: name.to_string(),
            dependencies: Vec::new(),
            module: module.to_string(),
            entry_point: entry_point.to_string(),
            params: serde_json::Value::Null,
            resource: None,
            enabled: true,
        }
    }

    /// Add a dependency
    pub fn add_dependency(&mut self, dependency: &str) -> &mut Self {
        if !self.dependencies.iter().any(|d| d == dependency) {
            self.dependencies.push(dependency.to_string());
        }
        self
    }

    /// Set the constructor params
    pub fn set_params(&mut self, params: serde_json::Value) -> &mut Self {
        self.params = params;
        self
    }

    /// Set the resource locator
    pub fn set_resource(&mut self, resource: impl Into<PathBuf>) -> &mut Self {
        self.resource = Some(resource.into());
        self
    }

    /// Enable or disable the plugin
    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    /// Resource path, if any
    pub fn resource(&self) -> Option<&Path> {
        self.resource.as_deref()
    }
}

/// Builder for creating a plugin descriptor
pub struct DescriptorBuilder {
    descriptor: PluginDescriptor,
}

impl DescriptorBuilder {
    /// Create a new descriptor builder
    pub fn new(name: &str, module: &str, entry_point: &str) -> Self {
        Self {
            descriptor: PluginDescriptor::new(name, module, entry_point),
        }
    }

    /// Add a dependency
    pub fn dependency(mut self, dependency: &str) -> Self {
        self.descriptor.add_dependency(dependency);
        self
    }

    /// Set the constructor params
    pub fn params(mut self, params: serde_json::Value) -> Self {
        self.descriptor.set_params(params);
        self
    }

    /// Set the resource locator
    pub fn resource(mut self, resource: impl Into<PathBuf>) -> Self {
        self.descriptor.set_resource(resource);
        self
    }

    /// Mark the plugin as disabled
    pub fn disabled(mut self) -> Self {
        self.descriptor.set_enabled(false);
        self
    }

    /// Build the descriptor
    pub fn build(self) -> PluginDescriptor {
        self.descriptor
    }
}
