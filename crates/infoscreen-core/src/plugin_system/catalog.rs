use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

use crate::kernel::constants;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::manifest::PluginDescriptor;

/// Source of plugin descriptors, re-queryable at any time
pub trait PluginCatalog: Send {
    /// List descriptors in activation order. Disabled plugins are only
    /// included when `include_inactive` is set.
    fn plugins(&self, include_inactive: bool) -> Result<Vec<PluginDescriptor>, PluginSystemError>;

    /// Find one descriptor by name
    fn find(&self, name: &str, include_inactive: bool) -> Result<Option<PluginDescriptor>, PluginSystemError> {
        Ok(self
            .plugins(include_inactive)?
            .into_iter()
            .find(|descriptor| descriptor.name == name))
    }
}

/// In-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    descriptors: Vec<PluginDescriptor>,
}

impl StaticCatalog {
    pub fn new(descriptors: Vec<PluginDescriptor>) -> Self {
        Self { descriptors }
    }

    pub fn push(&mut self, descriptor: PluginDescriptor) {
        self.descriptors.push(descriptor);
    }
}

impl PluginCatalog for StaticCatalog {
    fn plugins(&self, include_inactive: bool) -> Result<Vec<PluginDescriptor>, PluginSystemError> {
        Ok(self
            .descriptors
            .iter()
            .filter(|descriptor| include_inactive || descriptor.enabled)
            .cloned()
            .collect())
    }
}

// --- Intermediate struct for deserialization ---

#[derive(Deserialize, Debug)]
struct RawScreenManifest {
    name: String,
    #[serde(default)]
    module: Option<String>,
    #[serde(alias = "screen")]
    entry_point: String,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    params: serde_json::Value,
    #[serde(default, alias = "kv")]
    resource: Option<PathBuf>,
    #[serde(default)]
    enabled: Option<bool>,
}

/// Catalog reading `screen.json` manifests from plugin directories.
///
/// Every immediate sub-directory of a configured root that contains a
/// manifest yields one descriptor. The module locator defaults to the
/// directory name and relative resource paths are resolved against the
/// plugin directory.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    roots: Vec<PathBuf>,
}

impl DirectoryCatalog {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Parse the manifest of a single plugin directory
    pub fn parse_manifest(plugin_dir: &Path) -> Result<PluginDescriptor, PluginSystemError> {
        let manifest_path = plugin_dir.join(constants::MANIFEST_FILE_NAME);
        let content = fs::read_to_string(&manifest_path)
            .map_err(|e| PluginSystemError::catalog_io(e, "read manifest", manifest_path.clone()))?;

        let raw: RawScreenManifest =
            serde_json::from_str(&content).map_err(|e| PluginSystemError::ManifestError {
                path: manifest_path.clone(),
                message: "Failed to parse screen manifest".to_string(),
                source: Some(Box::new(e)),
            })?;

        if raw.name.trim().is_empty() {
            return Err(PluginSystemError::ManifestError {
                path: manifest_path,
                message: "Screen name must not be empty".to_string(),
                source: None,
            });
        }

        let module = match raw.module {
            Some(module) => module,
            None => plugin_dir
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .ok_or_else(|| PluginSystemError::ManifestError {
                    path: manifest_path.clone(),
                    message: "Cannot derive module locator from directory name".to_string(),
                    source: None,
                })?,
        };

        // Relative resources live next to the manifest
        let resource = raw.resource.map(|path| {
            if path.is_absolute() {
                path
            } else {
                plugin_dir.join(path)
            }
        });

        Ok(PluginDescriptor {
            name: raw.name,
            dependencies: raw.dependencies,
            module,
            entry_point: raw.entry_point,
            params: raw.params,
            resource,
            enabled: raw.enabled.unwrap_or(true),
        })
    }

    fn scan_root(&self, root: &Path, found: &mut Vec<PluginDescriptor>) -> Result<(), PluginSystemError> {
        if !root.is_dir() {
            warn!("Plugin directory {} does not exist, skipping", root.display());
            return Ok(());
        }

        let entries = fs::read_dir(root)
            .map_err(|e| PluginSystemError::catalog_io(e, "read plugin directory", root.to_path_buf()))?;

        let mut plugin_dirs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.join(constants::MANIFEST_FILE_NAME).is_file())
            .collect();
        // Stable activation order regardless of filesystem ordering
        plugin_dirs.sort();

        for dir in plugin_dirs {
            match Self::parse_manifest(&dir) {
                Ok(descriptor) => {
                    debug!("Found screen plugin '{}' in {}", descriptor.name, dir.display());
                    found.push(descriptor);
                }
                Err(e) => warn!("Skipping plugin in {}: {}", dir.display(), e),
            }
        }
        Ok(())
    }
}

impl PluginCatalog for DirectoryCatalog {
    fn plugins(&self, include_inactive: bool) -> Result<Vec<PluginDescriptor>, PluginSystemError> {
        let mut found = Vec::new();
        for root in &self.roots {
            self.scan_root(root, &mut found)?;
        }
        Ok(found
            .into_iter()
            .filter(|descriptor| include_inactive || descriptor.enabled)
            .collect())
    }
}
