use std::collections::HashSet;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use log::error;

use crate::plugin_system::manifest::PluginDescriptor;

/// Resolution probe for a single dependency identifier
pub trait DependencyProbe: Send + Sync {
    /// Whether `dependency` is available in the current environment
    fn resolve(&self, dependency: &str) -> bool;
}

impl<F> DependencyProbe for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn resolve(&self, dependency: &str) -> bool {
        self(dependency)
    }
}

/// Resolves names the host declares as available
#[derive(Debug, Clone, Default)]
pub struct CapabilityProbe {
    capabilities: HashSet<String>,
}

impl CapabilityProbe {
    pub fn new<I, S>(capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            capabilities: capabilities.into_iter().map(Into::into).collect(),
        }
    }

    pub fn insert(&mut self, capability: impl Into<String>) {
        self.capabilities.insert(capability.into());
    }
}

impl DependencyProbe for CapabilityProbe {
    fn resolve(&self, dependency: &str) -> bool {
        self.capabilities.contains(dependency)
    }
}

/// Resolves a dependency as an executable, either a path or a name on `PATH`
#[derive(Debug, Clone)]
pub struct ExecutableProbe {
    search_path: Vec<PathBuf>,
}

impl ExecutableProbe {
    pub fn new(search_path: Vec<PathBuf>) -> Self {
        Self { search_path }
    }

    /// Probe using the process `PATH`
    pub fn from_env() -> Self {
        let search_path = env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();
        Self { search_path }
    }
}

impl DependencyProbe for ExecutableProbe {
    fn resolve(&self, dependency: &str) -> bool {
        if dependency.is_empty() {
            return false;
        }
        let candidate = Path::new(dependency);
        if candidate.components().count() > 1 {
            return is_executable(candidate);
        }
        self.search_path.iter().any(|dir| is_executable(&dir.join(dependency)))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Resolves if any wrapped probe does
#[derive(Default)]
pub struct AnyProbe {
    probes: Vec<Box<dyn DependencyProbe>>,
}

impl AnyProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, probe: impl DependencyProbe + 'static) -> Self {
        self.probes.push(Box::new(probe));
        self
    }
}

impl DependencyProbe for AnyProbe {
    fn resolve(&self, dependency: &str) -> bool {
        self.probes.iter().any(|probe| probe.resolve(dependency))
    }
}

/// Verdict for one descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub ok: bool,
    /// Every unresolved dependency, in declaration order
    pub unresolved: Vec<String>,
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ok {
            write!(f, "ok")
        } else {
            write!(f, "unresolved: {}", self.unresolved.join(", "))
        }
    }
}

/// Flat existence check of a descriptor's dependencies
pub struct DependencyValidator {
    probe: Box<dyn DependencyProbe>,
}

impl DependencyValidator {
    pub fn new(probe: impl DependencyProbe + 'static) -> Self {
        Self {
            probe: Box::new(probe),
        }
    }

    /// Probe every dependency, without stopping at the first miss
    pub fn validate(&self, descriptor: &PluginDescriptor) -> ValidationResult {
        let unresolved: Vec<String> = descriptor
            .dependencies
            .iter()
            .filter(|dependency| !self.probe.resolve(dependency))
            .cloned()
            .collect();

        if !unresolved.is_empty() {
            error!(
                "Unmet dependencies for {} screen ({}). Skipping...",
                descriptor.name,
                unresolved.join(", ")
            );
        }

        ValidationResult {
            ok: unresolved.is_empty(),
            unresolved,
        }
    }
}

impl Default for DependencyValidator {
    /// Nothing beyond an empty dependency list resolves
    fn default() -> Self {
        Self::new(CapabilityProbe::default())
    }
}

impl fmt::Debug for DependencyValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyValidator").finish_non_exhaustive()
    }
}
