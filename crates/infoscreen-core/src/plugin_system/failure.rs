use std::fmt;

use crate::kernel::constants::FAILED_SCREEN_NAME;
use crate::plugin_system::loader::LoadError;
use crate::plugin_system::traits::Screen;

/// A single plugin that failed to activate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureRecord {
    DependencyFailure {
        plugin_name: String,
        unresolved: Vec<String>,
    },
    LoadFailure {
        plugin_name: String,
        error_description: String,
    },
}

impl FailureRecord {
    pub fn dependency(plugin_name: &str, unresolved: Vec<String>) -> Self {
        FailureRecord::DependencyFailure {
            plugin_name: plugin_name.to_string(),
            unresolved,
        }
    }

    pub fn load(plugin_name: &str, error_description: impl Into<String>) -> Self {
        FailureRecord::LoadFailure {
            plugin_name: plugin_name.to_string(),
            error_description: error_description.into(),
        }
    }

    pub fn plugin_name(&self) -> &str {
        match self {
            FailureRecord::DependencyFailure { plugin_name, .. } => plugin_name,
            FailureRecord::LoadFailure { plugin_name, .. } => plugin_name,
        }
    }

    pub fn is_dependency_failure(&self) -> bool {
        matches!(self, FailureRecord::DependencyFailure { .. })
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureRecord::DependencyFailure { plugin_name, unresolved } => {
                write!(f, "{}: missing {}", plugin_name, unresolved.join(", "))
            }
            FailureRecord::LoadFailure { plugin_name, error_description } => {
                write!(f, "{}: {}", plugin_name, error_description)
            }
        }
    }
}

impl From<LoadError> for FailureRecord {
    fn from(err: LoadError) -> Self {
        FailureRecord::LoadFailure {
            plugin_name: err.plugin_name,
            error_description: err.error_description,
        }
    }
}

/// Collects the failures of one activation pass
#[derive(Debug, Clone, Default)]
pub struct FailureReporter {
    dependency_failures: Vec<FailureRecord>,
    load_failures: Vec<FailureRecord>,
}

impl FailureReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: FailureRecord) {
        if record.is_dependency_failure() {
            self.dependency_failures.push(record);
        } else {
            self.load_failures.push(record);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dependency_failures.is_empty() && self.load_failures.is_empty()
    }

    pub fn dependency_failures(&self) -> &[FailureRecord] {
        &self.dependency_failures
    }

    pub fn load_failures(&self) -> &[FailureRecord] {
        &self.load_failures
    }

    /// Dependency failures first, then load failures
    pub fn records(&self) -> Vec<FailureRecord> {
        self.dependency_failures
            .iter()
            .chain(self.load_failures.iter())
            .cloned()
            .collect()
    }

    /// Consume the reporter; `None` when nothing failed
    pub fn into_screen(self) -> Option<FailedScreen> {
        if self.is_empty() {
            return None;
        }
        Some(FailedScreen {
            name: FAILED_SCREEN_NAME.to_string(),
            dependency_failures: self.dependency_failures,
            load_failures: self.load_failures,
        })
    }
}

/// Synthetic screen summarising an activation pass's failures
#[derive(Debug, Clone)]
pub struct FailedScreen {
    name: String,
    dependency_failures: Vec<FailureRecord>,
    load_failures: Vec<FailureRecord>,
}

impl FailedScreen {
    pub fn dependency_failures(&self) -> &[FailureRecord] {
        &self.dependency_failures
    }

    pub fn load_failures(&self) -> &[FailureRecord] {
        &self.load_failures
    }
}

impl Screen for FailedScreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self) -> String {
        let mut lines = vec!["Some screens could not be loaded.".to_string()];
        if !self.dependency_failures.is_empty() {
            lines.push(String::new());
            lines.push("Unmet dependencies:".to_string());
            lines.extend(self.dependency_failures.iter().map(|r| format!("  {}", r)));
        }
        if !self.load_failures.is_empty() {
            lines.push(String::new());
            lines.push("Load errors:".to_string());
            lines.extend(self.load_failures.iter().map(|r| format!("  {}", r)));
        }
        lines.join("\n")
    }
}
