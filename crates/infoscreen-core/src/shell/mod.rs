//! # InfoScreen Shell
//!
//! [`InfoScreen`] is the host shell: it owns the screen registry and the
//! navigation state, runs the activation pipeline
//! (validate → load → register) for the bulk pass and for incremental
//! `add_screen`/`remove_screen` calls, and mirrors every change onto the
//! UI root and the resource system.
//!
//! All mutation goes through `&mut InfoScreen`. Screens and control
//! surfaces reach the shell through a [`ShellHandle`], whose queued
//! commands are applied by [`InfoScreen::process_pending`] or
//! [`InfoScreen::next_command`] + [`InfoScreen::execute`].
pub mod handle;

pub use handle::{ShellCommand, ShellHandle};

use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, info, warn};
use tokio::sync::mpsc;

use crate::kernel::constants::FAILED_SCREEN_NAME;
use crate::kernel::error::Result;
use crate::navigation::{NavigationController, StepPolicy};
use crate::plugin_system::catalog::PluginCatalog;
use crate::plugin_system::dependency::DependencyValidator;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::failure::{FailureRecord, FailureReporter};
use crate::plugin_system::loader::{ModuleLoader, panic_message};
use crate::plugin_system::manifest::PluginDescriptor;
use crate::plugin_system::registry::ScreenRegistry;
use crate::ui_bridge::{HeadlessContainer, ResourceLoader, ScreenContainer, TrackingResourceLoader};

/// Outcome of an activation pass or of a single `add_screen`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationReport {
    /// Screens registered, in activation order
    pub activated: Vec<String>,
    /// Descriptors skipped because the name was already active
    pub skipped: Vec<String>,
    /// Dependency failures first, then load failures
    pub failures: Vec<FailureRecord>,
}

impl ActivationReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn dependency_failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.failures.iter().filter(|f| f.is_dependency_failure())
    }

    pub fn load_failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.failures.iter().filter(|f| !f.is_dependency_failure())
    }
}

/// Whether the shell should keep running after draining its queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellStatus {
    Running,
    Shutdown,
}

/// Builder for an [`InfoScreen`]
pub struct InfoScreenBuilder {
    catalog: Box<dyn PluginCatalog>,
    loader: ModuleLoader,
    validator: DependencyValidator,
    container: Box<dyn ScreenContainer>,
    resources: Box<dyn ResourceLoader>,
    policy: StepPolicy,
}

impl InfoScreenBuilder {
    pub fn new(catalog: impl PluginCatalog + 'static, loader: ModuleLoader) -> Self {
        Self {
            catalog: Box::new(catalog),
            loader,
            validator: DependencyValidator::default(),
            container: Box::new(HeadlessContainer::new()),
            resources: Box::new(TrackingResourceLoader::in_memory()),
            policy: StepPolicy::default(),
        }
    }

    pub fn validator(mut self, validator: DependencyValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn container(mut self, container: impl ScreenContainer + 'static) -> Self {
        self.container = Box::new(container);
        self
    }

    pub fn resources(mut self, resources: impl ResourceLoader + 'static) -> Self {
        self.resources = Box::new(resources);
        self
    }

    pub fn step_policy(mut self, policy: StepPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> InfoScreen {
        let (handle, commands) = ShellHandle::channel();
        InfoScreen {
            catalog: self.catalog,
            validator: self.validator,
            loader: self.loader,
            registry: ScreenRegistry::new(),
            navigation: NavigationController::new(self.policy),
            container: self.container,
            resources: self.resources,
            handle,
            commands,
            shown: None,
        }
    }
}

/// The host shell
pub struct InfoScreen {
    catalog: Box<dyn PluginCatalog>,
    validator: DependencyValidator,
    loader: ModuleLoader,
    registry: ScreenRegistry,
    navigation: NavigationController,
    container: Box<dyn ScreenContainer>,
    resources: Box<dyn ResourceLoader>,
    handle: ShellHandle,
    commands: mpsc::UnboundedReceiver<ShellCommand>,
    /// Screen last pushed to the container
    shown: Option<String>,
}

impl InfoScreen {
    pub fn builder(catalog: impl PluginCatalog + 'static, loader: ModuleLoader) -> InfoScreenBuilder {
        InfoScreenBuilder::new(catalog, loader)
    }

    /// Handle given to screens as `master`
    pub fn handle(&self) -> ShellHandle {
        self.handle.clone()
    }

    pub fn registry(&self) -> &ScreenRegistry {
        &self.registry
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    pub fn catalog(&self) -> &dyn PluginCatalog {
        self.catalog.as_ref()
    }

    pub fn validator(&self) -> &DependencyValidator {
        &self.validator
    }

    pub fn available_screens(&self) -> &[String] {
        self.navigation.available()
    }

    pub fn current_screen(&self) -> Option<&str> {
        self.navigation.current()
    }

    pub fn is_locked(&self) -> bool {
        self.navigation.is_locked()
    }

    // --- Activation ---

    /// Bulk pass over every enabled plugin of the catalog
    pub fn activate_all(&mut self) -> Result<ActivationReport> {
        let descriptors = self.catalog.plugins(false)?;
        info!("Activating {} screen plugin(s)", descriptors.len());
        Ok(self.activate_descriptors(&descriptors))
    }

    /// Bulk pass over `descriptors`, in input order
    pub fn activate_descriptors(&mut self, descriptors: &[PluginDescriptor]) -> ActivationReport {
        let mut reporter = FailureReporter::new();
        let mut report = ActivationReport::default();

        for descriptor in descriptors {
            if self.registry.contains(&descriptor.name) {
                warn!("Screen {} is already active, skipping duplicate", descriptor.name);
                report.skipped.push(descriptor.name.clone());
                continue;
            }
            if self.activate_one(descriptor, &mut reporter) {
                report.activated.push(descriptor.name.clone());
            }
        }

        self.navigation.reset(self.registry.names().iter().cloned());

        report.failures = reporter.records();
        self.install_failure_screen(reporter);
        self.sync_current();
        report
    }

    /// Activate one plugin by name. An active name is reloaded instead.
    pub fn add_screen(&mut self, name: &str) -> Result<ActivationReport> {
        if self.registry.contains(name) {
            return self.reload_screen(name);
        }
        let descriptor = self
            .catalog
            .find(name, false)?
            .ok_or_else(|| PluginSystemError::ScreenNotFound(name.to_string()))?;
        Ok(self.activate_single(&descriptor))
    }

    /// Deactivate a screen: move navigation off it, unload it, release its resource
    pub fn remove_screen(&mut self, name: &str) -> bool {
        let occurrences = self.navigation.on_screen_removed(name);
        // The container must not be left showing the screen being removed
        self.sync_current();

        let removed = self.unregister_screen(name);

        match self.catalog.find(name, true) {
            Ok(Some(descriptor)) => self.release_resource(&descriptor),
            Ok(None) => debug!("No descriptor for '{}', no resource to release", name),
            Err(e) => warn!("Could not look up resource of '{}': {}", name, e),
        }

        removed || occurrences > 0
    }

    /// Remove then activate again, without recursion
    pub fn reload_screen(&mut self, name: &str) -> Result<ActivationReport> {
        let descriptor = self
            .catalog
            .find(name, false)?
            .ok_or_else(|| PluginSystemError::ScreenNotFound(name.to_string()))?;
        self.remove_screen(name);
        Ok(self.activate_single(&descriptor))
    }

    fn activate_single(&mut self, descriptor: &PluginDescriptor) -> ActivationReport {
        let mut reporter = FailureReporter::new();
        let mut report = ActivationReport::default();

        if self.activate_one(descriptor, &mut reporter) {
            self.navigation.on_screen_added(&descriptor.name);
            report.activated.push(descriptor.name.clone());
        }

        report.failures = reporter.records();
        self.install_failure_screen(reporter);
        self.sync_current();
        report
    }

    /// Validate → load resource → load → register. Failures go to `reporter`.
    fn activate_one(&mut self, descriptor: &PluginDescriptor, reporter: &mut FailureReporter) -> bool {
        let name = descriptor.name.as_str();

        if name == FAILED_SCREEN_NAME {
            error!("Screen name {} is reserved. Skipping...", name);
            reporter.record(FailureRecord::load(name, "screen name is reserved"));
            return false;
        }

        let verdict = self.validator.validate(descriptor);
        if !verdict.ok {
            reporter.record(FailureRecord::dependency(name, verdict.unresolved));
            return false;
        }

        if let Some(resource) = descriptor.resource() {
            if let Err(e) = self.resources.load(resource) {
                error!("Could not load resource for {} screen: {}", name, e);
                reporter.record(FailureRecord::load(name, e.to_string()));
                return false;
            }
        }

        let screen = match self.loader.load(descriptor, &self.handle) {
            Ok(screen) => screen,
            Err(e) => {
                self.release_resource(descriptor);
                reporter.record(e.into());
                return false;
            }
        };

        if let Err(e) = self.registry.register(name, screen) {
            warn!("{}", e);
            self.release_resource(descriptor);
            return false;
        }
        self.container.add_widget(name);
        true
    }

    /// Register the failure summary (replacing an older one) and make it current
    fn install_failure_screen(&mut self, reporter: FailureReporter) {
        let Some(screen) = reporter.into_screen() else {
            return;
        };

        if self.registry.contains(FAILED_SCREEN_NAME) {
            self.navigation.on_screen_removed(FAILED_SCREEN_NAME);
            self.unregister_screen(FAILED_SCREEN_NAME);
        }

        match self.registry.register(FAILED_SCREEN_NAME, Box::new(screen)) {
            Ok(()) => {
                self.container.add_widget(FAILED_SCREEN_NAME);
                self.navigation.on_screen_added(FAILED_SCREEN_NAME);
            }
            Err(e) => error!("Could not register failure screen: {}", e),
        }
    }

    fn unregister_screen(&mut self, name: &str) -> bool {
        if self.registry.unregister(name) {
            self.container.remove_widget(name);
            true
        } else {
            false
        }
    }

    fn release_resource(&mut self, descriptor: &PluginDescriptor) {
        let Some(resource) = descriptor.resource() else {
            return;
        };
        match self.resources.unload(resource) {
            Ok(()) => {}
            Err(e) if e.is_not_found() => debug!("{}", e),
            Err(e) => warn!("Could not release resource of '{}': {}", descriptor.name, e),
        }
    }

    // --- Navigation ---

    pub fn next_screen(&mut self, reverse: bool) {
        if self.navigation.next(reverse) {
            self.sync_current();
        }
    }

    /// Unknown names are ignored
    pub fn switch_to(&mut self, name: &str) -> bool {
        let switched = self.navigation.switch_to(name);
        if switched {
            self.sync_current();
        }
        switched
    }

    pub fn toggle_lock(&mut self, explicit: Option<bool>) -> bool {
        self.navigation.toggle_lock(explicit)
    }

    /// Push the current screen to the container when it changed
    fn sync_current(&mut self) {
        let current = self.navigation.current().map(str::to_string);
        if current == self.shown {
            return;
        }
        match &current {
            Some(name) => self.container.set_current(name, self.navigation.transition()),
            None => self.container.clear_current(),
        }
        self.shown = current;
    }

    /// Render the current screen into the container. A panicking
    /// `render` is logged and nothing is presented.
    pub fn refresh(&mut self) -> Option<String> {
        let name = self.navigation.current()?.to_string();
        let screen = self.registry.get(&name)?;
        let content = match panic::catch_unwind(AssertUnwindSafe(|| screen.render())) {
            Ok(content) => content,
            Err(payload) => {
                error!("Screen '{}' panicked while rendering: {}", name, panic_message(payload.as_ref()));
                return None;
            }
        };
        self.container.present(&name, &content);
        Some(content)
    }

    // --- Commands ---

    /// Apply one command. `Shutdown` is a no-op here.
    pub fn execute(&mut self, command: ShellCommand) -> Result<()> {
        debug!("Executing shell command {:?}", command);
        match command {
            ShellCommand::Next { reverse } => self.next_screen(reverse),
            ShellCommand::SwitchTo(name) => {
                self.switch_to(&name);
            }
            ShellCommand::ToggleLock(explicit) => {
                self.toggle_lock(explicit);
            }
            ShellCommand::AddScreen(name) => {
                self.add_screen(&name)?;
            }
            ShellCommand::RemoveScreen(name) => {
                self.remove_screen(&name);
            }
            ShellCommand::ReloadScreen(name) => {
                self.reload_screen(&name)?;
            }
            ShellCommand::Shutdown => {}
        }
        Ok(())
    }

    /// Apply every queued command without waiting
    pub fn process_pending(&mut self) -> ShellStatus {
        while let Ok(command) = self.commands.try_recv() {
            if command == ShellCommand::Shutdown {
                return ShellStatus::Shutdown;
            }
            if let Err(e) = self.execute(command) {
                error!("Shell command failed: {}", e);
            }
        }
        ShellStatus::Running
    }

    /// Wait for the next queued command
    pub async fn next_command(&mut self) -> Option<ShellCommand> {
        self.commands.recv().await
    }

    /// Unload every screen, last activated first
    pub fn shutdown(&mut self) {
        let names: Vec<String> = self.registry.names().iter().rev().cloned().collect();
        for name in names {
            self.remove_screen(&name);
        }
        info!("All screens unloaded");
    }
}

// Test module declaration
#[cfg(test)]
mod tests;
