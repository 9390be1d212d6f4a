use std::time::Duration;

use log::{error, info, warn};
use tokio::task::JoinHandle;

use crate::control::{ControlSurface, TcpControl};
use crate::kernel::constants;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::plugin_system::{
    AnyProbe, CapabilityProbe, DependencyValidator, DirectoryCatalog, ExecutableProbe,
    ModuleLoader, ModuleRegistry,
};
use crate::shell::{ActivationReport, InfoScreen, ShellCommand, ShellHandle};
use crate::storage::AppConfig;
use crate::ui_bridge::{HeadlessContainer, TrackingResourceLoader};

/// Wires configuration, catalog and module registry into a shell and
/// drives the kiosk loop.
pub struct Application {
    config: AppConfig,
    shell: InfoScreen,
    surfaces: Vec<Box<dyn ControlSurface>>,
    started: bool,
}

impl Application {
    /// Build a headless application scanning `config.plugin_dirs`
    pub fn new(config: AppConfig, modules: ModuleRegistry) -> Self {
        info!("Initializing {} v{}", constants::APP_NAME, constants::APP_VERSION);

        let capabilities = CapabilityProbe::new(
            config
                .capabilities
                .iter()
                .cloned()
                .chain(modules.module_names()),
        );
        let validator =
            DependencyValidator::new(AnyProbe::new().with(capabilities).with(ExecutableProbe::from_env()));

        let shell = InfoScreen::builder(DirectoryCatalog::new(config.plugin_dirs.clone()), ModuleLoader::new(modules))
            .validator(validator)
            .container(HeadlessContainer::with_size(config.window.width, config.window.height))
            .resources(TrackingResourceLoader::new())
            .step_policy(config.navigation.step_policy)
            .build();

        Self::with_shell(config, shell)
    }

    /// Use an already assembled shell
    pub fn with_shell(config: AppConfig, shell: InfoScreen) -> Self {
        Self {
            config,
            shell,
            surfaces: Vec::new(),
            started: false,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn shell(&self) -> &InfoScreen {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut InfoScreen {
        &mut self.shell
    }

    pub fn handle(&self) -> ShellHandle {
        self.shell.handle()
    }

    /// Surfaces are spawned when `run` starts
    pub fn add_control_surface(&mut self, surface: impl ControlSurface + 'static) {
        self.surfaces.push(Box::new(surface));
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Run the activation pass
    pub fn activate(&mut self) -> Result<ActivationReport> {
        let report = self.shell.activate_all().map_err(|e| Error::KernelLifecycleError {
            phase: KernelLifecyclePhase::Activate,
            message: "Activation pass failed".to_string(),
            source: Some(Box::new(e)),
        })?;
        info!(
            "{} screen(s) active, {} failed",
            report.activated.len(),
            report.failures.len()
        );
        for failure in &report.failures {
            warn!("Screen failed: {}", failure);
        }
        Ok(report)
    }

    /// Activate, serve control surfaces and apply commands until shutdown
    pub async fn run(&mut self) -> Result<ActivationReport> {
        if self.started {
            return Err(Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::Run,
                message: "Application already started".to_string(),
                source: None,
            });
        }
        self.started = true;

        let report = self.activate()?;

        if self.config.webserver.enabled {
            let webserver = &self.config.webserver;
            let tcp = TcpControl::bind((webserver.bind.as_str(), webserver.apiport)).await?;
            self.surfaces.push(Box::new(tcp));
        }

        let mut tasks = self.spawn_surfaces();
        if let Some(task) = self.spawn_rotation() {
            tasks.push(task);
        }

        self.shell.refresh();
        loop {
            tokio::select! {
                command = self.shell.next_command() => match command {
                    Some(ShellCommand::Shutdown) | None => {
                        info!("Shutdown requested");
                        break;
                    }
                    Some(command) => {
                        if let Err(e) = self.shell.execute(command) {
                            error!("Shell command failed: {}", e);
                        }
                        self.shell.refresh();
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, shutting down");
                    break;
                }
            }
        }

        for task in tasks {
            task.abort();
        }
        self.shell.shutdown();
        Ok(report)
    }

    fn spawn_surfaces(&mut self) -> Vec<JoinHandle<()>> {
        self.surfaces
            .drain(..)
            .map(|surface| {
                let handle = self.shell.handle();
                let name = surface.name().to_string();
                tokio::spawn(async move {
                    if let Err(e) = surface.serve(handle).await {
                        error!("Control surface '{}' stopped: {}", name, e);
                    }
                })
            })
            .collect()
    }

    fn spawn_rotation(&self) -> Option<JoinHandle<()>> {
        let secs = self.config.navigation.rotate_secs.filter(|secs| *secs > 0)?;
        let handle = self.shell.handle();
        info!("Rotating screens every {}s", secs);
        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(secs));
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                if handle.next().is_err() {
                    break;
                }
            }
        }))
    }
}
