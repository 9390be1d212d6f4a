// Core modules of the InfoScreen shell
pub mod control;
pub mod kernel;
pub mod navigation;
pub mod plugin_system;
pub mod shell;
pub mod storage;
pub mod ui_bridge;

// Re-export key public types/traits for easier use by the binary and screen plugins
pub use kernel::Application;
pub use kernel::error::{Error, Result};
pub use navigation::{NavigationController, NavigationState, StepPolicy, Transition};
pub use plugin_system::{
    ModuleLoader, ModuleRegistry, PluginCatalog, PluginDescriptor, Screen, ScreenContext,
    ScreenRegistry,
};
pub use shell::{ActivationReport, InfoScreen, ShellCommand, ShellHandle};
pub use storage::AppConfig;
