//! # InfoScreen Plugin System
//!
//! This module turns plugin descriptors into live screens. It covers the
//! whole path from discovery to registration:
//!
//! - **[`catalog`]**: Enumerates plugin descriptors, either from memory
//!   ([`StaticCatalog`]) or from `screen.json` manifests on disk
//!   ([`DirectoryCatalog`]).
//! - **[`dependency`]**: Flat existence checks of declared dependencies
//!   through a pluggable [`DependencyProbe`].
//! - **[`error`]**: Error types ([`PluginSystemError`](error::PluginSystemError))
//!   for every plugin-level failure.
//! - **[`failure`]**: Collects failures of an activation pass and builds the
//!   failure-summary screen.
//! - **[`loader`]**: The build-time factory map ([`ModuleRegistry`]) and the
//!   [`ModuleLoader`] that instantiates screens from it.
//! - **[`manifest`]**: The [`PluginDescriptor`] data model and its builder.
//! - **[`registry`]**: The [`ScreenRegistry`] owning live screen instances.
//! - **[`traits`]**: The [`Screen`] trait every plugin implements and the
//!   [`ScreenContext`] handed to constructors.
pub mod catalog;
pub mod dependency;
pub mod error;
pub mod failure;
pub mod loader;
pub mod manifest;
pub mod registry;
pub mod traits;

pub use catalog::{DirectoryCatalog, PluginCatalog, StaticCatalog};
pub use dependency::{
    AnyProbe, CapabilityProbe, DependencyProbe, DependencyValidator, ExecutableProbe,
    ValidationResult,
};
pub use failure::{FailedScreen, FailureRecord, FailureReporter};
pub use loader::{LoadError, ModuleLoader, ModuleRegistry, ScreenConstructor, ScreenModule};
pub use manifest::{DescriptorBuilder, PluginDescriptor};
pub use registry::ScreenRegistry;
pub use traits::{BoxError, Screen, ScreenContext};
