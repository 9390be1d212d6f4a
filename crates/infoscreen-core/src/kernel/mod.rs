//! # InfoScreen Kernel
//!
//! The `kernel` module holds the pieces every other subsystem leans on:
//! the top-level [`Error`](error::Error) type and its `Result` alias, the
//! system-wide constants, and the [`Application`](bootstrap::Application)
//! that wires configuration, catalog, module registry and shell together
//! and drives the kiosk event loop.
pub mod bootstrap;
pub mod constants;
pub mod error;

pub use bootstrap::Application;
pub use error::{Error, Result};
