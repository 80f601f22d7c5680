//! Runtime orchestration and lifecycle management.
//!
//! - [`AdminConsole`] - Starts the three screens, wires their dependencies, shuts them down
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod console;
pub mod tracing;

pub use self::console::*;
pub use self::tracing::*;
