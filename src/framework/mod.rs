//! Generic session framework for record-management screens.
//!
//! This module provides the building blocks for a type-safe screen that keeps
//! a local list of records and a form buffer consistent with a remote store.
//!
//! # Main Components
//!
//! - [`SessionEntity`] - Trait that record kinds implement to be managed by a session
//! - [`ResourceSession`] - Generic state machine owning one screen's state
//! - [`SessionClient`] - Handle for sending intents and observing snapshots
//! - [`Transport`] - The remote store contract ([`TransportError`] on failure)
//! - [`ConfirmationService`] - Yes/no prompts and notifications
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test sessions without a server or a user.

pub mod confirm;
pub mod core;
pub mod mock;
pub mod transport;

// Re-export core types for convenience
pub use self::confirm::*;
pub use self::core::*;
pub use self::transport::*;
