//! # Observability & Tracing
//!
//! This module provides the tracing infrastructure for the whole console.
//!
//! ## Overview
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//! Every session, store and transport logs with an `entity_type` (or `kind`) field, so
//! one filter shows a single screen end to end.
//!
//! ## Configuration
//!
//! The console uses a compact format that hides the crate/module prefix (`with_target(false)`).
//!
//! - **Structured logging** with `tracing` crate
//! - **Configurable log levels** via `RUST_LOG` environment variable
//! - **Compact format** optimized for development
//!
//! ## What Gets Traced
//!
//! - **Session Lifecycle**: Startup, shutdown, and final record count
//! - **Intents**: Every field change, selection, submit and delete request (debug)
//! - **Completions**: Loaded, Created, Updated, Deleted and every failure with its cause
//! - **HTTP Requests**: One span per request, carrying the entity kind
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Show form contents and payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the HTTP layer
//! RUST_LOG=resource_session::clients=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=info`**, the demo binary creating a product against the seeded
//! in-memory store (timestamps dropped; lines from different tasks may interleave
//! differently):
//!
//! ```text
//! INFO No API URL configured, using in-memory stores
//! INFO Store started entity_type="products" size=1
//! INFO Session started entity_type="products"
//! INFO Loaded entity_type="products" size=1
//! INFO product_screen: Filling the product form
//! INFO Stored entity_type="products" id=p2 size=2
//! INFO Created entity_type="products" size=2
//! INFO The product has been registered. title=Created
//! INFO product_screen: Products listed size=2
//! ```
//!
//! Session and store tasks are spawned when the console starts, so their lines
//! carry no `product_screen` span; only the demo's own lines do.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Module paths add nothing; every line carries entity_type
        .compact()
        .init();
}
