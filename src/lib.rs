#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Resource Session
//!
//! > **One generic screen state machine, three record kinds.**
//!
//! This crate implements the client-side logic of an administration console that
//! manages products, employees and customers stored behind a REST API. Each screen
//! lists records, fills a single form to create or edit one, and deletes records
//! after a confirmation prompt.
//!
//! ## 🏗️ Design Philosophy
//!
//! The three screens behave identically; only the record shape, the endpoint and the
//! wording differ. So the behaviour is written once, in [`ResourceSession<T>`](framework::ResourceSession),
//! and each kind contributes a [`SessionEntity`](framework::SessionEntity) implementation.
//!
//! This gives:
//! - **One State Machine**: loading, form editing, submit and delete flows live in one place.
//! - **Isolation**: each session owns its state in its own Tokio task; no locks.
//! - **Swappable Edges**: the network and the dialogs sit behind traits, so tests
//!   script them with mocks.
//!
//! ## 🚀 Core Concepts
//!
//! ### Server-Confirmed State
//! The record list only changes when the server says so. A failed create, update or
//! delete leaves the list exactly as it was and raises an error notice instead.
//!
//! ### The Form Buffer
//! Selecting a record copies it into the form. Typing edits the copy; the listed
//! record stays untouched until the update succeeds.
//!
//! ### Mocking: Testing without a Server
//! [`framework::mock`] provides [`MockTransport`](framework::mock::MockTransport), a
//! channel-level mock for step-by-step control, and a scripted confirmer.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Transport failures are a [`TransportError`](framework::TransportError). A session
//! never surfaces them to its caller; it logs the cause and turns it into a notice.
//! [`SessionError`](framework::SessionError) only means the session task is gone.
//!
//! ### 2. Concurrency Model
//! A session handles one event at a time: a user intent, or the completion of a request
//! it started earlier. Requests themselves run concurrently, so the user keeps typing
//! while a save is in flight.
//!
//! ### 3. Observability
//! We use `tracing` everywhere with structured logging.
//! See the [`lifecycle::tracing`] module for details.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: The generic session, the transport and confirmation seams, and the mocks.
//! - **Key items**: [`SessionEntity`](framework::SessionEntity), [`ResourceSession`](framework::ResourceSession),
//!   [`SessionClient`](framework::SessionClient).
//!
//! ### 2. The Records ([`model`])
//! - **Role**: Plain serde structs, declared with [`define_record!`].
//!
//! ### 3. The Screens ([`products`], [`employees`], [`customers`])
//! - **Role**: Wording and endpoint for each kind, plus constructors.
//!
//! ### 4. The Transports ([`clients`])
//! - **Role**: [`HttpTransport`](clients::HttpTransport) for the REST backend and
//!   [`MemoryStore`](clients::MemoryStore) for running without one.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! - **Role**: Starts the three screens, wires them, shuts them down.
//! - **Key items**: [`AdminConsole`](lifecycle::AdminConsole), [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # In-memory demo
//! RUST_LOG=info cargo run
//!
//! # Against a backend
//! RESOURCE_API_URL=http://localhost:8080/api RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod config;
pub mod customers;
pub mod employees;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod products;
