//! Concrete [`Transport`](crate::framework::Transport) implementations.

pub mod http;
pub mod memory;

pub use http::*;
pub use memory::*;
