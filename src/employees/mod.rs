//! The employees screen.

pub mod entity;

use std::sync::Arc;

use crate::clients::MemoryStore;
use crate::framework::{
    ChannelTransport, ConfirmationService, ResourceSession, SessionClient, SessionConfig, Transport,
};
use crate::model::Employee;

pub const ID_PREFIX: &str = "e";

pub type EmployeesClient = SessionClient<Employee>;

/// Creates an employees session and its client.
pub fn new(
    transport: impl Transport<Employee> + 'static,
    confirmer: Arc<dyn ConfirmationService>,
    config: SessionConfig,
) -> (ResourceSession<Employee>, EmployeesClient) {
    ResourceSession::new(transport, confirmer, config)
}

pub fn memory_store(buffer_size: usize) -> (MemoryStore<Employee>, ChannelTransport<Employee>) {
    MemoryStore::with_prefix(buffer_size, ID_PREFIX)
}
