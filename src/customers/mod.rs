//! The customers screen.

pub mod entity;

use std::sync::Arc;

use crate::clients::MemoryStore;
use crate::framework::{
    ChannelTransport, ConfirmationService, ResourceSession, SessionClient, SessionConfig, Transport,
};
use crate::model::Customer;

pub const ID_PREFIX: &str = "c";

pub type CustomersClient = SessionClient<Customer>;

/// Creates a customers session and its client.
pub fn new(
    transport: impl Transport<Customer> + 'static,
    confirmer: Arc<dyn ConfirmationService>,
    config: SessionConfig,
) -> (ResourceSession<Customer>, CustomersClient) {
    ResourceSession::new(transport, confirmer, config)
}

pub fn memory_store(buffer_size: usize) -> (MemoryStore<Customer>, ChannelTransport<Customer>) {
    MemoryStore::with_prefix(buffer_size, ID_PREFIX)
}
