//! The products screen: catalogue records with price and stock.

pub mod entity;

use std::sync::Arc;

use crate::clients::MemoryStore;
use crate::framework::{
    ChannelTransport, ConfirmationService, ResourceSession, SessionClient, SessionConfig, Transport,
};
use crate::model::Product;

/// Prefix of ids assigned by [`memory_store`].
pub const ID_PREFIX: &str = "p";

/// Handle for the products screen.
pub type ProductsClient = SessionClient<Product>;

/// Creates a products session and its client.
pub fn new(
    transport: impl Transport<Product> + 'static,
    confirmer: Arc<dyn ConfirmationService>,
    config: SessionConfig,
) -> (ResourceSession<Product>, ProductsClient) {
    ResourceSession::new(transport, confirmer, config)
}

/// Creates an in-process products store and a transport bound to it.
pub fn memory_store(buffer_size: usize) -> (MemoryStore<Product>, ChannelTransport<Product>) {
    MemoryStore::with_prefix(buffer_size, ID_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::SessionEntity;
    use crate::model::{FieldValue, ProductField};

    #[test]
    fn products_live_under_their_own_path() {
        assert_eq!(Product::KIND, "products");
        assert_eq!(Product::LABELS.delete_title, "Delete product?");
    }

    #[test]
    fn form_fields_coerce_through_the_trait() {
        let mut form = Product::default();
        SessionEntity::set_field(&mut form, ProductField::Stock, FieldValue::from("12"));
        SessionEntity::set_field(&mut form, ProductField::Name, FieldValue::from("Widget"));
        assert_eq!(form.stock, 12);
        assert_eq!(form.name, "Widget");
        assert_eq!(SessionEntity::id(&form), None);
    }
}
