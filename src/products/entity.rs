//! [`SessionEntity`] implementation for [`Product`].

use crate::framework::{Labels, SessionEntity};
use crate::model::{FieldValue, Product, ProductField};

impl SessionEntity for Product {
    type Field = ProductField;

    const KIND: &'static str = "products";

    const LABELS: Labels = Labels {
        delete_title: "Delete product?",
        delete_message: "This action is irreversible.",
        created: "The product has been registered.",
        updated: "The product has been updated.",
        deleted: "The product has been deleted.",
        load_failed: "Could not load the products.",
        create_failed: "Could not create the product.",
        update_failed: "Could not update the product.",
        delete_failed: "Could not delete the product.",
    };

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn set_field(&mut self, field: ProductField, value: FieldValue) {
        Product::set_field(self, field, value);
    }
}
