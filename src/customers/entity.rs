//! [`SessionEntity`] implementation for [`Customer`].

use crate::framework::{Labels, SessionEntity};
use crate::model::{FieldValue, Customer, CustomerField};

impl SessionEntity for Customer {
    type Field = CustomerField;

    const KIND: &'static str = "customers";

    const LABELS: Labels = Labels {
        delete_title: "Delete customer?",
        delete_message: "This action cannot be undone.",
        created: "The customer has been registered successfully.",
        updated: "The customer has been updated successfully.",
        deleted: "The customer has been deleted.",
        load_failed: "Could not load the customers.",
        create_failed: "Could not create the customer.",
        update_failed: "Could not update the customer.",
        delete_failed: "Could not delete the customer.",
    };

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn set_field(&mut self, field: CustomerField, value: FieldValue) {
        Customer::set_field(self, field, value);
    }
}
