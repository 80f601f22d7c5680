//! [`SessionEntity`] implementation for [`Employee`].

use crate::framework::{Labels, SessionEntity};
use crate::model::{FieldValue, Employee, EmployeeField};

impl SessionEntity for Employee {
    type Field = EmployeeField;

    const KIND: &'static str = "employees";

    const LABELS: Labels = Labels {
        delete_title: "Delete employee?",
        delete_message: "This action cannot be undone.",
        created: "The employee has been registered successfully.",
        updated: "The employee has been updated successfully.",
        deleted: "The employee has been deleted.",
        load_failed: "Could not load the employees.",
        create_failed: "Could not create the employee.",
        update_failed: "Could not update the employee.",
        delete_failed: "Could not delete the employee.",
    };

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn set_field(&mut self, field: EmployeeField, value: FieldValue) {
        Employee::set_field(self, field, value);
    }
}
