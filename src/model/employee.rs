//! Employee records.

crate::define_record! {
    /// A member of staff.
    Employee {
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
        /// Job title.
        position: String,
    }
}

impl Employee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
            position: position.into(),
        }
    }
}
