//! Customer records.

crate::define_record! {
    Customer {
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
        address: String,
    }
}

impl Customer {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }
}
