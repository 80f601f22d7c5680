//! Product records, as listed on the products screen.

crate::define_record! {
    /// A product in the catalogue.
    ///
    /// # Example
    /// ```
    /// use resource_session::model::{FieldValue, Product, ProductField};
    ///
    /// let mut form = Product::default();
    /// form.set_field(ProductField::Price, FieldValue::from("9.99"));
    /// assert_eq!(form.price, 9.99);
    /// assert!(form.id.is_none());
    /// ```
    Product {
        name: String,
        description: String,
        price: f64,
        /// Units on hand.
        stock: i64,
        category: String,
    }
}

impl Product {
    /// Creates an unsaved product (no `id`).
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        stock: i64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            stock,
            category: category.into(),
        }
    }
}
