//! Pure record types managed by a [`ResourceSession`](crate::framework::ResourceSession).
//!
//! Every record is a flat set of primitive fields plus an optional,
//! server-assigned `id`. The [`define_record!`] macro generates the struct,
//! its field enum (e.g. `ProductField`) and the setters the form buffer uses,
//! so a new entity kind is nothing more than a field list.

use std::fmt;

pub mod customer;
pub mod employee;
pub mod product;

pub use customer::*;
pub use employee::*;
pub use product::*;

/// A value coming out of (or going into) a form control.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Coercion from a form value into a concrete field type.
///
/// Forms are not validated: text that does not parse into a numeric field
/// falls back to the field's zero value.
pub trait FromFieldValue: Sized {
    fn from_field_value(value: FieldValue) -> Self;
    fn to_field_value(&self) -> FieldValue;
}

impl FromFieldValue for String {
    fn from_field_value(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(text) => text,
            FieldValue::Number(n) => n.to_string(),
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

impl FromFieldValue for f64 {
    fn from_field_value(value: FieldValue) -> Self {
        match value {
            FieldValue::Number(n) => n,
            FieldValue::Text(text) => text.trim().parse().unwrap_or_default(),
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Number(*self)
    }
}

impl FromFieldValue for i64 {
    fn from_field_value(value: FieldValue) -> Self {
        match value {
            FieldValue::Number(n) if n.is_finite() => n.trunc() as i64,
            FieldValue::Number(_) => 0,
            FieldValue::Text(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .or_else(|_| text.parse::<f64>().map(|n| n.trunc() as i64))
                    .unwrap_or_default()
            }
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Number(*self as f64)
    }
}

/// Declares a record struct together with its `<Name>Field` enum.
///
/// ```ignore
/// define_record! {
///     /// A thing.
///     Thing { name: String, weight: f64 }
/// }
/// // generates `Thing { id, name, weight }`, `ThingField::{Name, Weight}`,
/// // `Thing::set_field` and `Thing::field`.
/// ```
#[macro_export]
macro_rules! define_record {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),+ $(,)?
        }
    ) => {
        ::paste::paste! {
            $(#[$meta])*
            #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
            #[serde(rename_all = "camelCase")]
            pub struct $name {
                /// Server-assigned identifier; absent until persisted.
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub id: Option<String>,
                $(
                    $(#[$fmeta])*
                    #[serde(default)]
                    pub $field: $ty,
                )+
            }

            /// Editable fields of the record, one variant per form control.
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum [<$name Field>] {
                $( [<$field:camel>], )+
            }

            impl [<$name Field>] {
                /// Every field, in declaration order.
                pub const ALL: &'static [Self] = &[ $( Self::[<$field:camel>], )+ ];

                /// The record field this variant edits.
                pub fn name(self) -> &'static str {
                    match self {
                        $( Self::[<$field:camel>] => stringify!($field), )+
                    }
                }
            }

            impl $name {
                /// Overwrites one field, coercing the value to the field's type.
                pub fn set_field(&mut self, field: [<$name Field>], value: $crate::model::FieldValue) {
                    match field {
                        $(
                            [<$name Field>]::[<$field:camel>] => {
                                self.$field = <$ty as $crate::model::FromFieldValue>::from_field_value(value);
                            }
                        )+
                    }
                }

                /// Reads one field back as a form value.
                pub fn field(&self, field: [<$name Field>]) -> $crate::model::FieldValue {
                    match field {
                        $(
                            [<$name Field>]::[<$field:camel>] => {
                                <$ty as $crate::model::FromFieldValue>::to_field_value(&self.$field)
                            }
                        )+
                    }
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_fields_parse_text_and_fall_back_to_zero() {
        assert_eq!(f64::from_field_value(" 9.99 ".into()), 9.99);
        assert_eq!(f64::from_field_value("abc".into()), 0.0);
        assert_eq!(i64::from_field_value("5".into()), 5);
        assert_eq!(i64::from_field_value("5.7".into()), 5);
        assert_eq!(i64::from_field_value(FieldValue::Number(3.9)), 3);
        assert_eq!(i64::from_field_value(FieldValue::Number(f64::NAN)), 0);
    }

    #[test]
    fn text_fields_render_numbers() {
        assert_eq!(String::from_field_value(FieldValue::Number(12.0)), "12");
        assert_eq!(String::from_field_value("hello".into()), "hello");
    }
}
