//! Built-in field types.
//!
//! These seed every catalog. A custom catalog file may replace any of them by
//! reusing the tag.

use crate::types::{AttributeDef, AttributeKind, FieldTypeDef};

pub const TEXT: &str = "TEXT";
pub const NUMBER: &str = "NUMBER";
pub const EMAIL: &str = "EMAIL";
pub const DATE: &str = "DATE";
pub const CHECKBOX: &str = "CHECKBOX";
pub const SIGNATURE: &str = "SIGNATURE";

/// Attribute holding the pre-filled value of a text field.
pub const DEFAULT_VALUE: &str = "defaultValue";
/// Attribute marking a field as not editable by the signer.
pub const READ_ONLY: &str = "readOnly";

/// The built-in field types, in type-picker order.
pub fn builtin_field_types() -> Vec<FieldTypeDef> {
    vec![
        FieldTypeDef::new(TEXT, "Text")
            .with_icon("type")
            .with_description("Free-form text input")
            .with_attribute(
                AttributeDef::new(DEFAULT_VALUE, AttributeKind::Text)
                    .with_default("")
                    .with_label("Default Value"),
            )
            .with_attribute(
                AttributeDef::new(READ_ONLY, AttributeKind::Boolean)
                    .with_default(false)
                    .with_label("read-only"),
            ),
        FieldTypeDef::new(NUMBER, "Number").with_icon("hash"),
        FieldTypeDef::new(EMAIL, "Email").with_icon("mail"),
        FieldTypeDef::new(DATE, "Date").with_icon("calendar"),
        FieldTypeDef::new(CHECKBOX, "Checkbox").with_icon("square-check"),
        FieldTypeDef::new(SIGNATURE, "Signature").with_icon("pen-tool"),
    ]
}
