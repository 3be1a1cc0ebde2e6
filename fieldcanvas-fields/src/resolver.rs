//! Extended attribute rules.
//!
//! Stateless functions over a borrowed catalog. This is the only place
//! type-specific attribute behaviour lives: collection and focus code never
//! branch on a concrete type tag.

use tracing::{trace, warn};

use crate::catalog::FieldTypeCatalog;
use crate::error::{FieldsError, Result};
use crate::types::{AttributeDef, AttributeValue, ExtendedAttributes, FieldTypeTag};

/// Attributes that apply to `field_type`, in display order.
pub fn applicable<'a>(
    catalog: &'a FieldTypeCatalog,
    field_type: &FieldTypeTag,
) -> Result<&'a [AttributeDef]> {
    Ok(catalog.resolve_schema(field_type)?.as_slice())
}

/// Fresh attribute bag for a new field of `field_type`.
pub fn defaults(catalog: &FieldTypeCatalog, field_type: &FieldTypeTag) -> Result<ExtendedAttributes> {
    Ok(catalog.resolve_schema(field_type)?.defaults())
}

/// Attribute bag after switching from `old_type` to `new_type`.
///
/// Keys outside the new schema are dropped, keys new to it are set to their
/// default, keys in both keep their current value untouched. The result
/// follows the new schema's order. `current` is not modified.
pub fn reconcile(
    catalog: &FieldTypeCatalog,
    old_type: &FieldTypeTag,
    new_type: &FieldTypeTag,
    current: &ExtendedAttributes,
) -> Result<ExtendedAttributes> {
    let schema = catalog.resolve_schema(new_type)?;

    let reconciled: ExtendedAttributes = schema
        .iter()
        .map(|attr| {
            let value = current
                .get(&attr.name)
                .cloned()
                .unwrap_or_else(|| attr.effective_default());
            (attr.name.clone(), value)
        })
        .collect();

    trace!(
        from = %old_type,
        to = %new_type,
        dropped = current.keys().filter(|k| !schema.contains(k)).count(),
        "reconciled extended attributes"
    );

    Ok(reconciled)
}

/// Check that `key` belongs to the schema of `field_type` and that `value`
/// has the declared kind.
pub fn validate(
    catalog: &FieldTypeCatalog,
    field_type: &FieldTypeTag,
    key: &str,
    value: &AttributeValue,
) -> Result<()> {
    let schema = catalog.resolve_schema(field_type)?;
    let Some(attr) = schema.get(key) else {
        warn!(field_type = %field_type, key, "attribute not in schema");
        return Err(FieldsError::invalid_attribute(
            field_type.as_str(),
            key,
            "not an attribute of this field type",
        ));
    };
    if value.kind() != attr.kind {
        warn!(
            field_type = %field_type,
            key,
            expected = %attr.kind,
            actual = %value.kind(),
            "attribute kind mismatch"
        );
        return Err(FieldsError::invalid_attribute(
            field_type.as_str(),
            key,
            format!("expected {}, got {}", attr.kind, value.kind()),
        ));
    }
    if let AttributeValue::Number(n) = value {
        if !n.is_finite() {
            warn!(field_type = %field_type, key, value = n, "non-finite number attribute");
            return Err(FieldsError::invalid_attribute(
                field_type.as_str(),
                key,
                format!("number must be finite, got {n}"),
            ));
        }
    }
    Ok(())
}
