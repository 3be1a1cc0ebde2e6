//! Form-state contract.
//!
//! Presentation code binds field controls by position (`fields.{index}.{path}`).
//! [`FormState`] is that read/write/watch surface; [`FieldCollection`]
//! implements it so index-addressed writes still go through the collection's
//! type and attribute rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::collection::FieldCollection;
use crate::error::{FieldsError, Result};
use crate::geometry::Geometry;
use crate::resolver;
use crate::types::{AttributeValue, ExtendedAttributes, Field, FieldTypeTag};

/// Read/write/watch access to fields by position.
pub trait FormState {
    /// Field at `index`.
    fn read_field(&self, index: usize) -> Result<&Field>;

    /// Apply `patch` to the field at `index`, all or nothing.
    fn write_field(&mut self, index: usize, patch: FieldPatch) -> Result<()>;

    /// Current value at `path` on the field at `index`.
    ///
    /// An attribute the field's type does not expose reads as `null`.
    fn watch(&self, index: usize, path: &FieldPath) -> Result<Value>;
}

/// Path segments that address the field itself. Extended attributes may not
/// use these names.
pub(crate) const RESERVED_PATHS: [&str; 3] = ["type", "name", "geometry"];

/// Addressable part of a field, the `{path}` in `fields.{index}.{path}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Type,
    Name,
    Geometry,
    Attribute(String),
}

impl FromStr for FieldPath {
    type Err = FieldsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Err(FieldsError::InvalidPath { path: s.to_string() }),
            "type" => Ok(FieldPath::Type),
            "name" => Ok(FieldPath::Name),
            "geometry" => Ok(FieldPath::Geometry),
            other if other.contains('.') => Err(FieldsError::InvalidPath {
                path: other.to_string(),
            }),
            other => Ok(FieldPath::Attribute(other.to_string())),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Type => f.write_str("type"),
            FieldPath::Name => f.write_str("name"),
            FieldPath::Geometry => f.write_str("geometry"),
            FieldPath::Attribute(key) => f.write_str(key),
        }
    }
}

/// Partial update of a field. Unset parts are left alone.
///
/// Applied in order: type (with attribute reconciliation), name, geometry,
/// then attributes validated against the resulting type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<FieldTypeTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(default, skip_serializing_if = "ExtendedAttributes::is_empty")]
    pub extended_attributes: ExtendedAttributes,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, field_type: impl Into<FieldTypeTag>) -> Self {
        self.type_ = Some(field_type.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.extended_attributes.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.type_.is_none()
            && self.name.is_none()
            && self.geometry.is_none()
            && self.extended_attributes.is_empty()
    }
}

impl FormState for FieldCollection {
    fn read_field(&self, index: usize) -> Result<&Field> {
        self.require_at(index)
    }

    fn write_field(&mut self, index: usize, patch: FieldPatch) -> Result<()> {
        let mut next = self.require_at(index)?.clone();

        if let Some(new_type) = &patch.type_ {
            next.extended_attributes = resolver::reconcile(
                self.catalog(),
                &next.type_,
                new_type,
                &next.extended_attributes,
            )?;
            next.type_ = new_type.clone();
        }
        if let Some(name) = patch.name {
            next.name = name;
        }
        if let Some(geometry) = patch.geometry {
            next.geometry = geometry;
        }
        for (key, value) in patch.extended_attributes {
            resolver::validate(self.catalog(), &next.type_, &key, &value)?;
            next.extended_attributes.insert(key, value);
        }

        debug!(field_id = %next.id, index, "field patched");
        self.commit(index, next);
        Ok(())
    }

    fn watch(&self, index: usize, path: &FieldPath) -> Result<Value> {
        let field = self.require_at(index)?;
        let value = match path {
            FieldPath::Type => serde_json::to_value(&field.type_)?,
            FieldPath::Name => Value::String(field.name.clone()),
            FieldPath::Geometry => serde_json::to_value(field.geometry)?,
            FieldPath::Attribute(key) => match field.extended_attributes.get(key) {
                Some(v) => serde_json::to_value(v)?,
                None => Value::Null,
            },
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FieldTypeCatalog;
    use crate::defaults::{CHECKBOX, DEFAULT_VALUE, READ_ONLY, TEXT};
    use serde_json::json;
    use std::sync::Arc;

    fn collection_with_text() -> FieldCollection {
        let mut fields = FieldCollection::new(Arc::new(FieldTypeCatalog::builtin().unwrap()));
        fields
            .add(
                Geometry::new(10.0, 10.0, 100.0, 20.0).unwrap(),
                &FieldTypeTag::from(TEXT),
            )
            .unwrap();
        fields
    }

    #[test]
    fn parse_paths() {
        assert_eq!("type".parse::<FieldPath>().unwrap(), FieldPath::Type);
        assert_eq!("name".parse::<FieldPath>().unwrap(), FieldPath::Name);
        assert_eq!("geometry".parse::<FieldPath>().unwrap(), FieldPath::Geometry);
        assert_eq!(
            "readOnly".parse::<FieldPath>().unwrap(),
            FieldPath::Attribute("readOnly".into())
        );
        assert!("".parse::<FieldPath>().is_err());
        assert!("fields.0.type".parse::<FieldPath>().is_err());
        assert_eq!(FieldPath::Attribute("readOnly".into()).to_string(), "readOnly");
        for reserved in RESERVED_PATHS {
            assert!(!matches!(
                reserved.parse::<FieldPath>().unwrap(),
                FieldPath::Attribute(_)
            ));
        }
    }

    #[test]
    fn every_catalog_attribute_is_watchable() {
        let catalog = FieldTypeCatalog::builder()
            .with_defaults(crate::defaults::builtin_field_types())
            .with_definition(
                crate::types::FieldTypeDef::new("LIMITED", "Limited").with_attribute(
                    crate::types::AttributeDef::new("max", crate::types::AttributeKind::Number)
                        .with_default(10.0),
                ),
            )
            .build()
            .unwrap();
        let mut fields = FieldCollection::new(Arc::new(catalog));
        let field = fields
            .add(
                Geometry::new(0.0, 0.0, 50.0, 10.0).unwrap(),
                &FieldTypeTag::from("LIMITED"),
            )
            .unwrap();

        let path: FieldPath = "max".parse().unwrap();
        assert_eq!(fields.watch(0, &path).unwrap(), json!(10.0));

        let err = fields
            .set_extended_attribute(&field.id, "max", f64::NAN)
            .unwrap_err();
        assert!(matches!(err, FieldsError::InvalidAttribute { .. }));
        let err = fields
            .write_field(0, FieldPatch::new().with_attribute("max", f64::INFINITY))
            .unwrap_err();
        assert!(matches!(err, FieldsError::InvalidAttribute { .. }));
        assert_eq!(fields.watch(0, &path).unwrap(), json!(10.0));
    }

    #[test]
    fn read_field_out_of_bounds() {
        let fields = collection_with_text();
        assert!(fields.read_field(0).is_ok());
        let err = fields.read_field(1).unwrap_err();
        assert!(matches!(err, FieldsError::IndexOutOfBounds { index: 1, len: 1 }));
    }

    #[test]
    fn watch_type_drives_attribute_controls() {
        let mut fields = collection_with_text();
        assert_eq!(fields.watch(0, &FieldPath::Type).unwrap(), json!("TEXT"));
        assert_eq!(
            fields
                .watch(0, &FieldPath::Attribute(READ_ONLY.into()))
                .unwrap(),
            json!(false)
        );

        fields
            .write_field(0, FieldPatch::new().with_type(CHECKBOX))
            .unwrap();
        assert_eq!(fields.watch(0, &FieldPath::Type).unwrap(), json!("CHECKBOX"));
        assert_eq!(
            fields
                .watch(0, &FieldPath::Attribute(READ_ONLY.into()))
                .unwrap(),
            Value::Null
        );
    }

    #[test]
    fn watch_name_and_geometry() {
        let fields = collection_with_text();
        assert_eq!(fields.watch(0, &FieldPath::Name).unwrap(), json!(""));
        assert_eq!(
            fields.watch(0, &FieldPath::Geometry).unwrap(),
            json!({"left": 10.0, "top": 10.0, "width": 100.0, "height": 20.0})
        );
    }

    #[test]
    fn write_field_applies_type_before_attributes() {
        let mut fields = collection_with_text();
        fields
            .write_field(0, FieldPatch::new().with_type(CHECKBOX))
            .unwrap();

        // readOnly is only valid once the type is back to TEXT
        fields
            .write_field(
                0,
                FieldPatch::new()
                    .with_type(TEXT)
                    .with_name("Company")
                    .with_attribute(READ_ONLY, true),
            )
            .unwrap();

        let field = fields.read_field(0).unwrap();
        assert_eq!(field.name, "Company");
        assert_eq!(field.attribute(READ_ONLY), Some(&AttributeValue::Boolean(true)));
        assert_eq!(field.attribute(DEFAULT_VALUE), Some(&AttributeValue::from("")));
    }

    #[test]
    fn write_field_is_all_or_nothing() {
        let mut fields = collection_with_text();
        let before = fields.read_field(0).unwrap().clone();

        let err = fields
            .write_field(
                0,
                FieldPatch::new()
                    .with_name("Changed")
                    .with_attribute(READ_ONLY, "not a bool"),
            )
            .unwrap_err();
        assert!(matches!(err, FieldsError::InvalidAttribute { .. }));
        assert_eq!(fields.read_field(0).unwrap(), &before);

        let err = fields
            .write_field(0, FieldPatch::new().with_name("x").with_type("UNKNOWN_TYPE"))
            .unwrap_err();
        assert!(matches!(err, FieldsError::UnknownType { .. }));
        assert_eq!(fields.read_field(0).unwrap(), &before);
    }

    #[test]
    fn write_field_out_of_bounds() {
        let mut fields = collection_with_text();
        let err = fields
            .write_field(3, FieldPatch::new().with_name("x"))
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn patch_deserializes_from_form_json() {
        let patch: FieldPatch = serde_json::from_value(json!({
            "type": "TEXT",
            "name": "Address",
            "extendedAttributes": { "defaultValue": "Main St", "readOnly": true }
        }))
        .unwrap();
        assert_eq!(patch.type_, Some(FieldTypeTag::from(TEXT)));
        assert_eq!(patch.extended_attributes.len(), 2);
        assert!(!patch.is_empty());
        assert!(FieldPatch::new().is_empty());
    }
}
