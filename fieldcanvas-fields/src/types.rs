//! Core field and field-type types.
//!
//! A [`FieldTypeDef`] is a catalog entry: a type tag with display metadata and
//! the schema of extended attributes fields of that type carry. A [`Field`] is
//! one element placed on the template canvas.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::geometry::Geometry;

/// Ordered attribute bag of a field, keyed by attribute name.
pub type ExtendedAttributes = IndexMap<String, AttributeValue>;

/// Tag naming a catalog entry, e.g. `TEXT` or `CHECKBOX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldTypeTag(String);

impl FieldTypeTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldTypeTag {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FieldTypeTag {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Stable identity of a placed field. Never reused within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(Ulid);

impl FieldId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse from the canonical ULID string.
    pub fn parse(s: &str) -> Option<Self> {
        Ulid::from_string(s).ok().map(Self)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl Default for FieldId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Ulid> for FieldId {
    fn from(id: Ulid) -> Self {
        Self(id)
    }
}

/// The shape of an extended attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeKind {
    Text,
    Boolean,
    Number,
}

impl AttributeKind {
    /// Value used when a definition declares no default.
    pub fn zero(self) -> AttributeValue {
        match self {
            AttributeKind::Text => AttributeValue::Text(String::new()),
            AttributeKind::Boolean => AttributeValue::Boolean(false),
            AttributeKind::Number => AttributeValue::Number(0.0),
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttributeKind::Text => "text",
            AttributeKind::Boolean => "boolean",
            AttributeKind::Number => "number",
        };
        f.write_str(s)
    }
}

/// Value of an extended attribute. Serializes as a bare scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Text(_) => AttributeKind::Text,
            AttributeValue::Boolean(_) => AttributeKind::Boolean,
            AttributeValue::Number(_) => AttributeKind::Number,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Number(n)
    }
}

/// One extended attribute a field type exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub name: String,
    pub kind: AttributeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<AttributeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl AttributeDef {
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            label: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<AttributeValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Declared default, or the kind's zero value if none is declared.
    pub fn effective_default(&self) -> AttributeValue {
        match &self.default {
            Some(v) => v.clone(),
            None => self.kind.zero(),
        }
    }
}

/// The set of extended attributes a field type exposes, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtendedAttributeSchema(Vec<AttributeDef>);

impl ExtendedAttributeSchema {
    pub fn new(attributes: Vec<AttributeDef>) -> Self {
        Self(attributes)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&AttributeDef> {
        self.0.iter().find(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeDef> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[AttributeDef] {
        &self.0
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|a| a.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Attribute bag holding every key at its default.
    pub fn defaults(&self) -> ExtendedAttributes {
        self.0
            .iter()
            .map(|a| (a.name.clone(), a.effective_default()))
            .collect()
    }
}

/// A catalog entry: a field type with display metadata and attribute schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTypeDef {
    pub tag: FieldTypeTag,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "ExtendedAttributeSchema::is_empty")]
    pub attributes: ExtendedAttributeSchema,
}

impl FieldTypeDef {
    pub fn new(tag: impl Into<FieldTypeTag>, label: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            label: label.into(),
            icon: None,
            description: None,
            attributes: ExtendedAttributeSchema::empty(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeDef) -> Self {
        self.attributes.0.push(attribute);
        self
    }
}

/// One element placed on the template canvas.
///
/// Instances are only handed out by reference from a
/// [`FieldCollection`](crate::FieldCollection), which keeps
/// `extended_attributes` keyed exactly by the schema of `type_`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub type_: FieldTypeTag,
    #[serde(default)]
    pub name: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub extended_attributes: ExtendedAttributes,
}

impl Field {
    /// True when the name has non-whitespace content.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.extended_attributes.get(key)
    }
}
