//! FieldTypeCatalog: the registry of field types and their attribute schemas.
//!
//! The catalog is the single source of truth for which extended attributes
//! exist per type. It is built once, validated, and read-only afterwards;
//! sessions share it behind an `Arc`.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, warn};

use crate::binding::RESERVED_PATHS;
use crate::config::EditorConfig;
use crate::defaults::builtin_field_types;
use crate::error::{FieldsError, Result};
use crate::types::{AttributeValue, ExtendedAttributeSchema, FieldTypeDef, FieldTypeTag};

/// Builder for `FieldTypeCatalog`. Created by `FieldTypeCatalog::builder()`.
#[derive(Default)]
pub struct FieldTypeCatalogBuilder {
    defaults: Vec<FieldTypeDef>,
    definitions: Vec<FieldTypeDef>,
}

impl FieldTypeCatalogBuilder {
    /// Seed entries. Custom definitions with the same tag replace them;
    /// a tag repeated among the defaults themselves is an error.
    pub fn with_defaults(mut self, defaults: Vec<FieldTypeDef>) -> Self {
        self.defaults.extend(defaults);
        self
    }

    /// Add custom entries on top of the defaults.
    pub fn with_definitions(mut self, definitions: Vec<FieldTypeDef>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    /// Add a single custom entry.
    pub fn with_definition(mut self, definition: FieldTypeDef) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Validate every entry and build the catalog.
    ///
    /// Defaults keep their order; a custom entry replaces a default in place,
    /// new custom tags are appended.
    pub fn build(self) -> Result<FieldTypeCatalog> {
        let mut types: Vec<FieldTypeDef> = Vec::new();
        let mut tag_index: HashMap<FieldTypeTag, usize> = HashMap::new();

        for def in self.defaults {
            validate_definition(&def)?;
            if tag_index.contains_key(&def.tag) {
                return Err(FieldsError::invalid_catalog(
                    def.tag.as_str(),
                    "default defined more than once",
                ));
            }
            tag_index.insert(def.tag.clone(), types.len());
            types.push(def);
        }

        let mut custom_tags = HashSet::new();
        for def in self.definitions {
            validate_definition(&def)?;
            if !custom_tags.insert(def.tag.clone()) {
                return Err(FieldsError::invalid_catalog(
                    def.tag.as_str(),
                    "defined more than once",
                ));
            }
            if let Some(&idx) = tag_index.get(&def.tag) {
                debug!(tag = %def.tag, "custom field type overrides default");
                types[idx] = def;
            } else {
                tag_index.insert(def.tag.clone(), types.len());
                types.push(def);
            }
        }

        debug!(types = types.len(), "field type catalog built");

        Ok(FieldTypeCatalog { types, tag_index })
    }
}

fn validate_definition(def: &FieldTypeDef) -> Result<()> {
    let tag = def.tag.as_str();
    if tag.is_empty() {
        return Err(FieldsError::invalid_catalog(tag, "tag cannot be empty"));
    }
    if !tag
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(FieldsError::invalid_catalog(
            tag,
            "tag must be upper-case letters, digits and underscores",
        ));
    }

    let mut seen = HashSet::new();
    for attr in def.attributes.iter() {
        if attr.name.is_empty() {
            return Err(FieldsError::invalid_catalog(
                tag,
                "attribute name cannot be empty",
            ));
        }
        if RESERVED_PATHS.contains(&attr.name.as_str()) || attr.name.contains('.') {
            return Err(FieldsError::invalid_catalog(
                tag,
                format!("attribute name '{}' is not addressable as a form path", attr.name),
            ));
        }
        if !seen.insert(attr.name.as_str()) {
            return Err(FieldsError::invalid_catalog(
                tag,
                format!("duplicate attribute '{}'", attr.name),
            ));
        }
        if let Some(default) = &attr.default {
            if default.kind() != attr.kind {
                return Err(FieldsError::invalid_catalog(
                    tag,
                    format!(
                        "default for '{}' is {} but the attribute is {}",
                        attr.name,
                        default.kind(),
                        attr.kind
                    ),
                ));
            }
            if let AttributeValue::Number(n) = default {
                if !n.is_finite() {
                    return Err(FieldsError::invalid_catalog(
                        tag,
                        format!("default for '{}' must be finite, got {n}", attr.name),
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Read a YAML list of custom field type definitions.
pub fn load_definitions(path: &Path) -> Result<Vec<FieldTypeDef>> {
    let content = std::fs::read_to_string(path)?;
    let defs: Vec<FieldTypeDef> = serde_yaml_ng::from_str(&content)?;
    debug!(?path, count = defs.len(), "loaded custom field types");
    Ok(defs)
}

/// Registry of field types, in type-picker order.
#[derive(Debug, Clone)]
pub struct FieldTypeCatalog {
    types: Vec<FieldTypeDef>,
    tag_index: HashMap<FieldTypeTag, usize>,
}

impl FieldTypeCatalog {
    /// Start building a catalog.
    ///
    /// ```rust,ignore
    /// let catalog = FieldTypeCatalog::builder()
    ///     .with_defaults(builtin_field_types())
    ///     .with_definition(FieldTypeDef::new("INITIALS", "Initials"))
    ///     .build()?;
    /// ```
    pub fn builder() -> FieldTypeCatalogBuilder {
        FieldTypeCatalogBuilder::default()
    }

    /// Catalog holding only the built-in types.
    pub fn builtin() -> Result<Self> {
        Self::builder().with_defaults(builtin_field_types()).build()
    }

    /// Built-in types plus the custom catalog file named by `config`, if any.
    pub fn from_config(config: &EditorConfig) -> Result<Self> {
        let mut builder = Self::builder().with_defaults(builtin_field_types());
        if let Some(path) = &config.catalog_file {
            builder = builder.with_definitions(load_definitions(path)?);
        }
        builder.build()
    }

    // --- Lookup ---

    pub fn get(&self, tag: &FieldTypeTag) -> Option<&FieldTypeDef> {
        self.tag_index.get(tag).map(|&i| &self.types[i])
    }

    /// Like `get`, but an absent tag is an `UnknownType` error.
    pub fn require(&self, tag: &FieldTypeTag) -> Result<&FieldTypeDef> {
        self.get(tag).ok_or_else(|| {
            warn!(tag = %tag, "unknown field type");
            FieldsError::unknown_type(tag.as_str())
        })
    }

    /// Extended attribute schema of `tag`.
    pub fn resolve_schema(&self, tag: &FieldTypeTag) -> Result<&ExtendedAttributeSchema> {
        self.require(tag).map(|def| &def.attributes)
    }

    pub fn contains(&self, tag: &FieldTypeTag) -> bool {
        self.tag_index.contains_key(tag)
    }

    /// Parse a raw tag, failing if the catalog does not know it.
    pub fn parse_tag(&self, raw: &str) -> Result<FieldTypeTag> {
        let tag = FieldTypeTag::from(raw);
        self.require(&tag)?;
        Ok(tag)
    }

    /// All entries, in type-picker order.
    pub fn all(&self) -> &[FieldTypeDef] {
        &self.types
    }

    pub fn tags(&self) -> impl Iterator<Item = &FieldTypeTag> {
        self.types.iter().map(|t| &t.tag)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
