//! Field configuration model for visually authored document templates
//!
//! `fieldcanvas-fields` holds the rules behind a template canvas: which fields
//! are placed where, what type each one is, and which type-specific
//! attributes it carries. Rendering, drag/resize chrome and persistence live
//! elsewhere.
//!
//! # Architecture
//!
//! - **Catalog-driven**: a read-only [`FieldTypeCatalog`] maps each type tag to
//!   its label, icon and extended-attribute schema; adding a type is a catalog
//!   edit, not a code change
//! - **Ordered collection**: [`FieldCollection`] keeps fields in z/tab order,
//!   addressed by stable [`FieldId`] with a separate position index
//! - **Single focus**: the collection owns a `FocusController` that self-clears
//!   when the focused field is removed
//! - **Normalized geometry**: positions are stored in reference-viewport units;
//!   a [`LayoutEngine`] turns them into pixels for the current viewport
//!
//! ```rust
//! use std::sync::Arc;
//! use fieldcanvas_fields::{FieldCollection, FieldTypeCatalog, FieldTypeTag, Geometry};
//!
//! # fn main() -> fieldcanvas_fields::Result<()> {
//! let catalog = Arc::new(FieldTypeCatalog::builtin()?);
//! let mut fields = FieldCollection::new(catalog);
//!
//! let field = fields.add(Geometry::new(0.0, 0.0, 100.0, 20.0)?, &FieldTypeTag::from("TEXT"))?;
//! fields.set_extended_attribute(&field.id, "readOnly", true)?;
//! fields.focus(field.id);
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod catalog;
pub mod collection;
pub mod config;
pub mod defaults;
pub mod error;
pub mod geometry;
pub mod resolver;
pub mod types;

pub use binding::{FieldPatch, FieldPath, FormState};
pub use catalog::{FieldTypeCatalog, FieldTypeCatalogBuilder};
pub use collection::FieldCollection;
pub use config::EditorConfig;
pub use defaults::builtin_field_types;
pub use error::{FieldsError, Result};
pub use geometry::{Geometry, LayoutEngine, ProportionalLayout, ScreenRect, Viewport};
pub use types::{
    AttributeDef, AttributeKind, AttributeValue, ExtendedAttributeSchema, ExtendedAttributes,
    Field, FieldId, FieldTypeDef, FieldTypeTag,
};
