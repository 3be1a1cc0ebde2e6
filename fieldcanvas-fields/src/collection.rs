//! FieldCollection: the ordered set of fields placed on a template.
//!
//! Order is z/tab order and is preserved across every mutation; removing a
//! field shifts the ones after it down by one. An id → position index gives
//! O(1) lookup by stable id alongside positional access.
//!
//! The collection owns the session's focus so that removing the focused
//! field clears the focus in the same step.

use std::collections::HashMap;
use std::sync::Arc;

use fieldcanvas_focus::FocusController;
use tracing::{debug, trace};

use crate::catalog::FieldTypeCatalog;
use crate::error::{FieldsError, Result};
use crate::geometry::Geometry;
use crate::resolver;
use crate::types::{AttributeValue, Field, FieldId, FieldTypeTag};

/// Fields of one template editing session.
#[derive(Debug, Clone)]
pub struct FieldCollection {
    catalog: Arc<FieldTypeCatalog>,
    fields: Vec<Field>,
    id_index: HashMap<FieldId, usize>,
    focus: FocusController<FieldId>,
}

impl FieldCollection {
    /// Start an empty session against `catalog`.
    pub fn new(catalog: Arc<FieldTypeCatalog>) -> Self {
        Self {
            catalog,
            fields: Vec::new(),
            id_index: HashMap::new(),
            focus: FocusController::new(),
        }
    }

    pub fn catalog(&self) -> &FieldTypeCatalog {
        &self.catalog
    }

    // --- Mutation ---

    /// Place a new field at the end of the order.
    ///
    /// The field gets a fresh id, an empty name and the default attributes
    /// of `initial_type`. Focus is left as it is.
    pub fn add(&mut self, geometry: Geometry, initial_type: &FieldTypeTag) -> Result<Field> {
        let extended_attributes = resolver::defaults(&self.catalog, initial_type)?;
        let id = self.fresh_id();

        let field = Field {
            id,
            type_: initial_type.clone(),
            name: String::new(),
            geometry,
            extended_attributes,
        };

        let index = self.fields.len();
        self.fields.push(field.clone());
        self.id_index.insert(id, index);

        debug!(field_id = %id, field_type = %initial_type, index, "field added");
        Ok(field)
    }

    /// Delete a field. Absent ids are a no-op.
    ///
    /// Clears the focus if it pointed at the removed field.
    pub fn remove(&mut self, id: &FieldId) -> Option<Field> {
        let Some(index) = self.id_index.remove(id) else {
            trace!(field_id = %id, "remove of absent field ignored");
            return None;
        };

        let removed = self.fields.remove(index);
        self.reindex_from(index);

        if self.focus.release(id) {
            debug!(field_id = %id, "focused field removed, focus cleared");
        }
        debug!(field_id = %id, index, "field removed");
        Some(removed)
    }

    /// Change a field's type and reconcile its attribute bag.
    ///
    /// Nothing is modified if the type is unknown or the field is absent.
    pub fn set_type(&mut self, id: &FieldId, new_type: &FieldTypeTag) -> Result<()> {
        // Validate the target type before touching the field.
        self.catalog.require(new_type)?;
        let index = self.require_index(id)?;

        let field = &self.fields[index];
        let reconciled = resolver::reconcile(
            &self.catalog,
            &field.type_,
            new_type,
            &field.extended_attributes,
        )?;

        let field = &mut self.fields[index];
        let old_type = std::mem::replace(&mut field.type_, new_type.clone());
        field.extended_attributes = reconciled;

        debug!(field_id = %id, from = %old_type, to = %new_type, "field type changed");
        Ok(())
    }

    /// Rename a field. Empty names are accepted.
    pub fn set_name(&mut self, id: &FieldId, name: impl Into<String>) -> Result<()> {
        let index = self.require_index(id)?;
        self.fields[index].name = name.into();
        trace!(field_id = %id, "field renamed");
        Ok(())
    }

    /// Set one extended attribute, validated against the field's current type.
    pub fn set_extended_attribute(
        &mut self,
        id: &FieldId,
        key: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        let index = self.require_index(id)?;
        let value = value.into();
        resolver::validate(&self.catalog, &self.fields[index].type_, key, &value)?;

        self.fields[index]
            .extended_attributes
            .insert(key.to_string(), value);
        debug!(field_id = %id, key, "extended attribute set");
        Ok(())
    }

    /// Store new normalized geometry after a move or resize.
    pub fn set_geometry(&mut self, id: &FieldId, geometry: Geometry) -> Result<()> {
        let index = self.require_index(id)?;
        self.fields[index].geometry = geometry;
        trace!(field_id = %id, ?geometry, "field geometry updated");
        Ok(())
    }

    /// Remove every field and clear the focus.
    pub fn reset(&mut self) {
        self.fields.clear();
        self.id_index.clear();
        self.focus.clear();
        debug!("field collection reset");
    }

    // --- Access ---

    pub fn get(&self, id: &FieldId) -> Option<&Field> {
        self.id_index.get(id).map(|&i| &self.fields[i])
    }

    /// Position of `id` in z/tab order.
    pub fn index_of(&self, id: &FieldId) -> Option<usize> {
        self.id_index.get(id).copied()
    }

    /// Field at `index` in z/tab order.
    pub fn at(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.fields.iter().map(|f| f.id)
    }

    pub fn as_slice(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, id: &FieldId) -> bool {
        self.id_index.contains_key(id)
    }

    /// Fields whose name is empty or whitespace, for submission-time checks.
    pub fn unnamed(&self) -> Vec<FieldId> {
        self.fields
            .iter()
            .filter(|f| !f.has_name())
            .map(|f| f.id)
            .collect()
    }

    // --- Focus ---

    /// Focus `id`. The id is not checked against the collection.
    pub fn focus(&mut self, id: FieldId) {
        self.focus.focus(id);
    }

    pub fn clear_focus(&mut self) {
        self.focus.clear();
    }

    pub fn is_focused(&self, id: &FieldId) -> bool {
        self.focus.is_focused(id)
    }

    pub fn focused_id(&self) -> Option<&FieldId> {
        self.focus.focused()
    }

    /// The focused field, or `None` if nothing is focused or the focused id
    /// is no longer in the collection.
    pub fn focused_field(&self) -> Option<&Field> {
        self.focus.focused().and_then(|id| self.get(id))
    }

    // --- Internal ---

    /// Replace the field at `index` with an already validated version of it.
    pub(crate) fn commit(&mut self, index: usize, field: Field) {
        debug_assert_eq!(self.fields[index].id, field.id);
        self.fields[index] = field;
    }

    pub(crate) fn require_at(&self, index: usize) -> Result<&Field> {
        self.fields.get(index).ok_or(FieldsError::IndexOutOfBounds {
            index,
            len: self.fields.len(),
        })
    }

    fn require_index(&self, id: &FieldId) -> Result<usize> {
        self.index_of(id).ok_or_else(|| FieldsError::not_found(id))
    }

    /// ULIDs carry a millisecond timestamp and 80 random bits, so ids of
    /// removed fields do not come back without tracking them.
    fn fresh_id(&self) -> FieldId {
        loop {
            let id = FieldId::new();
            if !self.id_index.contains_key(&id) {
                return id;
            }
        }
    }

    fn reindex_from(&mut self, start: usize) {
        for (offset, field) in self.fields[start..].iter().enumerate() {
            self.id_index.insert(field.id, start + offset);
        }
    }
}
