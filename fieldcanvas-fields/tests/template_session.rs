//! End-to-end editing session scenarios

use std::sync::Arc;

use fieldcanvas_fields::{
    AttributeValue, EditorConfig, ExtendedAttributes, FieldCollection, FieldPatch, FieldPath,
    FieldTypeCatalog, FieldTypeTag, FieldsError, FormState, Geometry, LayoutEngine,
    ProportionalLayout, Viewport,
};
use serde_json::json;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Route library logs to the test output, filtered by `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn session() -> FieldCollection {
    FieldCollection::new(Arc::new(FieldTypeCatalog::builtin().unwrap()))
}

fn text() -> FieldTypeTag {
    FieldTypeTag::from("TEXT")
}

fn geometry() -> Geometry {
    Geometry::new(0.0, 0.0, 100.0, 20.0).unwrap()
}

#[test]
fn add_text_then_mark_read_only() {
    init_tracing();
    let mut fields = session();

    let field = fields.add(geometry(), &text()).unwrap();
    let mut expected = ExtendedAttributes::new();
    expected.insert("defaultValue".into(), AttributeValue::from(""));
    expected.insert("readOnly".into(), AttributeValue::from(false));
    assert_eq!(field.extended_attributes, expected);

    fields
        .set_extended_attribute(&field.id, "readOnly", true)
        .unwrap();
    expected.insert("readOnly".into(), AttributeValue::from(true));
    assert_eq!(fields.get(&field.id).unwrap().extended_attributes, expected);
}

#[test]
fn removing_first_field_shifts_second() {
    let mut fields = session();
    let a = fields.add(geometry(), &text()).unwrap();
    let b = fields.add(geometry(), &text()).unwrap();

    assert_eq!(fields.index_of(&a.id), Some(0));
    assert_eq!(fields.index_of(&b.id), Some(1));

    fields.remove(&a.id);
    assert_eq!(fields.index_of(&b.id), Some(0));
}

#[test]
fn unknown_type_change_is_rejected_without_partial_mutation() {
    let mut fields = session();
    let field = fields.add(geometry(), &FieldTypeTag::from("DATE")).unwrap();

    fields.set_type(&field.id, &text()).unwrap();
    let before = fields.get(&field.id).unwrap().clone();

    let err = fields
        .set_type(&field.id, &FieldTypeTag::from("UNKNOWN_TYPE"))
        .unwrap_err();
    assert!(matches!(err, FieldsError::UnknownType { .. }));

    let after = fields.get(&field.id).unwrap();
    assert_eq!(after.type_, text());
    assert_eq!(after.extended_attributes, before.extended_attributes);
}

#[test]
fn deleting_focused_field_races_with_reset() {
    init_tracing();
    let mut fields = session();
    let field = fields.add(geometry(), &text()).unwrap();
    fields.focus(field.id);

    // The collection is reset before the delete action lands
    fields.reset();
    assert!(fields.remove(&field.id).is_none());
    assert!(!fields.is_focused(&field.id));

    // A late edit for the same field is a recoverable miss
    let err = fields.set_name(&field.id, "late").unwrap_err();
    assert!(err.is_recoverable());
}

#[test]
fn focus_moves_between_fields() {
    let mut fields = session();
    let a = fields.add(geometry(), &text()).unwrap();
    let b = fields.add(geometry(), &text()).unwrap();

    fields.focus(a.id);
    fields.focus(b.id);
    assert!(!fields.is_focused(&a.id));
    assert!(fields.is_focused(&b.id));

    fields.clear_focus();
    assert!(fields.focused_field().is_none());
}

#[test]
fn form_binding_round_trip_by_index() {
    let mut fields = session();
    fields.add(geometry(), &text()).unwrap();
    fields.add(geometry(), &FieldTypeTag::from("SIGNATURE")).unwrap();

    fields
        .write_field(
            1,
            FieldPatch::new()
                .with_type("TEXT")
                .with_name("Witness")
                .with_attribute("defaultValue", "N/A"),
        )
        .unwrap();

    assert_eq!(fields.watch(1, &"name".parse::<FieldPath>().unwrap()).unwrap(), json!("Witness"));
    assert_eq!(
        fields
            .watch(1, &"defaultValue".parse::<FieldPath>().unwrap())
            .unwrap(),
        json!("N/A")
    );
    assert_eq!(fields.read_field(1).unwrap().type_, text());
}

#[test]
fn geometry_renders_at_current_viewport() {
    let config = EditorConfig::default();
    let mut fields = session();
    let field = fields
        .add(Geometry::new(59.5, 84.2, 119.0, 42.1).unwrap(), &text())
        .unwrap();

    let current = Viewport::new(1190.0, 1684.0).unwrap();
    let rect = ProportionalLayout.to_screen_rect(
        &fields.get(&field.id).unwrap().geometry,
        config.reference_viewport,
        current,
    );
    assert!((rect.left - 119.0).abs() < 1e-9);
    assert!((rect.top - 168.4).abs() < 1e-9);
    assert!((rect.width - 238.0).abs() < 1e-9);
    assert!((rect.height - 84.2).abs() < 1e-9);
}

#[test]
fn custom_catalog_type_needs_no_collection_changes() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("types.yaml");
    std::fs::write(
        &path,
        r#"
- tag: DROPDOWN
  label: Dropdown
  icon: chevron-down
  attributes:
    - name: readOnly
      kind: boolean
    - name: placeholder
      kind: text
      default: Select an option
"#,
    )
    .unwrap();

    let config = EditorConfig {
        catalog_file: Some(path),
        ..EditorConfig::default()
    };
    let catalog = Arc::new(FieldTypeCatalog::from_config(&config).unwrap());
    let mut fields = FieldCollection::new(catalog);

    let field = fields.add(geometry(), &text()).unwrap();
    fields.set_extended_attribute(&field.id, "readOnly", true).unwrap();
    fields
        .set_type(&field.id, &FieldTypeTag::from("DROPDOWN"))
        .unwrap();

    let field = fields.get(&field.id).unwrap();
    assert_eq!(field.attribute("readOnly"), Some(&AttributeValue::from(true)));
    assert_eq!(
        field.attribute("placeholder"),
        Some(&AttributeValue::from("Select an option"))
    );
    assert!(field.attribute("defaultValue").is_none());
}

#[test]
fn empty_names_are_reported_not_rejected() {
    let mut fields = session();
    let a = fields.add(geometry(), &text()).unwrap();
    let b = fields.add(geometry(), &text()).unwrap();
    fields.set_name(&b.id, "Date of birth").unwrap();

    assert_eq!(fields.unnamed(), vec![a.id]);
}
