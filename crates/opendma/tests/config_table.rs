use opendma::attributes::{Value, ValueKind};
use opendma::config::{OdmaConfig, CONFIG_FILE};
use opendma::error::OdmaError;
use opendma::names::{LocalId, QualifiedName};
use opendma::projector::{Projector, RegistrationTable};
use opendma::store::memory::{AttributeData, MemoryObject};
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;

const COLORED: &str = r#"
[[accessors]]
accessor = "Color"
attribute = "com.example:Color"
kind = "String"
writable = true

[[interfaces]]
name = "Colored"
class = "com.example:Colored"
accessors = ["Color"]
"#;

fn write_config(dir: &TempDir, text: &str) {
    fs::write(dir.path().join(CONFIG_FILE), text).unwrap();
}

fn colored_object() -> Rc<MemoryObject> {
    Rc::new(
        MemoryObject::new(LocalId::new("swatch").unwrap())
            .with_class(QualifiedName::new("com.example", "Colored").unwrap())
            .with_attribute(
                QualifiedName::new("com.example", "Color").unwrap(),
                AttributeData::value(ValueKind::String, false, "teal".to_string()),
            )
            .unwrap(),
    )
}

#[test]
fn configured_accessor_is_dispatchable() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, COLORED);

    let config = OdmaConfig::load(&[dir.path().to_path_buf()]).unwrap();
    let table = RegistrationTable::from_config(&config).unwrap();
    let projection = Projector::new(table).project(colored_object());

    assert!(projection.implements("Colored"));
    assert!(projection.implements("Object"));
    assert_eq!(projection.get("Color").unwrap(), Value::from("teal"));
    projection.set("Color", Value::from("navy")).unwrap();
    assert_eq!(projection.get("Color").unwrap(), Value::from("navy"));
    assert_eq!(
        projection.get_as::<LocalId>("Id").unwrap(),
        Some(LocalId::new("swatch").unwrap())
    );
}

#[test]
fn missing_file_yields_builtin_table() {
    let dir = TempDir::new().unwrap();
    let config = OdmaConfig::load(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(config.accessor_count(), 0);
    let table = RegistrationTable::from_config(&config).unwrap();
    assert_eq!(table, RegistrationTable::builtin());
}

#[test]
fn later_directories_override_earlier_ones() {
    let global = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write_config(&global, COLORED);
    write_config(&project, "include_builtin = false\n");

    let config =
        OdmaConfig::load(&[global.path().to_path_buf(), project.path().to_path_buf()]).unwrap();
    assert!(!config.include_builtin);
    assert_eq!(config.accessor_count(), 1);
}

#[test]
fn table_without_builtin_has_no_base_interface() {
    let config = OdmaConfig::from_toml(&format!("include_builtin = false\n{}", COLORED)).unwrap();
    let table = RegistrationTable::from_config(&config).unwrap();
    assert_eq!(table.base(), None);
    assert!(table.accessor("Title").is_none());

    let projection = Projector::new(table).project(colored_object());
    assert!(matches!(projection.get("Id"), Err(OdmaError::Unsupported(_))));
    assert_eq!(projection.get("Color").unwrap(), Value::from("teal"));
}

#[test]
fn dangling_interface_reference_is_rejected() {
    let text = r#"
        [[interfaces]]
        name = "Swatch"
        class = "com.example:Swatch"
        extends = ["Palette"]
        accessors = ["Title"]
    "#;
    let config = OdmaConfig::from_toml(text).unwrap();
    assert!(matches!(
        RegistrationTable::from_config(&config),
        Err(OdmaError::InvalidTable(_))
    ));
}

#[test]
fn configured_interface_can_extend_a_builtin_one() {
    let text = r#"
        [[interfaces]]
        name = "Invoice"
        class = "com.example:Invoice"
        extends = ["Document"]
        accessors = []
    "#;
    let config = OdmaConfig::from_toml(text).unwrap();
    let table = RegistrationTable::from_config(&config).unwrap();
    let invoice = Rc::new(
        MemoryObject::new(LocalId::new("inv-1").unwrap())
            .with_class(QualifiedName::new("com.example", "Invoice").unwrap())
            .with_attribute(
                opendma::common::attribute::TITLE,
                AttributeData::value(ValueKind::String, false, "March".to_string()),
            )
            .unwrap(),
    );
    let projection = Projector::new(table).project(invoice);
    assert!(projection.implements("Document"));
    assert!(projection.implements("AuditStamped"));
    assert_eq!(projection.get("Title").unwrap(), Value::from("March"));
}
