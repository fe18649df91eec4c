use opendma::attributes::{Attribute, Value, ValueKind};
use opendma::common::{attribute, class};
use opendma::error::{OdmaError, Result};
use opendma::names::QualifiedName;
use opendma::projector::{Outcome, Projector};
use opendma::store::AttributeStore;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A bare store that records every attribute lookup.
#[derive(Default)]
struct RecordingStore {
    cells: HashMap<QualifiedName, Rc<Attribute>>,
    classes: Vec<QualifiedName>,
    lookups: RefCell<Vec<QualifiedName>>,
}

impl RecordingStore {
    fn with_class(mut self, class: QualifiedName) -> Self {
        self.classes.push(class);
        self
    }

    fn with_string(mut self, name: QualifiedName, value: &str) -> Self {
        let cell = Attribute::new(name.clone(), ValueKind::String, false, value).unwrap();
        self.cells.insert(name, Rc::new(cell));
        self
    }

    fn lookups(&self) -> Vec<QualifiedName> {
        self.lookups.borrow().clone()
    }
}

impl AttributeStore for RecordingStore {
    fn attribute(&self, name: &QualifiedName) -> Result<Rc<Attribute>> {
        self.lookups.borrow_mut().push(name.clone());
        self.cells
            .get(name)
            .cloned()
            .ok_or_else(|| OdmaError::AttributeNotFound(name.clone()))
    }

    fn prepare_attributes(&self, _names: Option<&[QualifiedName]>, _refresh: bool) -> Result<()> {
        Ok(())
    }

    fn is_dirty(&self) -> bool {
        self.cells.values().any(|cell| cell.is_dirty())
    }

    fn save(&self) -> Result<()> {
        self.cells.values().for_each(|cell| cell.mark_clean());
        Ok(())
    }

    fn instance_of(&self, class_or_aspect: &QualifiedName) -> bool {
        *class_or_aspect == class::OBJECT || self.classes.contains(class_or_aspect)
    }
}

#[test]
fn name_getter_performs_one_lookup_of_the_mapped_attribute() {
    let store = Rc::new(
        RecordingStore::default()
            .with_class(class::CLASS)
            .with_string(attribute::NAME, "Document"),
    );
    let projection = Projector::default().project(store.clone());

    let outcome = projection.invoke("get_Name", None).unwrap();

    assert_eq!(outcome, Outcome::Value(Value::from("Document")));
    assert_eq!(store.lookups(), vec![attribute::NAME]);
}

#[test]
fn qname_with_missing_namespace_is_a_service_error() {
    let store = Rc::new(
        RecordingStore::default()
            .with_class(class::CLASS)
            .with_string(attribute::NAME, "Document"),
    );
    let projection = Projector::default().project(store);

    let err = projection.invoke("get_QName", None).unwrap_err();

    assert!(err.is_contract_violation(), "got {err:?}");
    assert!(!matches!(err, OdmaError::AttributeNotFound(_)));
    let cause = std::error::Error::source(&err).expect("promoted error keeps its cause");
    assert!(cause.to_string().contains("opendma:Namespace"));
}

#[test]
fn qname_with_both_parts_present() {
    let store = Rc::new(
        RecordingStore::default()
            .with_class(class::PROPERTY_INFO)
            .with_string(attribute::NAMESPACE, "com.example")
            .with_string(attribute::NAME, "Color"),
    );
    let projection = Projector::default().project(store);
    assert_eq!(
        projection.invoke("get_QName", None).unwrap(),
        Outcome::QName(QualifiedName::new("com.example", "Color").unwrap())
    );
}

#[test]
fn accessor_absent_from_table_is_unsupported() {
    let store = Rc::new(RecordingStore::default().with_class(class::DOCUMENT));
    let projection = Projector::default().project(store.clone());

    let err = projection.invoke("get_Colour", None).unwrap_err();

    assert!(matches!(err, OdmaError::Unsupported(ref m) if m == "get_Colour"));
    assert!(store.lookups().is_empty());
}

#[test]
fn facade_passes_core_operations_through() {
    let store = Rc::new(
        RecordingStore::default()
            .with_class(class::DOCUMENT)
            .with_string(attribute::TITLE, "Draft"),
    );
    let projection = Projector::default().project(store.clone());

    projection
        .set_attribute(&attribute::TITLE, Value::from("Final"))
        .unwrap();
    assert!(projection.is_dirty());
    assert!(store.is_dirty());
    projection.save().unwrap();
    assert!(!store.is_dirty());
    assert!(projection.instance_of(&class::DOCUMENT));
    assert!(!projection.instance_of(&class::FOLDER));
}

#[test]
fn wrong_kind_is_promoted_for_getters_and_setters() {
    let mut store = RecordingStore::default().with_class(class::DOCUMENT);
    store.cells.insert(
        attribute::CHECKED_OUT,
        Rc::new(Attribute::new(attribute::CHECKED_OUT, ValueKind::String, false, "yes").unwrap()),
    );
    let store = Rc::new(store.with_string(attribute::TITLE, "Draft"));
    let projection = Projector::default().project(store.clone());

    assert!(projection.get("CheckedOut").unwrap_err().is_contract_violation());

    let err = projection.set("Title", Value::from(true)).unwrap_err();
    assert!(err.is_contract_violation(), "{err:?}");
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.to_string().starts_with("Invalid kind"), "{source}");
    assert!(!store.lookups().contains(&attribute::TITLE));
    assert!(!store.is_dirty());
}
