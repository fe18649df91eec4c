//! In-memory objects and repositories.
//!
//! A [`MemoryObject`] keeps two layers: the *backing* data, standing in for
//! what a remote system would hold, and the *materialized* cells handed out
//! to callers. Moving data from the first to the second is a round trip and
//! is counted, so tests can check that batch preparation is amortized.
//!
//! Reference attributes are backed by object ids. They materialize as lazy
//! cells that know the target id up front and look the target up in the
//! owning [`MemoryRepository`] only when the value is forced.

use crate::attributes::{
    Attribute, LazyValueProvider, List, ObjectRef, Scalar, Value, ValueKind,
};
use crate::common::{attribute, class};
use crate::error::{OdmaError, Result};
use crate::names::{GlobalId, LocalId, QualifiedName};
use crate::store::AttributeStore;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::rc::{Rc, Weak};
use tracing::debug;

#[derive(Debug, Clone)]
enum Stored {
    Value(Value),
    Reference(Option<LocalId>),
    References(Vec<LocalId>),
}

/// Backing data of one attribute.
#[derive(Debug, Clone)]
pub struct AttributeData {
    kind: ValueKind,
    multi_value: bool,
    read_only: bool,
    stored: Stored,
}

impl AttributeData {
    /// A concrete value. It is checked against `kind` and `multi_value` when
    /// added to an object.
    pub fn value(kind: ValueKind, multi_value: bool, value: impl Into<Value>) -> Self {
        Self {
            kind,
            multi_value,
            read_only: false,
            stored: Stored::Value(value.into()),
        }
    }

    /// A single reference to the object with id `target` in the same repository.
    pub fn reference(target: Option<LocalId>) -> Self {
        Self {
            kind: ValueKind::Reference,
            multi_value: false,
            read_only: false,
            stored: Stored::Reference(target),
        }
    }

    /// A list of references to objects in the same repository.
    pub fn references(targets: Vec<LocalId>) -> Self {
        Self {
            kind: ValueKind::Reference,
            multi_value: true,
            read_only: false,
            stored: Stored::References(targets),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// An object held in memory, implementing [`AttributeStore`].
#[derive(Debug)]
pub struct MemoryObject {
    id: LocalId,
    repository: Option<LocalId>,
    classes: Vec<QualifiedName>,
    backing: RefCell<BTreeMap<QualifiedName, AttributeData>>,
    cells: RefCell<HashMap<QualifiedName, Rc<Attribute>>>,
    table: Weak<ObjectTable>,
    round_trips: Cell<usize>,
    lookups: Cell<usize>,
    simulate_save_error: Cell<bool>,
}

impl MemoryObject {
    /// A detached object exposing only its read-only `opendma:Id`.
    pub fn new(id: LocalId) -> Self {
        let mut backing = BTreeMap::new();
        backing.insert(
            attribute::ID,
            AttributeData {
                kind: ValueKind::Id,
                multi_value: false,
                read_only: true,
                stored: Stored::Value(Value::from(id.clone())),
            },
        );
        Self {
            id,
            repository: None,
            classes: Vec::new(),
            backing: RefCell::new(backing),
            cells: RefCell::new(HashMap::new()),
            table: Weak::new(),
            round_trips: Cell::new(0),
            lookups: Cell::new(0),
            simulate_save_error: Cell::new(false),
        }
    }

    /// Declares a class or aspect the object is an instance of.
    pub fn with_class(mut self, class_or_aspect: QualifiedName) -> Self {
        if !self.classes.contains(&class_or_aspect) {
            self.classes.push(class_or_aspect);
        }
        self
    }

    /// Adds backing data for `name`, replacing any previous data.
    pub fn with_attribute(self, name: QualifiedName, data: AttributeData) -> Result<Self> {
        if let Stored::Value(value) = &data.stored {
            Attribute::new(name.clone(), data.kind, data.multi_value, value.clone())?;
        }
        self.backing.borrow_mut().insert(name, data);
        Ok(self)
    }

    pub fn id(&self) -> &LocalId {
        &self.id
    }

    /// The owning repository, once inserted into one.
    pub fn repository_id(&self) -> Option<&LocalId> {
        self.repository.as_ref()
    }

    pub fn classes(&self) -> &[QualifiedName] {
        &self.classes
    }

    /// Number of fetches from the backing data so far.
    pub fn round_trips(&self) -> usize {
        self.round_trips.get()
    }

    /// Number of [`AttributeStore::attribute`] calls so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.get()
    }

    /// Makes the next saves fail, for testing error handling.
    pub fn set_simulate_save_error(&self, simulate: bool) {
        self.simulate_save_error.set(simulate);
    }

    fn materialize(&self, name: &QualifiedName, data: &AttributeData) -> Result<Attribute> {
        let cell = match &data.stored {
            Stored::Value(value) => {
                Attribute::new(name.clone(), data.kind, data.multi_value, value.clone())?
            }
            Stored::Reference(target) => Attribute::lazy(
                name.clone(),
                ValueKind::Reference,
                false,
                Rc::new(ReferenceProvider {
                    table: self.table.clone(),
                    targets: Targets::One(target.clone()),
                }),
            ),
            Stored::References(targets) => Attribute::lazy(
                name.clone(),
                ValueKind::Reference,
                true,
                Rc::new(ReferenceProvider {
                    table: self.table.clone(),
                    targets: Targets::Many(targets.clone()),
                }),
            ),
        };
        Ok(if data.read_only { cell.read_only() } else { cell })
    }

    fn fetch(&self, names: &[&QualifiedName]) -> Result<Vec<(QualifiedName, Rc<Attribute>)>> {
        self.round_trips.set(self.round_trips.get() + 1);
        debug!(object = %self.id, count = names.len(), "fetching attributes");
        let backing = self.backing.borrow();
        names
            .iter()
            .filter_map(|name| backing.get(*name).map(|data| (*name, data)))
            .map(|(name, data)| Ok((name.clone(), Rc::new(self.materialize(name, data)?))))
            .collect()
    }
}

impl AttributeStore for MemoryObject {
    fn attribute(&self, name: &QualifiedName) -> Result<Rc<Attribute>> {
        self.lookups.set(self.lookups.get() + 1);
        if let Some(cell) = self.cells.borrow().get(name) {
            return Ok(Rc::clone(cell));
        }
        if !self.backing.borrow().contains_key(name) {
            return Err(OdmaError::AttributeNotFound(name.clone()));
        }
        let mut fetched = self.fetch(&[name])?;
        let (name, cell) = fetched
            .pop()
            .ok_or_else(|| OdmaError::AttributeNotFound(name.clone()))?;
        self.cells.borrow_mut().insert(name, Rc::clone(&cell));
        Ok(cell)
    }

    fn prepare_attributes(&self, names: Option<&[QualifiedName]>, refresh: bool) -> Result<()> {
        let wanted: Vec<QualifiedName> = {
            let backing = self.backing.borrow();
            let cells = self.cells.borrow();
            let candidates: Vec<&QualifiedName> = match names {
                Some(names) => names.iter().filter(|n| backing.contains_key(*n)).collect(),
                None => backing.keys().collect(),
            };
            candidates
                .into_iter()
                .filter(|name| refresh || !cells.contains_key(*name))
                .cloned()
                .collect()
        };
        if wanted.is_empty() {
            return Ok(());
        }
        let refs: Vec<&QualifiedName> = wanted.iter().collect();
        let fetched = self.fetch(&refs)?;
        self.cells.borrow_mut().extend(fetched);
        Ok(())
    }

    fn is_dirty(&self) -> bool {
        self.cells.borrow().values().any(|cell| cell.is_dirty())
    }

    fn save(&self) -> Result<()> {
        if self.simulate_save_error.get() {
            return Err(OdmaError::Io(io::Error::other("simulated save failure")));
        }
        let dirty: Vec<Rc<Attribute>> = self
            .cells
            .borrow()
            .values()
            .filter(|cell| cell.is_dirty())
            .cloned()
            .collect();
        if dirty.is_empty() {
            return Ok(());
        }

        let mut updates = Vec::with_capacity(dirty.len());
        for cell in &dirty {
            updates.push((cell.name().clone(), stored_from_cell(cell)?));
        }
        {
            let mut backing = self.backing.borrow_mut();
            for (name, stored) in updates {
                if let Some(data) = backing.get_mut(&name) {
                    data.stored = stored;
                }
            }
        }
        for cell in &dirty {
            cell.mark_clean();
        }
        debug!(object = %self.id, saved = dirty.len(), "saved attributes");
        Ok(())
    }

    fn instance_of(&self, class_or_aspect: &QualifiedName) -> bool {
        *class_or_aspect == class::OBJECT || self.classes.contains(class_or_aspect)
    }
}

fn stored_from_cell(cell: &Attribute) -> Result<Stored> {
    let value = cell.get_value()?;
    if cell.kind() != ValueKind::Reference {
        return Ok(Stored::Value(value));
    }
    let target_id = |target: &ObjectRef| {
        target.id()?.ok_or_else(|| {
            OdmaError::service(format!(
                "Referenced object in `{}` has no opendma:Id",
                cell.name()
            ))
        })
    };
    match value {
        Value::Null => Ok(Stored::Reference(None)),
        Value::Scalar(Scalar::Reference(target)) => {
            Ok(Stored::Reference(Some(target_id(&target)?)))
        }
        Value::List(List::Reference(targets)) => targets
            .iter()
            .map(target_id)
            .collect::<Result<Vec<_>>>()
            .map(Stored::References),
        other => Err(OdmaError::InvalidKind(format!(
            "attribute `{}` cannot store a {} value",
            cell.name(),
            other.describe()
        ))),
    }
}

#[derive(Debug)]
struct ObjectTable {
    repository: LocalId,
    objects: RefCell<HashMap<LocalId, Rc<MemoryObject>>>,
}

impl ObjectTable {
    fn lookup(&self, id: &LocalId) -> Result<Rc<MemoryObject>> {
        self.objects
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| {
                OdmaError::ObjectNotFound(GlobalId::new(id.clone(), self.repository.clone()))
            })
    }
}

enum Targets {
    One(Option<LocalId>),
    Many(Vec<LocalId>),
}

struct ReferenceProvider {
    table: Weak<ObjectTable>,
    targets: Targets,
}

impl LazyValueProvider for ReferenceProvider {
    fn has_reference_id(&self) -> bool {
        matches!(self.targets, Targets::One(_))
    }

    fn reference_id(&self) -> Option<LocalId> {
        match &self.targets {
            Targets::One(target) => target.clone(),
            Targets::Many(_) => None,
        }
    }

    fn resolve_value(&self) -> Result<Value> {
        if let Targets::One(None) = self.targets {
            return Ok(Value::Null);
        }
        let table = self
            .table
            .upgrade()
            .ok_or_else(|| OdmaError::service("Referencing object is not attached to a repository"))?;
        let as_ref = |id: &LocalId| -> Result<ObjectRef> {
            let target: Rc<dyn AttributeStore> = table.lookup(id)?;
            Ok(ObjectRef::new(target))
        };
        match &self.targets {
            Targets::One(Some(id)) => as_ref(id).map(Value::from),
            Targets::One(None) => Ok(Value::Null),
            Targets::Many(ids) => ids
                .iter()
                .map(as_ref)
                .collect::<Result<Vec<_>>>()
                .map(Value::from),
        }
    }
}

/// A repository of [`MemoryObject`]s.
///
/// The repository is itself an object (class `opendma:Repository`) stored
/// under the repository id. Objects hold only weak links back to the
/// repository: references stop resolving once it is dropped.
#[derive(Debug)]
pub struct MemoryRepository {
    table: Rc<ObjectTable>,
}

impl MemoryRepository {
    pub fn new(id: LocalId, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let root = MemoryObject::new(id)
            .with_class(class::REPOSITORY)
            .with_attribute(
                attribute::NAME,
                AttributeData::value(ValueKind::String, false, name.clone()),
            )?
            .with_attribute(
                attribute::DISPLAY_NAME,
                AttributeData::value(ValueKind::String, false, name),
            )?;
        Self::with_root(root)
    }

    /// A repository whose own object is `root`.
    pub fn with_root(root: MemoryObject) -> Result<Self> {
        let repo = Self {
            table: Rc::new(ObjectTable {
                repository: root.id.clone(),
                objects: RefCell::new(HashMap::new()),
            }),
        };
        repo.insert(root)?;
        Ok(repo)
    }

    pub fn id(&self) -> &LocalId {
        &self.table.repository
    }

    /// Adds an object, giving it `opendma:Guid` and `opendma:Repository`
    /// unless it already has them.
    pub fn insert(&self, mut object: MemoryObject) -> Result<Rc<MemoryObject>> {
        if self.table.objects.borrow().contains_key(&object.id) {
            return Err(OdmaError::Fixture(format!(
                "object `{}` already exists in repository `{}`",
                object.id,
                self.id()
            )));
        }
        let guid = GlobalId::new(object.id.clone(), self.id().clone());
        {
            let backing = object.backing.get_mut();
            backing.entry(attribute::GUID).or_insert(AttributeData {
                kind: ValueKind::Guid,
                multi_value: false,
                read_only: true,
                stored: Stored::Value(Value::from(guid)),
            });
            backing
                .entry(attribute::REPOSITORY)
                .or_insert_with(|| AttributeData::reference(Some(self.id().clone())).read_only());
        }
        object.repository = Some(self.id().clone());
        object.table = Rc::downgrade(&self.table);

        let object = Rc::new(object);
        self.table
            .objects
            .borrow_mut()
            .insert(object.id.clone(), Rc::clone(&object));
        Ok(object)
    }

    pub fn get(&self, id: &LocalId) -> Result<Rc<MemoryObject>> {
        self.table.lookup(id)
    }

    /// The repository's own object.
    pub fn root(&self) -> Result<Rc<MemoryObject>> {
        self.table.lookup(self.id())
    }

    /// All objects, the repository object included, ordered by id.
    pub fn objects(&self) -> Vec<Rc<MemoryObject>> {
        let mut objects: Vec<_> = self.table.objects.borrow().values().cloned().collect();
        objects.sort_by(|a, b| a.id.cmp(&b.id));
        objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::ResolutionState;

    fn id(s: &str) -> LocalId {
        LocalId::new(s).unwrap()
    }

    fn document(object_id: &str) -> MemoryObject {
        MemoryObject::new(id(object_id))
            .with_class(class::DOCUMENT)
            .with_attribute(
                attribute::TITLE,
                AttributeData::value(ValueKind::String, false, "Report"),
            )
            .unwrap()
            .with_attribute(
                attribute::VERSION,
                AttributeData::value(ValueKind::String, false, "1.0"),
            )
            .unwrap()
            .with_attribute(
                attribute::CHECKED_OUT,
                AttributeData::value(ValueKind::Boolean, false, false),
            )
            .unwrap()
    }

    #[test]
    fn attribute_data_is_validated_on_insert() {
        let obj = MemoryObject::new(id("d1"));
        let err = obj
            .with_attribute(attribute::TITLE, AttributeData::value(ValueKind::String, false, 3i32))
            .unwrap_err();
        assert!(err.to_string().contains("opendma:Title"));

        let obj = MemoryObject::new(id("d1"));
        assert!(obj
            .with_attribute(attribute::TITLE, AttributeData::value(ValueKind::String, true, Value::Null))
            .is_err());
    }

    #[test]
    fn unknown_attribute_is_not_found() {
        let obj = document("d1");
        let missing = QualifiedName::new("x", "Nope").unwrap();
        assert!(matches!(
            obj.attribute(&missing),
            Err(OdmaError::AttributeNotFound(name)) if name == missing
        ));
        assert_eq!(obj.round_trips(), 0);
    }

    #[test]
    fn on_demand_fetch_costs_one_round_trip_per_attribute() {
        let obj = document("d1");
        obj.attribute(&attribute::TITLE).unwrap();
        obj.attribute(&attribute::VERSION).unwrap();
        obj.attribute(&attribute::TITLE).unwrap();
        assert_eq!(obj.round_trips(), 2);
        assert_eq!(obj.lookup_count(), 3);
    }

    #[test]
    fn batch_prepare_costs_one_round_trip() {
        let obj = document("d1");
        obj.prepare_attributes(None, false).unwrap();
        assert_eq!(obj.round_trips(), 1);
        obj.attribute(&attribute::TITLE).unwrap();
        obj.attribute(&attribute::VERSION).unwrap();
        obj.attribute(&attribute::CHECKED_OUT).unwrap();
        obj.attribute(&attribute::ID).unwrap();
        assert_eq!(obj.round_trips(), 1);
    }

    #[test]
    fn prepare_ignores_unknown_names_and_skips_present_cells() {
        let obj = document("d1");
        let unknown = QualifiedName::new("x", "Nope").unwrap();
        obj.prepare_attributes(Some(&[attribute::TITLE, unknown.clone()]), false)
            .unwrap();
        assert_eq!(obj.round_trips(), 1);

        obj.prepare_attributes(Some(&[attribute::TITLE]), false).unwrap();
        obj.prepare_attributes(Some(&[unknown]), false).unwrap();
        assert_eq!(obj.round_trips(), 1);
    }

    #[test]
    fn refresh_discards_local_changes() {
        let obj = document("d1");
        obj.set_attribute(&attribute::TITLE, Value::from("Draft")).unwrap();
        assert!(obj.is_dirty());

        obj.prepare_attributes(Some(&[attribute::TITLE]), true).unwrap();
        assert!(!obj.is_dirty());
        let title = obj.attribute(&attribute::TITLE).unwrap();
        assert_eq!(title.get_string().unwrap().as_deref(), Some("Report"));
    }

    #[test]
    fn save_writes_back_and_cleans() {
        let obj = document("d1");
        obj.set_attribute(&attribute::TITLE, Value::from("Final")).unwrap();
        obj.save().unwrap();
        assert!(!obj.is_dirty());

        obj.prepare_attributes(None, true).unwrap();
        let title = obj.attribute(&attribute::TITLE).unwrap();
        assert_eq!(title.get_string().unwrap().as_deref(), Some("Final"));
    }

    #[test]
    fn saving_a_reference_to_an_object_without_id_fails() {
        let obj = document("d1")
            .with_attribute(attribute::PARENT, AttributeData::reference(None))
            .unwrap();
        let anonymous = MemoryObject::new(id("anon"))
            .with_attribute(
                attribute::ID,
                AttributeData::value(ValueKind::Id, false, Value::Null),
            )
            .unwrap();
        let target = ObjectRef::new(Rc::new(anonymous));
        obj.set_attribute(&attribute::PARENT, Value::from(Some(target)))
            .unwrap();

        let err = obj.save().unwrap_err();
        assert!(err.is_contract_violation(), "{err:?}");
        assert!(obj.is_dirty());
    }

    #[test]
    fn failed_save_keeps_changes_dirty() {
        let obj = document("d1");
        obj.set_attribute(&attribute::TITLE, Value::from("Final")).unwrap();
        obj.set_simulate_save_error(true);
        assert!(matches!(obj.save(), Err(OdmaError::Io(_))));
        assert!(obj.is_dirty());
    }

    #[test]
    fn id_is_read_only() {
        let obj = document("d1");
        let err = obj
            .set_attribute(&attribute::ID, Value::from(id("other")))
            .unwrap_err();
        assert!(matches!(err, OdmaError::AccessDenied(_)));
    }

    #[test]
    fn instance_of_checks_declared_classes() {
        let obj = document("d1");
        assert!(obj.instance_of(&class::DOCUMENT));
        assert!(obj.instance_of(&class::OBJECT));
        assert!(!obj.instance_of(&class::FOLDER));
    }

    #[test]
    fn repository_adds_guid_and_repository_reference() {
        let repo = MemoryRepository::new(id("r1"), "Main").unwrap();
        let doc = repo.insert(document("d1")).unwrap();

        let guid = doc.attribute(&attribute::GUID).unwrap().get_guid().unwrap();
        assert_eq!(guid, Some(GlobalId::new(id("d1"), id("r1"))));

        let cell = doc.attribute(&attribute::REPOSITORY).unwrap();
        assert_eq!(cell.resolution_state(), ResolutionState::IdResolved);
        assert_eq!(cell.get_reference_id().unwrap(), Some(id("r1")));
        let target = cell.get_reference().unwrap().unwrap();
        assert!(target.store().instance_of(&class::REPOSITORY));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let repo = MemoryRepository::new(id("r1"), "Main").unwrap();
        repo.insert(document("d1")).unwrap();
        assert!(matches!(repo.insert(document("d1")), Err(OdmaError::Fixture(_))));
        assert!(repo.insert(document("r1")).is_err());
    }

    #[test]
    fn references_resolve_lazily_within_the_repository() {
        let repo = MemoryRepository::new(id("r1"), "Main").unwrap();
        let folder = repo
            .insert(MemoryObject::new(id("f1")).with_class(class::FOLDER))
            .unwrap();
        let doc = repo
            .insert(
                document("d1")
                    .with_attribute(attribute::PARENT, AttributeData::reference(Some(id("f1"))))
                    .unwrap()
                    .with_attribute(
                        attribute::CONTAINED_IN,
                        AttributeData::references(vec![id("f1")]),
                    )
                    .unwrap(),
            )
            .unwrap();

        let parent = doc.attribute(&attribute::PARENT).unwrap();
        let target = parent.get_reference().unwrap().unwrap();
        let expected: Rc<dyn AttributeStore> = folder;
        assert_eq!(target, ObjectRef::new(expected));

        let contained = doc.attribute(&attribute::CONTAINED_IN).unwrap();
        assert_eq!(contained.resolution_state(), ResolutionState::Unresolved);
        assert_eq!(contained.get_reference_list().unwrap().len(), 1);
    }

    #[test]
    fn dangling_reference_is_object_not_found() {
        let repo = MemoryRepository::new(id("r1"), "Main").unwrap();
        let doc = repo
            .insert(
                document("d1")
                    .with_attribute(attribute::PARENT, AttributeData::reference(Some(id("ghost"))))
                    .unwrap(),
            )
            .unwrap();
        let parent = doc.attribute(&attribute::PARENT).unwrap();
        assert!(matches!(
            parent.get_reference(),
            Err(OdmaError::ObjectNotFound(gid)) if gid.object_id().as_str() == "ghost"
        ));
        assert_eq!(parent.get_reference_id().unwrap(), Some(id("ghost")));
    }

    #[test]
    fn saving_a_reference_stores_the_target_id() {
        let repo = MemoryRepository::new(id("r1"), "Main").unwrap();
        let f1 = repo.insert(MemoryObject::new(id("f1"))).unwrap();
        let doc = repo
            .insert(
                document("d1")
                    .with_attribute(attribute::PARENT, AttributeData::reference(None))
                    .unwrap(),
            )
            .unwrap();

        let target: Rc<dyn AttributeStore> = f1;
        doc.set_attribute(&attribute::PARENT, Value::from(ObjectRef::new(target)))
            .unwrap();
        doc.save().unwrap();
        doc.prepare_attributes(Some(&[attribute::PARENT]), true).unwrap();

        let parent = doc.attribute(&attribute::PARENT).unwrap();
        assert_eq!(parent.resolution_state(), ResolutionState::IdResolved);
        assert_eq!(parent.get_reference_id().unwrap(), Some(id("f1")));
    }

    #[test]
    fn objects_are_listed_by_id() {
        let repo = MemoryRepository::new(id("r1"), "Main").unwrap();
        repo.insert(document("b")).unwrap();
        repo.insert(document("a")).unwrap();
        let ids: Vec<_> = repo.objects().iter().map(|o| o.id().to_string()).collect();
        assert_eq!(ids, vec!["a", "b", "r1"]);
        assert!(repo.root().unwrap().instance_of(&class::REPOSITORY));
    }
}
