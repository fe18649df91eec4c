//! # Interface Projector
//!
//! The projector turns a generic [`AttributeStore`] into a [`Projection`]: a
//! facade answering to the base `Object` interface plus every interface of
//! the [`RegistrationTable`] whose class the object is an instance of.
//!
//! ```text
//!   caller ── get_Title ──> Projection ── table lookup ──> (opendma:Title, String, single)
//!                               │
//!                               └── store.attribute(opendma:Title) ──> cell.get_string()
//! ```
//!
//! ## Dispatch rules
//!
//! - `get_X` fetches the attribute behind `X` (one store lookup) and reads it
//!   with the getter matching the mapped kind and cardinality.
//! - `set_X` is only dispatched when the table marks `X` writable.
//! - `get_QName` is synthesized from `Namespace` and `Name`.
//! - Accessors missing from the table, or not part of an implemented
//!   interface, are [`Unsupported`](crate::error::OdmaError::Unsupported).
//!
//! ## Error promotion
//!
//! The table is a promise about the backend. When the store answers a
//! mapped accessor with `AttributeNotFound` or `InvalidKind`, the backend
//! broke that promise, and the error is promoted to
//! [`Service`](crate::error::OdmaError::Service) with the original as its source.
//! Errors the caller caused (a value of the wrong kind, a read-only
//! attribute) surface unchanged.
//!
//! Typed access goes through the traits in [`interfaces`], each method a
//! single dispatch.

use crate::attributes::{Attribute, ObjectRef, Value, ValueKind, ValueType};
use crate::error::{OdmaError, Result};
use crate::names::QualifiedName;
use crate::store::AttributeStore;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

pub mod interfaces;
mod registry;

pub use registry::{
    AccessorMapping, AccessorSpec, InterfaceDef, InterfaceSpec, RegistrationTable,
    BUILTIN_ACCESSORS, BUILTIN_INTERFACES, OBJECT_INTERFACE, QNAME_ACCESSOR,
};

/// Builds projections over one registration table.
#[derive(Debug, Clone)]
pub struct Projector {
    table: Rc<RegistrationTable>,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(RegistrationTable::builtin())
    }
}

impl Projector {
    pub fn new(table: RegistrationTable) -> Self {
        Self {
            table: Rc::new(table),
        }
    }

    pub fn with_table(table: Rc<RegistrationTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RegistrationTable {
        &self.table
    }

    /// Projects `store` onto every interface whose class it is an instance of.
    pub fn project(&self, store: Rc<dyn AttributeStore>) -> Projection {
        Projection::discover(store, Rc::clone(&self.table))
    }

    /// Projects `store` onto the interfaces bound to `classes`, without
    /// asking the store.
    pub fn project_with_classes(
        &self,
        store: Rc<dyn AttributeStore>,
        classes: &[QualifiedName],
    ) -> Projection {
        let declared: Vec<&str> = self
            .table
            .interfaces()
            .filter(|def| classes.contains(&def.class))
            .map(|def| def.name.as_str())
            .collect();
        Projection::with_interfaces(store, Rc::clone(&self.table), &declared)
    }
}

/// Result of a dynamic [`Projection::invoke`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Value),
    QName(QualifiedName),
    Done,
}

/// A store seen through the interfaces it implements.
#[derive(Clone)]
pub struct Projection {
    store: Rc<dyn AttributeStore>,
    table: Rc<RegistrationTable>,
    interfaces: BTreeSet<String>,
}

impl Projection {
    fn discover(store: Rc<dyn AttributeStore>, table: Rc<RegistrationTable>) -> Self {
        let declared: Vec<String> = table
            .interfaces()
            .filter(|def| store.instance_of(&def.class))
            .map(|def| def.name.clone())
            .collect();
        let declared: Vec<&str> = declared.iter().map(String::as_str).collect();
        Self::with_interfaces(store, table, &declared)
    }

    fn with_interfaces(
        store: Rc<dyn AttributeStore>,
        table: Rc<RegistrationTable>,
        declared: &[&str],
    ) -> Self {
        let mut interfaces = BTreeSet::new();
        for name in declared.iter().copied().chain(table.base()) {
            interfaces.extend(table.lineage(name));
        }
        debug!(interfaces = ?interfaces, "projected object");
        Self {
            store,
            table,
            interfaces,
        }
    }

    pub fn store(&self) -> &Rc<dyn AttributeStore> {
        &self.store
    }

    pub fn table(&self) -> &RegistrationTable {
        &self.table
    }

    /// Names of the implemented interfaces, ancestors included.
    pub fn interfaces(&self) -> impl Iterator<Item = &str> {
        self.interfaces.iter().map(String::as_str)
    }

    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.contains(interface)
    }

    /// Every accessor callable on this projection, sorted.
    pub fn accessors(&self) -> Vec<&str> {
        let callable: BTreeSet<&str> = self
            .interfaces
            .iter()
            .filter_map(|name| self.table.interface(name))
            .flat_map(|def| def.accessors.iter().map(String::as_str))
            .collect();
        callable.into_iter().collect()
    }

    /// Dispatches a method by name: `get_X`, `set_X` (with an argument) or
    /// `get_QName`.
    pub fn invoke(&self, method: &str, argument: Option<Value>) -> Result<Outcome> {
        match (method.split_once('_'), argument) {
            (Some(("get", QNAME_ACCESSOR)), None) => self.qname().map(Outcome::QName),
            (Some(("get", accessor)), None) => self.get(accessor).map(Outcome::Value),
            (Some(("set", accessor)), Some(value)) if accessor != QNAME_ACCESSOR => {
                self.set(accessor, value).map(|_| Outcome::Done)
            }
            _ => Err(OdmaError::Unsupported(method.to_string())),
        }
    }

    /// Reads the accessor's value, checked against its mapping.
    pub fn get(&self, accessor: &str) -> Result<Value> {
        let mapping = self.mapping(accessor, "get")?;
        debug!(accessor, attribute = %mapping.attribute, "get");
        let cell = self
            .store
            .attribute(&mapping.attribute)
            .map_err(|e| promote(mapping, e))?;
        read_cell(&cell, mapping).map_err(|e| promote(mapping, e))
    }

    /// Writes the accessor's attribute through the store.
    pub fn set(&self, accessor: &str, value: Value) -> Result<()> {
        let mapping = self.mapping(accessor, "set")?;
        if !mapping.writable {
            return Err(OdmaError::Unsupported(format!("set_{}", accessor)));
        }
        check_argument(mapping, &value).map_err(|e| promote(mapping, e))?;
        debug!(accessor, attribute = %mapping.attribute, "set");
        self.store
            .set_attribute(&mapping.attribute, value)
            .map_err(|e| promote(mapping, e))
    }

    /// `Namespace` and `Name` composed into a qualified name.
    pub fn qname(&self) -> Result<QualifiedName> {
        if !self.callable(QNAME_ACCESSOR) {
            return Err(OdmaError::Unsupported(format!("get_{}", QNAME_ACCESSOR)));
        }
        let namespace = self.qname_part("Namespace")?;
        let name = self.qname_part("Name")?;
        QualifiedName::new(namespace, name).map_err(|e| {
            OdmaError::from(e).into_service("Namespace and Name do not form a valid QName")
        })
    }

    /// A single value, converted to `T`.
    pub fn get_as<T: ValueType>(&self, accessor: &str) -> Result<Option<T>> {
        self.get(accessor)?
            .into_single::<T>()
            .map_err(|e| table_mismatch(accessor, e))
    }

    /// A list, converted to `T`.
    pub fn get_list_as<T: ValueType>(&self, accessor: &str) -> Result<Vec<T>> {
        self.get(accessor)?
            .into_list::<T>()
            .map_err(|e| table_mismatch(accessor, e))
    }

    /// The referenced object, projected and narrowed to the accessor's target.
    pub fn get_reference(&self, accessor: &str) -> Result<Option<Projection>> {
        let target = self.get_as::<ObjectRef>(accessor)?;
        target.map(|target| self.narrow(accessor, target)).transpose()
    }

    /// The referenced objects, each projected and narrowed.
    pub fn get_references(&self, accessor: &str) -> Result<Vec<Projection>> {
        self.get_list_as::<ObjectRef>(accessor)?
            .into_iter()
            .map(|target| self.narrow(accessor, target))
            .collect()
    }

    /// Points a reference accessor at `target`, or clears it.
    pub fn set_reference(&self, accessor: &str, target: Option<&Projection>) -> Result<()> {
        let target = target.map(|p| ObjectRef::new(Rc::clone(&p.store)));
        self.set(accessor, Value::from(target))
    }

    fn narrow(&self, accessor: &str, target: ObjectRef) -> Result<Projection> {
        let projected = Projection::discover(Rc::clone(target.store()), Rc::clone(&self.table));
        let wanted = self
            .table
            .accessor(accessor)
            .and_then(|mapping| mapping.target.as_deref());
        match wanted {
            Some(interface) if !projected.implements(interface) => {
                warn!(accessor, interface, "referenced object has the wrong interface");
                Err(OdmaError::service(format!(
                    "Object referenced by `{}` does not implement `{}`",
                    accessor, interface
                )))
            }
            _ => Ok(projected),
        }
    }

    fn callable(&self, accessor: &str) -> bool {
        self.interfaces
            .iter()
            .filter_map(|name| self.table.interface(name))
            .any(|def| def.accessors.iter().any(|a| a == accessor))
    }

    fn mapping(&self, accessor: &str, verb: &str) -> Result<&AccessorMapping> {
        match self.table.accessor(accessor) {
            Some(mapping) if self.callable(accessor) => Ok(mapping),
            _ => {
                debug!(accessor, verb, "unsupported accessor");
                Err(OdmaError::Unsupported(format!("{}_{}", verb, accessor)))
            }
        }
    }

    /// Reads one QName component through its table mapping.
    fn qname_part(&self, accessor: &str) -> Result<String> {
        let mapping = self.table.accessor(accessor).ok_or_else(|| {
            OdmaError::service(format!(
                "Cannot build QName: no `{}` accessor is registered",
                accessor
            ))
        })?;
        let value = self
            .store
            .attribute(&mapping.attribute)
            .and_then(|cell| read_cell(&cell, mapping))
            .map_err(|e| promote(mapping, e))?;
        value
            .into_single::<String>()
            .map_err(|e| table_mismatch(accessor, e))?
            .ok_or_else(|| {
                OdmaError::service(format!("Cannot build QName: `{}` is null", accessor))
            })
    }
}

impl fmt::Debug for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection")
            .field("interfaces", &self.interfaces)
            .finish_non_exhaustive()
    }
}

/// Core-object operations pass straight through to the store.
impl AttributeStore for Projection {
    fn attribute(&self, name: &QualifiedName) -> Result<Rc<Attribute>> {
        self.store.attribute(name)
    }

    fn prepare_attributes(&self, names: Option<&[QualifiedName]>, refresh: bool) -> Result<()> {
        self.store.prepare_attributes(names, refresh)
    }

    fn set_attribute(&self, name: &QualifiedName, value: Value) -> Result<()> {
        self.store.set_attribute(name, value)
    }

    fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    fn save(&self) -> Result<()> {
        self.store.save()
    }

    fn instance_of(&self, class_or_aspect: &QualifiedName) -> bool {
        self.store.instance_of(class_or_aspect)
    }
}

macro_rules! read_as {
    ($cell:expr, $mapping:expr, $($kind:ident => $single:ident, $list:ident;)*) => {
        match ($mapping.kind, $mapping.multi_value) {
            $(
                (ValueKind::$kind, false) => $cell.$single().map(Value::from),
                (ValueKind::$kind, true) => $cell.$list().map(Value::from),
            )*
        }
    };
}

fn read_cell(cell: &Attribute, mapping: &AccessorMapping) -> Result<Value> {
    read_as!(cell, mapping,
        String => get_string, get_string_list;
        Integer => get_integer, get_integer_list;
        Short => get_short, get_short_list;
        Long => get_long, get_long_list;
        Float => get_float, get_float_list;
        Double => get_double, get_double_list;
        Boolean => get_boolean, get_boolean_list;
        DateTime => get_date_time, get_date_time_list;
        Binary => get_binary, get_binary_list;
        Reference => get_reference, get_reference_list;
        Content => get_content, get_content_list;
        Id => get_id, get_id_list;
        Guid => get_guid, get_guid_list;
    )
}

fn check_argument(mapping: &AccessorMapping, value: &Value) -> Result<()> {
    let fits = match value {
        Value::Null => !mapping.multi_value,
        Value::Scalar(s) => !mapping.multi_value && s.kind() == mapping.kind,
        Value::List(l) => mapping.multi_value && l.kind() == mapping.kind,
    };
    if fits {
        Ok(())
    } else {
        Err(OdmaError::InvalidKind(format!(
            "`{}` takes a {} value, got {}",
            mapping.accessor,
            mapping.shape(),
            value.describe()
        )))
    }
}

fn promote(mapping: &AccessorMapping, e: OdmaError) -> OdmaError {
    match e {
        OdmaError::AttributeNotFound(_) | OdmaError::InvalidKind(_) => {
            warn!(accessor = %mapping.accessor, attribute = %mapping.attribute, error = %e,
                "backend broke the registered mapping");
            e.into_service(format!(
                "Predefined attribute `{}` behind `{}` is missing or not {}",
                mapping.attribute,
                mapping.accessor,
                mapping.shape()
            ))
        }
        other => other,
    }
}

fn table_mismatch(accessor: &str, e: OdmaError) -> OdmaError {
    e.into_service(format!(
        "Accessor `{}` is registered with a different kind than requested",
        accessor
    ))
}
