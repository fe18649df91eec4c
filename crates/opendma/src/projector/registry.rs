//! The registration table.
//!
//! The table maps accessor names (`Title`, `Parent`, ...) to the attribute
//! behind them and groups accessors into interfaces, each bound to the class
//! or aspect whose instances implement it. It is plain data: built once,
//! shared through an `Rc`, never mutated after construction.
//!
//! The built-in OpenDMA table is declared below as const data. Adding a
//! built-in accessor means adding an entry to [`BUILTIN_ACCESSORS`] and
//! listing it in an interface of [`BUILTIN_INTERFACES`].

use crate::attributes::ValueKind;
use crate::common::{attribute, class};
use crate::config::OdmaConfig;
use crate::error::{OdmaError, Result};
use crate::names::QualifiedName;
use std::collections::{BTreeMap, BTreeSet};

/// The synthesized accessor composing `Namespace` and `Name`.
pub const QNAME_ACCESSOR: &str = "QName";

/// The interface every projection implements.
pub const OBJECT_INTERFACE: &str = "Object";

/// Const declaration of an accessor.
#[derive(Debug, Clone)]
pub struct AccessorSpec {
    pub accessor: &'static str,
    pub attribute: QualifiedName,
    pub kind: ValueKind,
    pub multi_value: bool,
    pub writable: bool,
    /// Interface a referenced object must implement.
    pub target: Option<&'static str>,
}

impl AccessorSpec {
    const fn new(
        accessor: &'static str,
        attribute: QualifiedName,
        kind: ValueKind,
        multi_value: bool,
    ) -> Self {
        Self {
            accessor,
            attribute,
            kind,
            multi_value,
            writable: false,
            target: None,
        }
    }

    const fn single(accessor: &'static str, attribute: QualifiedName, kind: ValueKind) -> Self {
        Self::new(accessor, attribute, kind, false)
    }

    const fn reference(
        accessor: &'static str,
        attribute: QualifiedName,
        target: &'static str,
    ) -> Self {
        Self::new(accessor, attribute, ValueKind::Reference, false).narrowed_to(target)
    }

    const fn references(
        accessor: &'static str,
        attribute: QualifiedName,
        target: &'static str,
    ) -> Self {
        Self::new(accessor, attribute, ValueKind::Reference, true).narrowed_to(target)
    }

    const fn writable(mut self) -> Self {
        self.writable = true;
        self
    }

    const fn narrowed_to(mut self, interface: &'static str) -> Self {
        self.target = Some(interface);
        self
    }

    fn to_mapping(&self) -> AccessorMapping {
        AccessorMapping {
            accessor: self.accessor.to_string(),
            attribute: self.attribute.clone(),
            kind: self.kind,
            multi_value: self.multi_value,
            writable: self.writable,
            target: self.target.map(str::to_string),
        }
    }
}

/// Const declaration of an interface.
#[derive(Debug, Clone)]
pub struct InterfaceSpec {
    pub name: &'static str,
    pub class: QualifiedName,
    pub extends: &'static [&'static str],
    pub accessors: &'static [&'static str],
}

impl InterfaceSpec {
    fn to_def(&self) -> InterfaceDef {
        InterfaceDef {
            name: self.name.to_string(),
            class: self.class.clone(),
            extends: self.extends.iter().map(|s| s.to_string()).collect(),
            accessors: self.accessors.iter().map(|s| s.to_string()).collect(),
        }
    }
}

use ValueKind::{Boolean, DateTime, Double, Float, Guid, Id, Integer, Long, Short};

pub const BUILTIN_ACCESSORS: &[AccessorSpec] = &[
    // Object
    AccessorSpec::reference("Class", attribute::CLASS, "Class"),
    AccessorSpec::references("Aspects", attribute::ASPECTS, "Class"),
    AccessorSpec::single("Id", attribute::ID, Id),
    AccessorSpec::single("Guid", attribute::GUID, Guid),
    AccessorSpec::reference("Repository", attribute::REPOSITORY, "Repository"),
    // Class, PropertyInfo, Repository, Association
    AccessorSpec::single("Name", attribute::NAME, ValueKind::String).writable(),
    AccessorSpec::single("Namespace", attribute::NAMESPACE, ValueKind::String).writable(),
    AccessorSpec::single("DisplayName", attribute::DISPLAY_NAME, ValueKind::String).writable(),
    AccessorSpec::reference("SuperClass", attribute::SUPER_CLASS, "Class"),
    AccessorSpec::references("IncludedAspects", attribute::INCLUDED_ASPECTS, "Class"),
    AccessorSpec::references("DeclaredProperties", attribute::DECLARED_PROPERTIES, "PropertyInfo"),
    AccessorSpec::references("Properties", attribute::PROPERTIES, "PropertyInfo"),
    AccessorSpec::single("Aspect", attribute::ASPECT, Boolean),
    AccessorSpec::single("Hidden", attribute::HIDDEN, Boolean).writable(),
    AccessorSpec::single("System", attribute::SYSTEM, Boolean).writable(),
    AccessorSpec::single("Retrievable", attribute::RETRIEVABLE, Boolean),
    AccessorSpec::single("Searchable", attribute::SEARCHABLE, Boolean),
    AccessorSpec::references("SubClasses", attribute::SUB_CLASSES, "Class"),
    AccessorSpec::single("DataType", attribute::DATA_TYPE, Integer).writable(),
    AccessorSpec::reference("ReferenceClass", attribute::REFERENCE_CLASS, "Class").writable(),
    AccessorSpec::single("MultiValue", attribute::MULTI_VALUE, Boolean).writable(),
    AccessorSpec::single("Required", attribute::REQUIRED, Boolean).writable(),
    AccessorSpec::single("ReadOnly", attribute::READ_ONLY, Boolean).writable(),
    AccessorSpec::references("Choices", attribute::CHOICES, "ChoiceValue"),
    // ChoiceValue
    AccessorSpec::single("StringValue", attribute::STRING_VALUE, ValueKind::String).writable(),
    AccessorSpec::single("IntegerValue", attribute::INTEGER_VALUE, Integer).writable(),
    AccessorSpec::single("ShortValue", attribute::SHORT_VALUE, Short).writable(),
    AccessorSpec::single("LongValue", attribute::LONG_VALUE, Long).writable(),
    AccessorSpec::single("FloatValue", attribute::FLOAT_VALUE, Float).writable(),
    AccessorSpec::single("DoubleValue", attribute::DOUBLE_VALUE, Double).writable(),
    AccessorSpec::single("BooleanValue", attribute::BOOLEAN_VALUE, Boolean).writable(),
    AccessorSpec::single("DateTimeValue", attribute::DATE_TIME_VALUE, DateTime).writable(),
    AccessorSpec::single("BinaryValue", attribute::BINARY_VALUE, ValueKind::Binary).writable(),
    AccessorSpec::reference("ReferenceValue", attribute::REFERENCE_VALUE, "Object").writable(),
    // Repository
    AccessorSpec::reference("RootClass", attribute::ROOT_CLASS, "Class"),
    AccessorSpec::references("RootAspects", attribute::ROOT_ASPECTS, "Class"),
    AccessorSpec::reference("RootFolder", attribute::ROOT_FOLDER, "Folder"),
    // AuditStamped
    AccessorSpec::single("CreatedAt", attribute::CREATED_AT, DateTime),
    AccessorSpec::single("CreatedBy", attribute::CREATED_BY, ValueKind::String),
    AccessorSpec::single("LastModifiedAt", attribute::LAST_MODIFIED_AT, DateTime),
    AccessorSpec::single("LastModifiedBy", attribute::LAST_MODIFIED_BY, ValueKind::String),
    // Document, Container
    AccessorSpec::single("Title", attribute::TITLE, ValueKind::String).writable(),
    AccessorSpec::single("Version", attribute::VERSION, ValueKind::String),
    AccessorSpec::reference("VersionCollection", attribute::VERSION_COLLECTION, "VersionCollection"),
    AccessorSpec::single("VersionIndependentId", attribute::VERSION_INDEPENDENT_ID, Id),
    AccessorSpec::single("VersionIndependentGuid", attribute::VERSION_INDEPENDENT_GUID, Guid),
    AccessorSpec::references("ContentElements", attribute::CONTENT_ELEMENTS, "ContentElement"),
    AccessorSpec::single("CombinedContentType", attribute::COMBINED_CONTENT_TYPE, ValueKind::String)
        .writable(),
    AccessorSpec::reference("PrimaryContentElement", attribute::PRIMARY_CONTENT_ELEMENT, "ContentElement")
        .writable(),
    AccessorSpec::single("CheckedOut", attribute::CHECKED_OUT, Boolean),
    AccessorSpec::single("CheckedOutAt", attribute::CHECKED_OUT_AT, DateTime),
    AccessorSpec::single("CheckedOutBy", attribute::CHECKED_OUT_BY, ValueKind::String),
    // Content elements
    AccessorSpec::single("ContentType", attribute::CONTENT_TYPE, ValueKind::String).writable(),
    AccessorSpec::single("Position", attribute::POSITION, Integer),
    AccessorSpec::single("Content", attribute::CONTENT, ValueKind::Content).writable(),
    AccessorSpec::single("Size", attribute::SIZE, Long),
    AccessorSpec::single("FileName", attribute::FILE_NAME, ValueKind::String).writable(),
    AccessorSpec::single("Location", attribute::LOCATION, ValueKind::String).writable(),
    // VersionCollection
    AccessorSpec::references("Versions", attribute::VERSIONS, "Document"),
    AccessorSpec::reference("Latest", attribute::LATEST, "Document"),
    AccessorSpec::reference("Released", attribute::RELEASED, "Document"),
    AccessorSpec::reference("InProgress", attribute::IN_PROGRESS, "Document"),
    // Containment
    AccessorSpec::references("Containees", attribute::CONTAINEES, "Containable"),
    AccessorSpec::references("Associations", attribute::ASSOCIATIONS, "Association"),
    AccessorSpec::reference("Parent", attribute::PARENT, "Folder").writable(),
    AccessorSpec::references("SubFolders", attribute::SUB_FOLDERS, "Folder"),
    AccessorSpec::references("ContainedIn", attribute::CONTAINED_IN, "Container"),
    AccessorSpec::references("ContainedInAssociations", attribute::CONTAINED_IN_ASSOCIATIONS, "Association"),
    AccessorSpec::reference("Container", attribute::CONTAINER, "Container").writable(),
    AccessorSpec::reference("Containable", attribute::CONTAINABLE, "Containable").writable(),
];

pub const BUILTIN_INTERFACES: &[InterfaceSpec] = &[
    InterfaceSpec {
        name: OBJECT_INTERFACE,
        class: class::OBJECT,
        extends: &[],
        accessors: &["Class", "Aspects", "Id", "Guid", "Repository"],
    },
    InterfaceSpec {
        name: "Class",
        class: class::CLASS,
        extends: &[],
        accessors: &[
            "Name", "Namespace", "DisplayName", "SuperClass", "IncludedAspects",
            "DeclaredProperties", "Properties", "Aspect", "Hidden", "System", "Retrievable",
            "Searchable", "SubClasses", QNAME_ACCESSOR,
        ],
    },
    InterfaceSpec {
        name: "PropertyInfo",
        class: class::PROPERTY_INFO,
        extends: &[],
        accessors: &[
            "Name", "Namespace", "DisplayName", "DataType", "ReferenceClass", "MultiValue",
            "Required", "ReadOnly", "Hidden", "System", "Choices", QNAME_ACCESSOR,
        ],
    },
    InterfaceSpec {
        name: "ChoiceValue",
        class: class::CHOICE_VALUE,
        extends: &[],
        accessors: &[
            "DisplayName", "StringValue", "IntegerValue", "ShortValue", "LongValue",
            "FloatValue", "DoubleValue", "BooleanValue", "DateTimeValue", "BinaryValue",
            "ReferenceValue",
        ],
    },
    InterfaceSpec {
        name: "Repository",
        class: class::REPOSITORY,
        extends: &[],
        accessors: &["Name", "DisplayName", "RootClass", "RootAspects", "RootFolder"],
    },
    InterfaceSpec {
        name: "AuditStamped",
        class: class::AUDIT_STAMPED,
        extends: &[],
        accessors: &["CreatedAt", "CreatedBy", "LastModifiedAt", "LastModifiedBy"],
    },
    InterfaceSpec {
        name: "Document",
        class: class::DOCUMENT,
        extends: &["AuditStamped"],
        accessors: &[
            "Title", "Version", "VersionCollection", "VersionIndependentId",
            "VersionIndependentGuid", "ContentElements", "CombinedContentType",
            "PrimaryContentElement", "CheckedOut", "CheckedOutAt", "CheckedOutBy",
        ],
    },
    InterfaceSpec {
        name: "ContentElement",
        class: class::CONTENT_ELEMENT,
        extends: &[],
        accessors: &["ContentType", "Position"],
    },
    InterfaceSpec {
        name: "DataContentElement",
        class: class::DATA_CONTENT_ELEMENT,
        extends: &["ContentElement"],
        accessors: &["Content", "Size", "FileName"],
    },
    InterfaceSpec {
        name: "ReferenceContentElement",
        class: class::REFERENCE_CONTENT_ELEMENT,
        extends: &["ContentElement"],
        accessors: &["Location"],
    },
    InterfaceSpec {
        name: "VersionCollection",
        class: class::VERSION_COLLECTION,
        extends: &[],
        accessors: &["Versions", "Latest", "Released", "InProgress"],
    },
    InterfaceSpec {
        name: "Container",
        class: class::CONTAINER,
        extends: &["AuditStamped"],
        accessors: &["Title", "Containees", "Associations"],
    },
    InterfaceSpec {
        name: "Folder",
        class: class::FOLDER,
        extends: &["Container"],
        accessors: &["Parent", "SubFolders"],
    },
    InterfaceSpec {
        name: "Containable",
        class: class::CONTAINABLE,
        extends: &[],
        accessors: &["ContainedIn", "ContainedInAssociations"],
    },
    InterfaceSpec {
        name: "Association",
        class: class::ASSOCIATION,
        extends: &["AuditStamped"],
        accessors: &["Name", "Container", "Containable"],
    },
];

/// What an accessor reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorMapping {
    pub accessor: String,
    pub attribute: QualifiedName,
    pub kind: ValueKind,
    pub multi_value: bool,
    pub writable: bool,
    pub target: Option<String>,
}

impl AccessorMapping {
    /// e.g. "multi-valued Reference"
    pub fn shape(&self) -> String {
        let cardinality = if self.multi_value { "multi" } else { "single" };
        format!("{}-valued {}", cardinality, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDef {
    pub name: String,
    /// Instances of this class or aspect implement the interface.
    pub class: QualifiedName,
    pub extends: Vec<String>,
    pub accessors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationTable {
    accessors: BTreeMap<String, AccessorMapping>,
    interfaces: BTreeMap<String, InterfaceDef>,
    base: Option<String>,
}

impl RegistrationTable {
    /// A table with no accessors, no interfaces and no base interface.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The OpenDMA table.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for spec in BUILTIN_ACCESSORS {
            table = table.with_accessor(spec.to_mapping());
        }
        for spec in BUILTIN_INTERFACES {
            table = table.with_interface(spec.to_def());
        }
        table.base = Some(OBJECT_INTERFACE.to_string());
        table
    }

    /// The built-in table (unless disabled) extended by the configured
    /// accessors and interfaces. Configured entries replace built-in ones
    /// of the same name.
    pub fn from_config(config: &OdmaConfig) -> Result<Self> {
        let mut table = if config.include_builtin {
            Self::builtin()
        } else {
            Self::empty()
        };
        for accessor in config.accessors.iter().flatten() {
            table = table.with_accessor(accessor.to_mapping());
        }
        for interface in config.interfaces.iter().flatten() {
            table = table.with_interface(interface.to_def());
        }
        table.validate()?;
        Ok(table)
    }

    pub fn with_accessor(mut self, mapping: AccessorMapping) -> Self {
        self.accessors.insert(mapping.accessor.clone(), mapping);
        self
    }

    pub fn with_interface(mut self, interface: InterfaceDef) -> Self {
        self.interfaces.insert(interface.name.clone(), interface);
        self
    }

    /// Makes `interface` the one every projection implements.
    pub fn with_base(mut self, interface: impl Into<String>) -> Self {
        self.base = Some(interface.into());
        self
    }

    pub fn accessor(&self, name: &str) -> Option<&AccessorMapping> {
        self.accessors.get(name)
    }

    pub fn accessors(&self) -> impl Iterator<Item = &AccessorMapping> {
        self.accessors.values()
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceDef> {
        self.interfaces.get(name)
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceDef> {
        self.interfaces.values()
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// `name` and every interface it extends, directly or not.
    pub fn lineage(&self, name: &str) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut pending = vec![name.to_string()];
        while let Some(next) = pending.pop() {
            if let Some(def) = self.interfaces.get(&next) {
                if seen.insert(next) {
                    pending.extend(def.extends.iter().cloned());
                }
            }
        }
        seen
    }

    /// Checks that every name the table refers to is defined.
    pub fn validate(&self) -> Result<()> {
        if let Some(base) = &self.base {
            if !self.interfaces.contains_key(base) {
                return Err(OdmaError::InvalidTable(format!(
                    "base interface `{}` is not defined",
                    base
                )));
            }
        }
        for def in self.interfaces.values() {
            for parent in &def.extends {
                if !self.interfaces.contains_key(parent) {
                    return Err(OdmaError::InvalidTable(format!(
                        "interface `{}` extends unknown interface `{}`",
                        def.name, parent
                    )));
                }
            }
            for accessor in &def.accessors {
                if accessor != QNAME_ACCESSOR && !self.accessors.contains_key(accessor) {
                    return Err(OdmaError::InvalidTable(format!(
                        "interface `{}` lists unknown accessor `{}`",
                        def.name, accessor
                    )));
                }
            }
        }
        for mapping in self.accessors.values() {
            match &mapping.target {
                Some(_) if mapping.kind != ValueKind::Reference => {
                    return Err(OdmaError::InvalidTable(format!(
                        "accessor `{}` is {} and cannot name a target interface",
                        mapping.accessor,
                        mapping.shape()
                    )));
                }
                Some(target) if !self.interfaces.contains_key(target) => {
                    return Err(OdmaError::InvalidTable(format!(
                        "accessor `{}` targets unknown interface `{}`",
                        mapping.accessor, target
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
