//! Typed views of a [`Projection`].
//!
//! One trait per interface of the built-in table. Every method is a default
//! method performing a single dispatch through the projection, so the traits
//! carry no state and [`Projection`] implements all of them. Whether a call
//! is allowed is decided by the projection at call time: calling
//! `Document::title` on a folder yields `Unsupported`. Use the checked views
//! (`as_document`, `as_folder`, ...) to test first.
//!
//! Several interfaces share accessor names (`Name`, `Title`, ...). With more
//! than one trait in scope, call those through the trait:
//! `Class::name(&projection)`.

use super::{Projection, OBJECT_INTERFACE};
use crate::attributes::ContentRef;
use crate::error::Result;
use crate::names::{GlobalId, LocalId, QualifiedName};
use chrono::{DateTime, Utc};

pub trait Object {
    fn projection(&self) -> &Projection;

    fn class(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("Class")
    }

    fn aspects(&self) -> Result<Vec<Projection>> {
        self.projection().get_references("Aspects")
    }

    fn id(&self) -> Result<Option<LocalId>> {
        self.projection().get_as("Id")
    }

    fn guid(&self) -> Result<Option<GlobalId>> {
        self.projection().get_as("Guid")
    }

    fn repository(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("Repository")
    }
}

pub trait Class: Object {
    fn name(&self) -> Result<Option<String>> {
        self.projection().get_as("Name")
    }

    fn set_name(&self, name: Option<String>) -> Result<()> {
        self.projection().set("Name", name.into())
    }

    fn namespace(&self) -> Result<Option<String>> {
        self.projection().get_as("Namespace")
    }

    fn set_namespace(&self, namespace: Option<String>) -> Result<()> {
        self.projection().set("Namespace", namespace.into())
    }

    fn display_name(&self) -> Result<Option<String>> {
        self.projection().get_as("DisplayName")
    }

    fn set_display_name(&self, display_name: Option<String>) -> Result<()> {
        self.projection().set("DisplayName", display_name.into())
    }

    fn qname(&self) -> Result<QualifiedName> {
        self.projection().qname()
    }

    fn super_class(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("SuperClass")
    }

    fn included_aspects(&self) -> Result<Vec<Projection>> {
        self.projection().get_references("IncludedAspects")
    }

    fn declared_properties(&self) -> Result<Vec<Projection>> {
        self.projection().get_references("DeclaredProperties")
    }

    fn properties(&self) -> Result<Vec<Projection>> {
        self.projection().get_references("Properties")
    }

    fn is_aspect(&self) -> Result<Option<bool>> {
        self.projection().get_as("Aspect")
    }

    fn is_hidden(&self) -> Result<Option<bool>> {
        self.projection().get_as("Hidden")
    }

    fn set_hidden(&self, hidden: Option<bool>) -> Result<()> {
        self.projection().set("Hidden", hidden.into())
    }

    fn is_system(&self) -> Result<Option<bool>> {
        self.projection().get_as("System")
    }

    fn set_system(&self, system: Option<bool>) -> Result<()> {
        self.projection().set("System", system.into())
    }

    fn is_retrievable(&self) -> Result<Option<bool>> {
        self.projection().get_as("Retrievable")
    }

    fn is_searchable(&self) -> Result<Option<bool>> {
        self.projection().get_as("Searchable")
    }

    fn sub_classes(&self) -> Result<Vec<Projection>> {
        self.projection().get_references("SubClasses")
    }
}

pub trait PropertyInfo: Object {
    fn name(&self) -> Result<Option<String>> {
        self.projection().get_as("Name")
    }

    fn set_name(&self, name: Option<String>) -> Result<()> {
        self.projection().set("Name", name.into())
    }

    fn namespace(&self) -> Result<Option<String>> {
        self.projection().get_as("Namespace")
    }

    fn set_namespace(&self, namespace: Option<String>) -> Result<()> {
        self.projection().set("Namespace", namespace.into())
    }

    fn display_name(&self) -> Result<Option<String>> {
        self.projection().get_as("DisplayName")
    }

    fn set_display_name(&self, display_name: Option<String>) -> Result<()> {
        self.projection().set("DisplayName", display_name.into())
    }

    fn qname(&self) -> Result<QualifiedName> {
        self.projection().qname()
    }

    /// Numeric kind code of the described attribute.
    fn data_type(&self) -> Result<Option<i32>> {
        self.projection().get_as("DataType")
    }

    fn set_data_type(&self, code: Option<i32>) -> Result<()> {
        self.projection().set("DataType", code.into())
    }

    fn reference_class(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("ReferenceClass")
    }

    fn set_reference_class(&self, class: Option<&Projection>) -> Result<()> {
        self.projection().set_reference("ReferenceClass", class)
    }

    fn is_multi_value(&self) -> Result<Option<bool>> {
        self.projection().get_as("MultiValue")
    }

    fn set_multi_value(&self, multi_value: Option<bool>) -> Result<()> {
        self.projection().set("MultiValue", multi_value.into())
    }

    fn is_required(&self) -> Result<Option<bool>> {
        self.projection().get_as("Required")
    }

    fn set_required(&self, required: Option<bool>) -> Result<()> {
        self.projection().set("Required", required.into())
    }

    fn is_read_only(&self) -> Result<Option<bool>> {
        self.projection().get_as("ReadOnly")
    }

    fn set_read_only(&self, read_only: Option<bool>) -> Result<()> {
        self.projection().set("ReadOnly", read_only.into())
    }

    fn is_hidden(&self) -> Result<Option<bool>> {
        self.projection().get_as("Hidden")
    }

    fn set_hidden(&self, hidden: Option<bool>) -> Result<()> {
        self.projection().set("Hidden", hidden.into())
    }

    fn is_system(&self) -> Result<Option<bool>> {
        self.projection().get_as("System")
    }

    fn set_system(&self, system: Option<bool>) -> Result<()> {
        self.projection().set("System", system.into())
    }

    fn choices(&self) -> Result<Vec<Projection>> {
        self.projection().get_references("Choices")
    }
}

pub trait ChoiceValue: Object {
    fn display_name(&self) -> Result<Option<String>> {
        self.projection().get_as("DisplayName")
    }

    fn set_display_name(&self, display_name: Option<String>) -> Result<()> {
        self.projection().set("DisplayName", display_name.into())
    }

    fn string_value(&self) -> Result<Option<String>> {
        self.projection().get_as("StringValue")
    }

    fn set_string_value(&self, value: Option<String>) -> Result<()> {
        self.projection().set("StringValue", value.into())
    }

    fn integer_value(&self) -> Result<Option<i32>> {
        self.projection().get_as("IntegerValue")
    }

    fn set_integer_value(&self, value: Option<i32>) -> Result<()> {
        self.projection().set("IntegerValue", value.into())
    }

    fn short_value(&self) -> Result<Option<i16>> {
        self.projection().get_as("ShortValue")
    }

    fn set_short_value(&self, value: Option<i16>) -> Result<()> {
        self.projection().set("ShortValue", value.into())
    }

    fn long_value(&self) -> Result<Option<i64>> {
        self.projection().get_as("LongValue")
    }

    fn set_long_value(&self, value: Option<i64>) -> Result<()> {
        self.projection().set("LongValue", value.into())
    }

    fn float_value(&self) -> Result<Option<f32>> {
        self.projection().get_as("FloatValue")
    }

    fn set_float_value(&self, value: Option<f32>) -> Result<()> {
        self.projection().set("FloatValue", value.into())
    }

    fn double_value(&self) -> Result<Option<f64>> {
        self.projection().get_as("DoubleValue")
    }

    fn set_double_value(&self, value: Option<f64>) -> Result<()> {
        self.projection().set("DoubleValue", value.into())
    }

    fn boolean_value(&self) -> Result<Option<bool>> {
        self.projection().get_as("BooleanValue")
    }

    fn set_boolean_value(&self, value: Option<bool>) -> Result<()> {
        self.projection().set("BooleanValue", value.into())
    }

    fn date_time_value(&self) -> Result<Option<DateTime<Utc>>> {
        self.projection().get_as("DateTimeValue")
    }

    fn set_date_time_value(&self, value: Option<DateTime<Utc>>) -> Result<()> {
        self.projection().set("DateTimeValue", value.into())
    }

    fn binary_value(&self) -> Result<Option<Vec<u8>>> {
        self.projection().get_as("BinaryValue")
    }

    fn set_binary_value(&self, value: Option<Vec<u8>>) -> Result<()> {
        self.projection().set("BinaryValue", value.into())
    }

    fn reference_value(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("ReferenceValue")
    }

    fn set_reference_value(&self, target: Option<&Projection>) -> Result<()> {
        self.projection().set_reference("ReferenceValue", target)
    }
}

pub trait Repository: Object {
    fn name(&self) -> Result<Option<String>> {
        self.projection().get_as("Name")
    }

    fn set_name(&self, name: Option<String>) -> Result<()> {
        self.projection().set("Name", name.into())
    }

    fn display_name(&self) -> Result<Option<String>> {
        self.projection().get_as("DisplayName")
    }

    fn set_display_name(&self, display_name: Option<String>) -> Result<()> {
        self.projection().set("DisplayName", display_name.into())
    }

    fn root_class(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("RootClass")
    }

    fn root_aspects(&self) -> Result<Vec<Projection>> {
        self.projection().get_references("RootAspects")
    }

    fn root_folder(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("RootFolder")
    }
}

pub trait AuditStamped: Object {
    fn created_at(&self) -> Result<Option<DateTime<Utc>>> {
        self.projection().get_as("CreatedAt")
    }

    fn created_by(&self) -> Result<Option<String>> {
        self.projection().get_as("CreatedBy")
    }

    fn last_modified_at(&self) -> Result<Option<DateTime<Utc>>> {
        self.projection().get_as("LastModifiedAt")
    }

    fn last_modified_by(&self) -> Result<Option<String>> {
        self.projection().get_as("LastModifiedBy")
    }
}

pub trait Document: AuditStamped {
    fn title(&self) -> Result<Option<String>> {
        self.projection().get_as("Title")
    }

    fn set_title(&self, title: Option<String>) -> Result<()> {
        self.projection().set("Title", title.into())
    }

    fn version(&self) -> Result<Option<String>> {
        self.projection().get_as("Version")
    }

    fn version_collection(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("VersionCollection")
    }

    fn version_independent_id(&self) -> Result<Option<LocalId>> {
        self.projection().get_as("VersionIndependentId")
    }

    fn version_independent_guid(&self) -> Result<Option<GlobalId>> {
        self.projection().get_as("VersionIndependentGuid")
    }

    fn content_elements(&self) -> Result<Vec<Projection>> {
        self.projection().get_references("ContentElements")
    }

    fn combined_content_type(&self) -> Result<Option<String>> {
        self.projection().get_as("CombinedContentType")
    }

    fn set_combined_content_type(&self, content_type: Option<String>) -> Result<()> {
        self.projection().set("CombinedContentType", content_type.into())
    }

    fn primary_content_element(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("PrimaryContentElement")
    }

    fn set_primary_content_element(&self, element: Option<&Projection>) -> Result<()> {
        self.projection().set_reference("PrimaryContentElement", element)
    }

    fn is_checked_out(&self) -> Result<Option<bool>> {
        self.projection().get_as("CheckedOut")
    }

    fn checked_out_at(&self) -> Result<Option<DateTime<Utc>>> {
        self.projection().get_as("CheckedOutAt")
    }

    fn checked_out_by(&self) -> Result<Option<String>> {
        self.projection().get_as("CheckedOutBy")
    }
}

pub trait ContentElement: Object {
    fn content_type(&self) -> Result<Option<String>> {
        self.projection().get_as("ContentType")
    }

    fn set_content_type(&self, content_type: Option<String>) -> Result<()> {
        self.projection().set("ContentType", content_type.into())
    }

    fn position(&self) -> Result<Option<i32>> {
        self.projection().get_as("Position")
    }
}

pub trait DataContentElement: ContentElement {
    fn content(&self) -> Result<Option<ContentRef>> {
        self.projection().get_as("Content")
    }

    fn set_content(&self, content: Option<ContentRef>) -> Result<()> {
        self.projection().set("Content", content.into())
    }

    fn size(&self) -> Result<Option<i64>> {
        self.projection().get_as("Size")
    }

    fn file_name(&self) -> Result<Option<String>> {
        self.projection().get_as("FileName")
    }

    fn set_file_name(&self, file_name: Option<String>) -> Result<()> {
        self.projection().set("FileName", file_name.into())
    }
}

pub trait ReferenceContentElement: ContentElement {
    fn location(&self) -> Result<Option<String>> {
        self.projection().get_as("Location")
    }

    fn set_location(&self, location: Option<String>) -> Result<()> {
        self.projection().set("Location", location.into())
    }
}

pub trait VersionCollection: Object {
    fn versions(&self) -> Result<Vec<Projection>> {
        self.projection().get_references("Versions")
    }

    fn latest(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("Latest")
    }

    fn released(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("Released")
    }

    fn in_progress(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("InProgress")
    }
}

pub trait Container: AuditStamped {
    fn title(&self) -> Result<Option<String>> {
        self.projection().get_as("Title")
    }

    fn set_title(&self, title: Option<String>) -> Result<()> {
        self.projection().set("Title", title.into())
    }

    fn containees(&self) -> Result<Vec<Projection>> {
        self.projection().get_references("Containees")
    }

    fn associations(&self) -> Result<Vec<Projection>> {
        self.projection().get_references("Associations")
    }
}

pub trait Folder: Container {
    fn parent(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("Parent")
    }

    fn set_parent(&self, parent: Option<&Projection>) -> Result<()> {
        self.projection().set_reference("Parent", parent)
    }

    fn sub_folders(&self) -> Result<Vec<Projection>> {
        self.projection().get_references("SubFolders")
    }
}

pub trait Containable: Object {
    fn contained_in(&self) -> Result<Vec<Projection>> {
        self.projection().get_references("ContainedIn")
    }

    fn contained_in_associations(&self) -> Result<Vec<Projection>> {
        self.projection().get_references("ContainedInAssociations")
    }
}

pub trait Association: AuditStamped {
    fn name(&self) -> Result<Option<String>> {
        self.projection().get_as("Name")
    }

    fn set_name(&self, name: Option<String>) -> Result<()> {
        self.projection().set("Name", name.into())
    }

    fn container(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("Container")
    }

    fn set_container(&self, container: Option<&Projection>) -> Result<()> {
        self.projection().set_reference("Container", container)
    }

    fn containable(&self) -> Result<Option<Projection>> {
        self.projection().get_reference("Containable")
    }

    fn set_containable(&self, containable: Option<&Projection>) -> Result<()> {
        self.projection().set_reference("Containable", containable)
    }
}

impl Object for Projection {
    fn projection(&self) -> &Projection {
        self
    }
}

impl Class for Projection {}
impl PropertyInfo for Projection {}
impl ChoiceValue for Projection {}
impl Repository for Projection {}
impl AuditStamped for Projection {}
impl Document for Projection {}
impl ContentElement for Projection {}
impl DataContentElement for Projection {}
impl ReferenceContentElement for Projection {}
impl VersionCollection for Projection {}
impl Container for Projection {}
impl Folder for Projection {}
impl Containable for Projection {}
impl Association for Projection {}

macro_rules! checked_views {
    ($($method:ident => $name:literal as $trait:ident;)*) => {
        impl Projection {
            $(
                #[doc = concat!("`Some` when the object implements `", $name, "`.")]
                pub fn $method(&self) -> Option<&dyn $trait> {
                    self.implements($name).then_some(self as &dyn $trait)
                }
            )*
        }
    };
}

checked_views! {
    as_class => "Class" as Class;
    as_property_info => "PropertyInfo" as PropertyInfo;
    as_choice_value => "ChoiceValue" as ChoiceValue;
    as_repository => "Repository" as Repository;
    as_audit_stamped => "AuditStamped" as AuditStamped;
    as_document => "Document" as Document;
    as_content_element => "ContentElement" as ContentElement;
    as_data_content_element => "DataContentElement" as DataContentElement;
    as_reference_content_element => "ReferenceContentElement" as ReferenceContentElement;
    as_version_collection => "VersionCollection" as VersionCollection;
    as_container => "Container" as Container;
    as_folder => "Folder" as Folder;
    as_containable => "Containable" as Containable;
    as_association => "Association" as Association;
}

impl Projection {
    /// The base view, always available.
    pub fn as_object(&self) -> &dyn Object {
        self
    }

    /// `Some` when the object implements the table's base interface.
    pub fn as_base(&self) -> Option<&dyn Object> {
        self.implements(OBJECT_INTERFACE).then_some(self as &dyn Object)
    }
}
