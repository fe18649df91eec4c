//! Names of the predefined OpenDMA classes, aspects and attributes.

use crate::names::QualifiedName;

/// Class and aspect names.
pub mod class {
    use super::QualifiedName;

    pub const OBJECT: QualifiedName = QualifiedName::opendma("Object");
    pub const CLASS: QualifiedName = QualifiedName::opendma("Class");
    pub const PROPERTY_INFO: QualifiedName = QualifiedName::opendma("PropertyInfo");
    pub const CHOICE_VALUE: QualifiedName = QualifiedName::opendma("ChoiceValue");
    pub const REPOSITORY: QualifiedName = QualifiedName::opendma("Repository");
    pub const AUDIT_STAMPED: QualifiedName = QualifiedName::opendma("AuditStamped");
    pub const DOCUMENT: QualifiedName = QualifiedName::opendma("Document");
    pub const CONTENT_ELEMENT: QualifiedName = QualifiedName::opendma("ContentElement");
    pub const DATA_CONTENT_ELEMENT: QualifiedName = QualifiedName::opendma("DataContentElement");
    pub const REFERENCE_CONTENT_ELEMENT: QualifiedName = QualifiedName::opendma("ReferenceContentElement");
    pub const VERSION_COLLECTION: QualifiedName = QualifiedName::opendma("VersionCollection");
    pub const CONTAINER: QualifiedName = QualifiedName::opendma("Container");
    pub const FOLDER: QualifiedName = QualifiedName::opendma("Folder");
    pub const CONTAINABLE: QualifiedName = QualifiedName::opendma("Containable");
    pub const ASSOCIATION: QualifiedName = QualifiedName::opendma("Association");
}

/// Attribute names.
pub mod attribute {
    use super::QualifiedName;

    pub const CLASS: QualifiedName = QualifiedName::opendma("Class");
    pub const ASPECTS: QualifiedName = QualifiedName::opendma("Aspects");
    pub const ID: QualifiedName = QualifiedName::opendma("Id");
    pub const GUID: QualifiedName = QualifiedName::opendma("Guid");
    pub const REPOSITORY: QualifiedName = QualifiedName::opendma("Repository");
    pub const NAME: QualifiedName = QualifiedName::opendma("Name");
    pub const NAMESPACE: QualifiedName = QualifiedName::opendma("Namespace");
    pub const DISPLAY_NAME: QualifiedName = QualifiedName::opendma("DisplayName");
    pub const SUPER_CLASS: QualifiedName = QualifiedName::opendma("SuperClass");
    pub const INCLUDED_ASPECTS: QualifiedName = QualifiedName::opendma("IncludedAspects");
    pub const DECLARED_PROPERTIES: QualifiedName = QualifiedName::opendma("DeclaredProperties");
    pub const PROPERTIES: QualifiedName = QualifiedName::opendma("Properties");
    pub const ASPECT: QualifiedName = QualifiedName::opendma("Aspect");
    pub const HIDDEN: QualifiedName = QualifiedName::opendma("Hidden");
    pub const SYSTEM: QualifiedName = QualifiedName::opendma("System");
    pub const RETRIEVABLE: QualifiedName = QualifiedName::opendma("Retrievable");
    pub const SEARCHABLE: QualifiedName = QualifiedName::opendma("Searchable");
    pub const SUB_CLASSES: QualifiedName = QualifiedName::opendma("SubClasses");
    pub const DATA_TYPE: QualifiedName = QualifiedName::opendma("DataType");
    pub const REFERENCE_CLASS: QualifiedName = QualifiedName::opendma("ReferenceClass");
    pub const MULTI_VALUE: QualifiedName = QualifiedName::opendma("MultiValue");
    pub const REQUIRED: QualifiedName = QualifiedName::opendma("Required");
    pub const READ_ONLY: QualifiedName = QualifiedName::opendma("ReadOnly");
    pub const CHOICES: QualifiedName = QualifiedName::opendma("Choices");
    pub const STRING_VALUE: QualifiedName = QualifiedName::opendma("StringValue");
    pub const INTEGER_VALUE: QualifiedName = QualifiedName::opendma("IntegerValue");
    pub const SHORT_VALUE: QualifiedName = QualifiedName::opendma("ShortValue");
    pub const LONG_VALUE: QualifiedName = QualifiedName::opendma("LongValue");
    pub const FLOAT_VALUE: QualifiedName = QualifiedName::opendma("FloatValue");
    pub const DOUBLE_VALUE: QualifiedName = QualifiedName::opendma("DoubleValue");
    pub const BOOLEAN_VALUE: QualifiedName = QualifiedName::opendma("BooleanValue");
    pub const DATE_TIME_VALUE: QualifiedName = QualifiedName::opendma("DateTimeValue");
    pub const BINARY_VALUE: QualifiedName = QualifiedName::opendma("BinaryValue");
    pub const REFERENCE_VALUE: QualifiedName = QualifiedName::opendma("ReferenceValue");
    pub const ROOT_CLASS: QualifiedName = QualifiedName::opendma("RootClass");
    pub const ROOT_ASPECTS: QualifiedName = QualifiedName::opendma("RootAspects");
    pub const ROOT_FOLDER: QualifiedName = QualifiedName::opendma("RootFolder");
    pub const CREATED_AT: QualifiedName = QualifiedName::opendma("CreatedAt");
    pub const CREATED_BY: QualifiedName = QualifiedName::opendma("CreatedBy");
    pub const LAST_MODIFIED_AT: QualifiedName = QualifiedName::opendma("LastModifiedAt");
    pub const LAST_MODIFIED_BY: QualifiedName = QualifiedName::opendma("LastModifiedBy");
    pub const TITLE: QualifiedName = QualifiedName::opendma("Title");
    pub const VERSION: QualifiedName = QualifiedName::opendma("Version");
    pub const VERSION_COLLECTION: QualifiedName = QualifiedName::opendma("VersionCollection");
    pub const VERSION_INDEPENDENT_ID: QualifiedName = QualifiedName::opendma("VersionIndependentId");
    pub const VERSION_INDEPENDENT_GUID: QualifiedName = QualifiedName::opendma("VersionIndependentGuid");
    pub const CONTENT_ELEMENTS: QualifiedName = QualifiedName::opendma("ContentElements");
    pub const COMBINED_CONTENT_TYPE: QualifiedName = QualifiedName::opendma("CombinedContentType");
    pub const PRIMARY_CONTENT_ELEMENT: QualifiedName = QualifiedName::opendma("PrimaryContentElement");
    pub const CHECKED_OUT: QualifiedName = QualifiedName::opendma("CheckedOut");
    pub const CHECKED_OUT_AT: QualifiedName = QualifiedName::opendma("CheckedOutAt");
    pub const CHECKED_OUT_BY: QualifiedName = QualifiedName::opendma("CheckedOutBy");
    pub const CONTENT_TYPE: QualifiedName = QualifiedName::opendma("ContentType");
    pub const POSITION: QualifiedName = QualifiedName::opendma("Position");
    pub const CONTENT: QualifiedName = QualifiedName::opendma("Content");
    pub const SIZE: QualifiedName = QualifiedName::opendma("Size");
    pub const FILE_NAME: QualifiedName = QualifiedName::opendma("FileName");
    pub const LOCATION: QualifiedName = QualifiedName::opendma("Location");
    pub const VERSIONS: QualifiedName = QualifiedName::opendma("Versions");
    pub const LATEST: QualifiedName = QualifiedName::opendma("Latest");
    pub const RELEASED: QualifiedName = QualifiedName::opendma("Released");
    pub const IN_PROGRESS: QualifiedName = QualifiedName::opendma("InProgress");
    pub const CONTAINEES: QualifiedName = QualifiedName::opendma("Containees");
    pub const ASSOCIATIONS: QualifiedName = QualifiedName::opendma("Associations");
    pub const PARENT: QualifiedName = QualifiedName::opendma("Parent");
    pub const SUB_FOLDERS: QualifiedName = QualifiedName::opendma("SubFolders");
    pub const CONTAINED_IN: QualifiedName = QualifiedName::opendma("ContainedIn");
    pub const CONTAINED_IN_ASSOCIATIONS: QualifiedName = QualifiedName::opendma("ContainedInAssociations");
    pub const CONTAINER: QualifiedName = QualifiedName::opendma("Container");
    pub const CONTAINABLE: QualifiedName = QualifiedName::opendma("Containable");
}
