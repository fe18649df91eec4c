//! JSON fixtures for the in-memory backend.
//!
//! ```json
//! { "repositories": [ { "id": "r1", "name": "Main", "objects": [
//!   { "id": "doc-1", "classes": ["opendma:Document"],
//!     "attributes": [
//!       { "name": "opendma:Title", "kind": "String", "value": "Hello" },
//!       { "name": "opendma:Parent", "kind": "Reference", "value": "folder-1" },
//!       { "name": "opendma:Aspects", "kind": "Reference", "multi": true, "value": [] } ] } ] } ] }
//! ```
//!
//! Value encodings by kind:
//!
//! | Kind | JSON |
//! |------|------|
//! | `String` | string |
//! | `Integer`, `Short`, `Long` | integer within range |
//! | `Float`, `Double` | number |
//! | `Boolean` | bool |
//! | `DateTime` | RFC 3339 string |
//! | `Binary` | string (UTF-8 bytes) or array of bytes |
//! | `Content` | string, served as a byte stream |
//! | `Id` | string |
//! | `Guid` | `{ "object_id": "..", "repository_id": ".." }` |
//! | `Reference` | id of an object in the same repository |
//!
//! A single value may be `null`; an omitted or `null` multi value is empty.

use super::memory::{AttributeData, MemoryObject, MemoryRepository};
use super::session::MemorySession;
use crate::attributes::{BytesContent, ContentRef, Value, ValueKind, ValueType};
use crate::common::{attribute, class};
use crate::error::{OdmaError, Result};
use crate::names::{GlobalId, LocalId, QualifiedName};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value as Json;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    pub repositories: Vec<RepositoryFixture>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryFixture {
    pub id: LocalId,
    /// Name and display name of the repository object. Defaults to the id.
    pub name: Option<String>,
    #[serde(default)]
    pub classes: Vec<QualifiedName>,
    #[serde(default)]
    pub attributes: Vec<AttributeFixture>,
    #[serde(default)]
    pub objects: Vec<ObjectFixture>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectFixture {
    pub id: LocalId,
    #[serde(default)]
    pub classes: Vec<QualifiedName>,
    #[serde(default)]
    pub attributes: Vec<AttributeFixture>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeFixture {
    pub name: QualifiedName,
    pub kind: ValueKind,
    #[serde(default)]
    pub multi: bool,
    #[serde(default)]
    pub value: Json,
    #[serde(default)]
    pub read_only: bool,
}

impl Fixture {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| OdmaError::Fixture(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| OdmaError::Fixture(format!("{}: {}", path.display(), e)))
    }

    /// Builds a session holding every repository of the fixture.
    pub fn into_session(self) -> Result<MemorySession> {
        let mut session = MemorySession::new();
        for repo in self.repositories {
            session.add_repository(repo.build()?);
        }
        Ok(session)
    }
}

impl RepositoryFixture {
    fn build(self) -> Result<MemoryRepository> {
        let name = self.name.unwrap_or_else(|| self.id.to_string());
        let mut root = MemoryObject::new(self.id.clone())
            .with_class(class::REPOSITORY)
            .with_attribute(
                attribute::NAME,
                AttributeData::value(ValueKind::String, false, name.clone()),
            )?
            .with_attribute(
                attribute::DISPLAY_NAME,
                AttributeData::value(ValueKind::String, false, name),
            )?;
        for class in self.classes {
            root = root.with_class(class);
        }
        for attr in &self.attributes {
            root = root.with_attribute(attr.name.clone(), attr.to_data()?)?;
        }

        let repository = MemoryRepository::with_root(root)?;
        let count = self.objects.len();
        for object in self.objects {
            repository.insert(object.build()?)?;
        }
        debug!(repository = %repository.id(), objects = count, "loaded fixture repository");
        Ok(repository)
    }
}

impl ObjectFixture {
    fn build(self) -> Result<MemoryObject> {
        let mut object = MemoryObject::new(self.id);
        for class in self.classes {
            object = object.with_class(class);
        }
        for attr in &self.attributes {
            object = object.with_attribute(attr.name.clone(), attr.to_data()?)?;
        }
        Ok(object)
    }
}

impl AttributeFixture {
    fn to_data(&self) -> Result<AttributeData> {
        let data = if self.kind == ValueKind::Reference {
            self.reference_data()?
        } else {
            let value = decode_value(self.kind, self.multi, &self.value).map_err(|expected| {
                OdmaError::Fixture(format!(
                    "attribute `{}`: expected {}, found {}",
                    self.name, expected, self.value
                ))
            })?;
            AttributeData::value(self.kind, self.multi, value)
        };
        Ok(if self.read_only { data.read_only() } else { data })
    }

    fn reference_data(&self) -> Result<AttributeData> {
        let bad = || {
            OdmaError::Fixture(format!(
                "attribute `{}`: expected object id{}, found {}",
                self.name,
                if self.multi { " list" } else { "" },
                self.value
            ))
        };
        if self.multi {
            let ids = match &self.value {
                Json::Null => Vec::new(),
                Json::Array(items) => items
                    .iter()
                    .map(|item| item.as_str().and_then(|s| LocalId::new(s).ok()).ok_or_else(bad))
                    .collect::<Result<Vec<_>>>()?,
                _ => return Err(bad()),
            };
            Ok(AttributeData::references(ids))
        } else {
            let id = match &self.value {
                Json::Null => None,
                Json::String(s) => Some(LocalId::new(s.as_str()).map_err(|_| bad())?),
                _ => return Err(bad()),
            };
            Ok(AttributeData::reference(id))
        }
    }
}

type Decoded<T> = std::result::Result<T, &'static str>;

fn decode_value(kind: ValueKind, multi: bool, json: &Json) -> Decoded<Value> {
    match kind {
        ValueKind::String => decode(multi, json, string),
        ValueKind::Integer => decode(multi, json, integer::<i32>),
        ValueKind::Short => decode(multi, json, integer::<i16>),
        ValueKind::Long => decode(multi, json, integer::<i64>),
        ValueKind::Float => decode(multi, json, float),
        ValueKind::Double => decode(multi, json, number),
        ValueKind::Boolean => decode(multi, json, |j| j.as_bool().ok_or("a boolean")),
        ValueKind::DateTime => decode(multi, json, date_time),
        ValueKind::Binary => decode(multi, json, binary),
        ValueKind::Content => decode(multi, json, content),
        ValueKind::Id => decode(multi, json, |j| {
            j.as_str().and_then(|s| LocalId::new(s).ok()).ok_or("a non-empty id")
        }),
        ValueKind::Guid => decode(multi, json, |j| {
            serde_json::from_value::<GlobalId>(j.clone()).map_err(|_| "an object_id/repository_id pair")
        }),
        ValueKind::Reference => Err("an object id"),
    }
}

fn decode<T: ValueType>(multi: bool, json: &Json, item: impl Fn(&Json) -> Decoded<T>) -> Decoded<Value> {
    match (multi, json) {
        (true, Json::Null) => Ok(Value::List(T::into_list(Vec::new()))),
        (true, Json::Array(items)) => items
            .iter()
            .map(&item)
            .collect::<Decoded<Vec<T>>>()
            .map(|values| Value::List(T::into_list(values))),
        (true, _) => Err("a list"),
        (false, Json::Null) => Ok(Value::Null),
        (false, json) => item(json).map(|v| Value::Scalar(v.into_scalar())),
    }
}

fn string(json: &Json) -> Decoded<String> {
    json.as_str().map(str::to_string).ok_or("a string")
}

fn integer<T: TryFrom<i64>>(json: &Json) -> Decoded<T> {
    json.as_i64()
        .and_then(|n| T::try_from(n).ok())
        .ok_or("an integer in range")
}

fn number(json: &Json) -> Decoded<f64> {
    json.as_f64().ok_or("a number")
}

fn float(json: &Json) -> Decoded<f32> {
    let value = number(json)? as f32;
    if value.is_finite() {
        Ok(value)
    } else {
        Err("a number within Float range")
    }
}

fn date_time(json: &Json) -> Decoded<DateTime<Utc>> {
    json.as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or("an RFC 3339 timestamp")
}

fn binary(json: &Json) -> Decoded<Vec<u8>> {
    match json {
        Json::String(s) => Ok(s.as_bytes().to_vec()),
        Json::Array(items) => items
            .iter()
            .map(|b| integer::<u8>(b).map_err(|_| "an array of bytes"))
            .collect(),
        _ => Err("a string or an array of bytes"),
    }
}

fn content(json: &Json) -> Decoded<ContentRef> {
    json.as_str()
        .map(|s| ContentRef::new(BytesContent::new(s.as_bytes().to_vec())))
        .ok_or("a string")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::ResolutionState;
    use crate::store::session::Session;
    use crate::store::AttributeStore;

    const LIBRARY: &str = r#"{
      "repositories": [{
        "id": "r1",
        "name": "Main",
        "objects": [
          { "id": "folder-1", "classes": ["opendma:Folder", "opendma:Container"],
            "attributes": [
              { "name": "opendma:Title", "kind": "String", "value": "Inbox" }
            ] },
          { "id": "doc-1", "classes": ["opendma:Document"],
            "attributes": [
              { "name": "opendma:Title", "kind": "string", "value": "Hello" },
              { "name": "opendma:Parent", "kind": "Reference", "value": "folder-1" },
              { "name": "opendma:Aspects", "kind": "Reference", "multi": true, "value": [] },
              { "name": "opendma:CheckedOut", "kind": "Boolean", "value": false },
              { "name": "opendma:CreatedAt", "kind": "DateTime", "value": "2024-05-01T10:00:00Z" },
              { "name": "opendma:Size", "kind": "Long", "multi": true, "value": [1, 2] },
              { "name": "opendma:Content", "kind": "Content", "value": "bytes!" },
              { "name": "opendma:VersionIndependentGuid", "kind": "Guid",
                "value": { "object_id": "doc-1", "repository_id": "r1" } },
              { "name": "opendma:Id", "kind": "Id", "value": "doc-1", "read_only": true }
            ] }
        ]
      }]
    }"#;

    fn id(s: &str) -> LocalId {
        LocalId::new(s).unwrap()
    }

    #[test]
    fn loads_objects_and_values() {
        let session = Fixture::from_json(LIBRARY).unwrap().into_session().unwrap();
        let doc = session.object(&id("r1"), &id("doc-1"), None).unwrap();

        let title = doc.attribute(&attribute::TITLE).unwrap();
        assert_eq!(title.get_string().unwrap().as_deref(), Some("Hello"));
        assert_eq!(
            doc.attribute(&attribute::SIZE).unwrap().get_long_list().unwrap(),
            vec![1, 2]
        );
        let created = doc.attribute(&attribute::CREATED_AT).unwrap().get_date_time().unwrap();
        assert_eq!(created.unwrap().to_rfc3339(), "2024-05-01T10:00:00+00:00");
        let content = doc.attribute(&attribute::CONTENT).unwrap().get_content().unwrap();
        assert_eq!(content.unwrap().read_to_vec().unwrap(), b"bytes!");
        assert!(doc.instance_of(&class::DOCUMENT));
    }

    #[test]
    fn references_load_lazily_with_known_id() {
        let session = Fixture::from_json(LIBRARY).unwrap().into_session().unwrap();
        let doc = session.object(&id("r1"), &id("doc-1"), None).unwrap();

        let parent = doc.attribute(&attribute::PARENT).unwrap();
        assert_eq!(parent.resolution_state(), ResolutionState::IdResolved);
        assert_eq!(parent.get_reference_id().unwrap(), Some(id("folder-1")));

        let folder = parent.get_reference().unwrap().unwrap();
        assert!(folder.store().instance_of(&class::FOLDER));
        let aspects = doc.attribute(&attribute::ASPECTS).unwrap();
        assert!(aspects.get_reference_list().unwrap().is_empty());
    }

    #[test]
    fn identity_attributes_are_added() {
        let session = Fixture::from_json(LIBRARY).unwrap().into_session().unwrap();
        let folder = session.object(&id("r1"), &id("folder-1"), None).unwrap();
        assert_eq!(
            folder.attribute(&attribute::ID).unwrap().get_id().unwrap(),
            Some(id("folder-1"))
        );
        assert_eq!(
            folder.attribute(&attribute::GUID).unwrap().get_guid().unwrap(),
            Some(GlobalId::new(id("folder-1"), id("r1")))
        );
        let repo = folder.attribute(&attribute::REPOSITORY).unwrap();
        assert_eq!(repo.get_reference_id().unwrap(), Some(id("r1")));

        let root = session.repository(&id("r1")).unwrap();
        let name = root.attribute(&attribute::NAME).unwrap().get_string().unwrap();
        assert_eq!(name.as_deref(), Some("Main"));
    }

    #[test]
    fn fixture_read_only_flag_is_honoured() {
        let session = Fixture::from_json(LIBRARY).unwrap().into_session().unwrap();
        let doc = session.object(&id("r1"), &id("doc-1"), None).unwrap();
        assert!(doc.attribute(&attribute::ID).unwrap().is_read_only());
        assert!(!doc.attribute(&attribute::TITLE).unwrap().is_read_only());
    }

    #[test]
    fn wrong_json_type_names_the_attribute() {
        let text = r#"{ "repositories": [{ "id": "r1", "objects": [{ "id": "d",
            "attributes": [{ "name": "opendma:Title", "kind": "Integer", "value": "x" }] }] }] }"#;
        let err = Fixture::from_json(text).unwrap().into_session().unwrap_err();
        assert!(matches!(err, OdmaError::Fixture(_)));
        assert!(err.to_string().contains("opendma:Title"), "{err}");
    }

    #[test]
    fn out_of_range_integers_are_rejected() {
        let text = r#"{ "repositories": [{ "id": "r1", "objects": [{ "id": "d",
            "attributes": [{ "name": "x:n", "kind": "Short", "value": 70000 }] }] }] }"#;
        assert!(Fixture::from_json(text).unwrap().into_session().is_err());
    }

    #[test]
    fn floats_beyond_f32_range_are_rejected() {
        let text = r#"{ "repositories": [{ "id": "r1", "objects": [{ "id": "d",
            "attributes": [{ "name": "x:f", "kind": "Float", "value": 1e300 }] }] }] }"#;
        let err = Fixture::from_json(text).unwrap().into_session().unwrap_err();
        assert!(matches!(err, OdmaError::Fixture(ref m) if m.contains("Float range")), "{err:?}");

        let fits = r#"{ "repositories": [{ "id": "r1", "objects": [{ "id": "d",
            "attributes": [{ "name": "x:f", "kind": "Float", "multi": true, "value": [1.5, -2.25] }] }] }] }"#;
        assert!(Fixture::from_json(fits).unwrap().into_session().is_ok());
    }

    #[test]
    fn unknown_kinds_and_fields_are_rejected() {
        let blob = r#"{ "repositories": [{ "id": "r1", "objects": [{ "id": "d",
            "attributes": [{ "name": "x:n", "kind": "Blob", "value": 1 }] }] }] }"#;
        assert!(matches!(Fixture::from_json(blob), Err(OdmaError::Fixture(_))));

        let extra = r#"{ "repositories": [], "extra": 1 }"#;
        assert!(Fixture::from_json(extra).is_err());
    }

    #[test]
    fn multi_value_null_loads_as_empty_list() {
        let text = r#"{ "repositories": [{ "id": "r1", "objects": [{ "id": "d",
            "attributes": [{ "name": "x:tags", "kind": "String", "multi": true }] }] }] }"#;
        let session = Fixture::from_json(text).unwrap().into_session().unwrap();
        let d = session.object(&id("r1"), &id("d"), None).unwrap();
        let tags = QualifiedName::new("x", "tags").unwrap();
        assert!(d.attribute(&tags).unwrap().get_string_list().unwrap().is_empty());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(&path, LIBRARY).unwrap();
        let fixture = Fixture::load(&path).unwrap();
        assert_eq!(fixture.repositories.len(), 1);

        assert!(matches!(
            Fixture::load(&dir.path().join("missing.json")),
            Err(OdmaError::Io(_))
        ));
    }
}
