use opendma::attributes::ResolutionState;
use opendma::common::{attribute, class};
use opendma::error::OdmaError;
use opendma::names::{LocalId, QualifiedName};
use opendma::prelude::*;
use opendma::store::session::{SearchResult, INSTANCE_OF_LANGUAGE};

const ARCHIVE: &str = r#"{
  "repositories": [{
    "id": "archive",
    "name": "Archive",
    "attributes": [
      { "name": "opendma:RootFolder", "kind": "Reference", "value": "root" }
    ],
    "objects": [
      { "id": "root", "classes": ["opendma:Folder"],
        "attributes": [
          { "name": "opendma:Title", "kind": "String", "value": "/" },
          { "name": "opendma:Parent", "kind": "Reference", "value": null },
          { "name": "opendma:SubFolders", "kind": "Reference", "multi": true, "value": ["letters"] }
        ] },
      { "id": "letters", "classes": ["opendma:Folder"],
        "attributes": [
          { "name": "opendma:Title", "kind": "String", "value": "Letters" },
          { "name": "opendma:Parent", "kind": "Reference", "value": "root" },
          { "name": "opendma:SubFolders", "kind": "Reference", "multi": true }
        ] },
      { "id": "letter-1", "classes": ["opendma:Document"],
        "attributes": [
          { "name": "opendma:Title", "kind": "String", "value": "Dear Sir" },
          { "name": "opendma:CreatedBy", "kind": "String", "value": "clerk" },
          { "name": "opendma:CreatedAt", "kind": "DateTime", "value": "2023-11-02T08:30:00Z" },
          { "name": "opendma:ContentElements", "kind": "Reference", "multi": true, "value": ["letter-1-body"] }
        ] },
      { "id": "letter-1-body", "classes": ["opendma:DataContentElement"],
        "attributes": [
          { "name": "opendma:ContentType", "kind": "String", "value": "text/plain" },
          { "name": "opendma:Content", "kind": "Content", "value": "Dear Sir," },
          { "name": "opendma:Size", "kind": "Long", "value": 9 }
        ] }
    ]
  }]
}"#;

fn id(s: &str) -> LocalId {
    LocalId::new(s).unwrap()
}

fn session() -> MemorySession {
    Fixture::from_json(ARCHIVE).unwrap().into_session().unwrap()
}

#[test]
fn walks_from_repository_to_folders() {
    let session = session();
    let projector = Projector::default();
    let repository = projector.project(session.repository(&id("archive")).unwrap());

    let repo = repository.as_repository().expect("repository interface");
    assert_eq!(repo.name().unwrap().as_deref(), Some("Archive"));

    let root = repo.root_folder().unwrap().expect("root folder");
    let subfolders = root.sub_folders().unwrap();
    assert_eq!(subfolders.len(), 1);
    assert_eq!(
        Container::title(&subfolders[0]).unwrap().as_deref(),
        Some("Letters")
    );
    let back_up = subfolders[0].parent().unwrap().expect("parent");
    assert_eq!(back_up.id().unwrap(), Some(id("root")));
}

#[test]
fn document_reads_audit_and_content() {
    let session = session();
    let object = session.object(&id("archive"), &id("letter-1"), None).unwrap();
    let doc = Projector::default().project(object);

    let document = doc.as_document().expect("document interface");
    assert_eq!(document.title().unwrap().as_deref(), Some("Dear Sir"));
    assert_eq!(document.created_by().unwrap().as_deref(), Some("clerk"));
    assert!(document.created_at().unwrap().is_some());
    assert!(document.last_modified_by().unwrap_err().is_contract_violation());

    let elements = document.content_elements().unwrap();
    let body = elements[0].as_data_content_element().expect("data element");
    assert_eq!(body.content_type().unwrap().as_deref(), Some("text/plain"));
    let bytes = body.content().unwrap().unwrap().read_to_vec().unwrap();
    assert_eq!(bytes, b"Dear Sir,");
}

#[test]
fn references_stay_id_resolved_until_forced() {
    let session = session();
    let letters = session.object(&id("archive"), &id("letters"), None).unwrap();
    let parent = letters.attribute(&attribute::PARENT).unwrap();

    assert_eq!(parent.resolution_state(), ResolutionState::IdResolved);
    assert_eq!(parent.get_reference_id().unwrap(), Some(id("root")));
    assert_eq!(parent.resolution_state(), ResolutionState::IdResolved);

    parent.get_reference().unwrap();
    assert_eq!(parent.resolution_state(), ResolutionState::Resolved);
}

#[test]
fn prepare_costs_one_round_trip() {
    let session = session();
    let doc = session.memory_object(&id("archive"), &id("letter-1")).unwrap();
    let names = [attribute::TITLE, attribute::CREATED_BY, attribute::CREATED_AT];

    doc.prepare_attributes(Some(&names), false).unwrap();
    assert_eq!(doc.round_trips(), 1);

    for name in &names {
        doc.attribute(name).unwrap();
    }
    assert_eq!(doc.round_trips(), 1);

    doc.prepare_attributes(None, false).unwrap();
    assert_eq!(doc.round_trips(), 2);
}

#[test]
fn search_by_class_returns_projectable_objects() {
    let session = session();
    assert_eq!(session.supported_query_languages(), vec![INSTANCE_OF_LANGUAGE]);

    let hits = session
        .search(&id("archive"), &INSTANCE_OF_LANGUAGE, "opendma:Folder")
        .unwrap();
    assert_eq!(hits.size(), 2);
    let projector = Projector::default();
    for hit in hits.objects() {
        assert!(projector.project(hit).implements("Folder"));
    }

    let none = session
        .search(&id("archive"), &INSTANCE_OF_LANGUAGE, "opendma:Association")
        .unwrap();
    assert_eq!(none.size(), 0);
}

#[test]
fn search_errors() {
    let session = session();
    let sql = QualifiedName::new("sql", "Select").unwrap();
    assert!(matches!(
        session.search(&id("archive"), &sql, "opendma:Folder"),
        Err(OdmaError::QuerySyntax(_))
    ));
    assert!(matches!(
        session.search(&id("archive"), &INSTANCE_OF_LANGUAGE, "Folder"),
        Err(OdmaError::QuerySyntax(_))
    ));
    assert!(matches!(
        session.object(&id("missing"), &id("root"), None),
        Err(OdmaError::ObjectNotFound(_))
    ));
}

#[test]
fn closed_session_refuses_work_but_objects_survive() {
    let session = session();
    let doc = session.object(&id("archive"), &id("letter-1"), None).unwrap();
    session.close();

    assert!(matches!(
        session.repository_ids(),
        Err(OdmaError::AuthenticationFailure(_))
    ));
    assert!(doc.instance_of(&class::DOCUMENT));
    assert!(doc.attribute(&attribute::TITLE).is_ok());
}
