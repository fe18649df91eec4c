//! Session, repository and search boundary.
//!
//! A [`Session`] is the entry point a backend offers: it lists repositories,
//! hands out objects and runs queries. The core never depends on it; it exists
//! so that callers (the CLI, tests) can reach objects without knowing the
//! backend. [`MemorySession`] implements it over [`MemoryRepository`]s.

use super::memory::{MemoryObject, MemoryRepository};
use super::AttributeStore;
use crate::error::{OdmaError, Result};
use crate::names::{GlobalId, LocalId, QualifiedName};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::debug;

/// Query language of [`MemorySession`]: the query is a class or aspect name,
/// and every object that is an instance of it matches.
pub const INSTANCE_OF_LANGUAGE: QualifiedName =
    QualifiedName::from_static("memory", "InstanceOf");

pub trait Session {
    fn repository_ids(&self) -> Result<Vec<LocalId>>;

    /// The repository's own object.
    fn repository(&self, repository: &LocalId) -> Result<Rc<dyn AttributeStore>>;

    /// An object, with `prepare` attributes fetched in one batch.
    fn object(
        &self,
        repository: &LocalId,
        object: &LocalId,
        prepare: Option<&[QualifiedName]>,
    ) -> Result<Rc<dyn AttributeStore>>;

    fn search(
        &self,
        repository: &LocalId,
        language: &QualifiedName,
        query: &str,
    ) -> Result<Box<dyn SearchResult>>;

    fn supported_query_languages(&self) -> Vec<QualifiedName>;

    /// Invalidates the session. Later calls fail; objects already handed
    /// out stay usable.
    fn close(&self);
}

pub trait SearchResult {
    fn objects(&self) -> Vec<Rc<dyn AttributeStore>>;

    fn size(&self) -> usize;
}

pub struct MemorySearchResult {
    objects: Vec<Rc<dyn AttributeStore>>,
}

impl SearchResult for MemorySearchResult {
    fn objects(&self) -> Vec<Rc<dyn AttributeStore>> {
        self.objects.clone()
    }

    fn size(&self) -> usize {
        self.objects.len()
    }
}

#[derive(Debug, Default)]
pub struct MemorySession {
    repositories: BTreeMap<LocalId, MemoryRepository>,
    closed: Cell<bool>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_repository(&mut self, repository: MemoryRepository) {
        self.repositories.insert(repository.id().clone(), repository);
    }

    /// The concrete in-memory repository, for backend-aware callers.
    pub fn memory_repository(&self, repository: &LocalId) -> Result<&MemoryRepository> {
        self.ensure_open()?;
        self.repositories.get(repository).ok_or_else(|| {
            OdmaError::ObjectNotFound(GlobalId::new(repository.clone(), repository.clone()))
        })
    }

    /// The concrete in-memory object, for backend-aware callers.
    pub fn memory_object(&self, repository: &LocalId, object: &LocalId) -> Result<Rc<MemoryObject>> {
        self.memory_repository(repository)?.get(object)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.get() {
            Err(OdmaError::AuthenticationFailure("session is closed".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Session for MemorySession {
    fn repository_ids(&self) -> Result<Vec<LocalId>> {
        self.ensure_open()?;
        Ok(self.repositories.keys().cloned().collect())
    }

    fn repository(&self, repository: &LocalId) -> Result<Rc<dyn AttributeStore>> {
        let root: Rc<dyn AttributeStore> = self.memory_repository(repository)?.root()?;
        Ok(root)
    }

    fn object(
        &self,
        repository: &LocalId,
        object: &LocalId,
        prepare: Option<&[QualifiedName]>,
    ) -> Result<Rc<dyn AttributeStore>> {
        let found: Rc<dyn AttributeStore> = self.memory_object(repository, object)?;
        if let Some(names) = prepare {
            found.prepare_attributes(Some(names), false)?;
        }
        Ok(found)
    }

    fn search(
        &self,
        repository: &LocalId,
        language: &QualifiedName,
        query: &str,
    ) -> Result<Box<dyn SearchResult>> {
        let repo = self.memory_repository(repository)?;
        if *language != INSTANCE_OF_LANGUAGE {
            return Err(OdmaError::QuerySyntax(format!(
                "unsupported query language `{}`",
                language
            )));
        }
        let class: QualifiedName = query.trim().parse().map_err(|e| {
            OdmaError::QuerySyntax(format!("`{}` is not a class name: {}", query, e))
        })?;
        let objects: Vec<Rc<dyn AttributeStore>> = repo
            .objects()
            .into_iter()
            .filter(|object| object.instance_of(&class))
            .map(|object| object as Rc<dyn AttributeStore>)
            .collect();
        debug!(repository = %repository, class = %class, hits = objects.len(), "search");
        Ok(Box::new(MemorySearchResult { objects }))
    }

    fn supported_query_languages(&self) -> Vec<QualifiedName> {
        vec![INSTANCE_OF_LANGUAGE]
    }

    fn close(&self) {
        self.closed.set(true);
    }
}
