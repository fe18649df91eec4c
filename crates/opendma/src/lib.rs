//! # OpenDMA Architecture
//!
//! OpenDMA is a **backend-agnostic document model**. Backends expose objects
//! as bags of typed attributes; this crate gives those bags a strict type
//! discipline and projects them onto the domain interfaces callers program
//! against (`Document`, `Folder`, `Class`, ...).
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Projector (projector/)                                     │
//! │  - Registration table: accessor → (attribute, kind, card.)  │
//! │  - Projection: get_X / set_X / get_QName dispatch           │
//! │  - Typed interface traits and checked views                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store/)                                             │
//! │  - Abstract AttributeStore trait                            │
//! │  - MemoryObject / MemoryRepository / MemorySession          │
//! │  - JSON fixtures                                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Attributes (attributes/)                                   │
//! │  - ValueKind, Value, typed Attribute cells                  │
//! │  - Lazy providers, resolved at most once                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Strict Typing at the Cell
//!
//! An attribute's kind and cardinality are fixed when it is created. Every
//! read uses the getter for exactly that kind, every write is validated, and
//! there are no implicit conversions. The projector builds on that guarantee:
//! when a backend answers a registered accessor with a missing or mistyped
//! attribute, it broke a contract, and the error says so.
//!
//! ## Usage
//!
//! ```ignore
//! use opendma::prelude::*;
//!
//! let session = Fixture::load(path)?.into_session()?;
//! let object = session.object(&repo_id, &doc_id, None)?;
//! let doc = Projector::default().project(object);
//!
//! if let Some(document) = doc.as_document() {
//!     println!("{:?}", document.title()?);
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`attributes`]: Value kinds, values and typed cells
//! - [`names`]: Qualified names and object identifiers
//! - [`common`]: Names of the predefined classes and attributes
//! - [`store`]: Storage abstraction and the in-memory backend
//! - [`projector`]: Registration table and interface projection
//! - [`config`]: Table extensions loaded from `odma.toml`
//! - [`error`]: Error types

pub mod attributes;
pub mod common;
pub mod config;
pub mod error;
pub mod names;
pub mod projector;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use error::{OdmaError, Result};

/// The types most callers need.
pub mod prelude {
    pub use crate::attributes::{Attribute, ContentRef, ObjectRef, Value, ValueKind};
    pub use crate::error::{OdmaError, Result};
    pub use crate::names::{GlobalId, LocalId, QualifiedName};
    pub use crate::projector::interfaces::*;
    pub use crate::projector::{Outcome, Projection, Projector, RegistrationTable};
    pub use crate::store::fixture::Fixture;
    pub use crate::store::session::{MemorySession, Session};
    pub use crate::store::AttributeStore;
}
