//! # Attribute Store
//!
//! The [`AttributeStore`] trait is the seam between the core and a backend.
//! Backends own their objects; the core only ever sees them through this
//! trait, either directly (ad-hoc attribute access) or wrapped in a
//! [`Projection`](crate::projector::Projection).
//!
//! ## Effective attribute set
//!
//! Every object has a set of attribute names it can answer for. Asking for a
//! name outside that set fails with
//! [`AttributeNotFound`](crate::error::OdmaError::AttributeNotFound). How a
//! backend fetches attributes is its own business, but batch preparation
//! must amortize round trips: preparing N attributes costs one fetch, not N.
//!
//! ## Implementations
//!
//! - [`memory::MemoryObject`]: an in-memory object that counts its round trips.
//! - [`session::MemorySession`]: repositories and search over in-memory objects.
//! - [`fixture::Fixture`]: loads a [`MemorySession`](session::MemorySession) from JSON.
//!
//! All methods take `&self`; implementations use interior mutability and are
//! single-threaded.

use crate::attributes::{Attribute, Value};
use crate::error::Result;
use crate::names::QualifiedName;
use std::rc::Rc;

pub mod fixture;
pub mod memory;
pub mod session;

pub trait AttributeStore {
    /// The cell for `name`, fetched on demand.
    fn attribute(&self, name: &QualifiedName) -> Result<Rc<Attribute>>;

    /// Fetches the named attributes (or all of them for `None`) in one batch.
    ///
    /// Names outside the effective set are ignored. With `refresh`, cells
    /// already present are fetched again and local changes are lost.
    fn prepare_attributes(&self, names: Option<&[QualifiedName]>, refresh: bool) -> Result<()>;

    /// Writes through to the cell's `set_value`.
    fn set_attribute(&self, name: &QualifiedName, value: Value) -> Result<()> {
        self.attribute(name)?.set_value(value)
    }

    /// True if any attribute has unsaved changes.
    fn is_dirty(&self) -> bool;

    /// Commits unsaved changes to the backend.
    fn save(&self) -> Result<()>;

    /// True if the object's class, one of its superclasses or one of its
    /// aspects is named `class_or_aspect`.
    fn instance_of(&self, class_or_aspect: &QualifiedName) -> bool;
}
