//! The typed attribute cell.
//!
//! An [`Attribute`] holds either a concrete [`Value`] or a pending
//! [`LazyValueProvider`], never both. Every read and write is checked against
//! the attribute's kind and cardinality:
//!
//! - multi-value attributes hold a [`List`](super::List) of their kind, never null
//! - single-value attributes hold null or a [`Scalar`](super::Scalar) of their kind
//!
//! ## Lazy resolution
//!
//! ```text
//!   Unresolved ──┐
//!                ├── first forcing read ──> Resolved ──set_value──> Resolved
//!   IdResolved ──┘
//! ```
//!
//! `IdResolved` is not a transition: it is a pending provider that can name
//! the referenced object's id without a round trip. The provider is consumed
//! exactly once. Its result is validated, the cell is marked clean and the
//! provider is dropped for good. A write replaces a pending provider without
//! consulting it.
//!
//! Cells use `RefCell` for interior mutability, so reads can resolve through
//! `&self`. They are not `Sync`; concurrent use must be serialized by the owner.

use super::kind::ValueKind;
use super::value::{ContentRef, ObjectRef, Value};
use crate::error::{OdmaError, Result};
use crate::names::{GlobalId, LocalId, QualifiedName};
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// How much of an attribute's value is available without a backend round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// A provider is pending and knows nothing yet.
    Unresolved,
    /// A provider is pending but can name the referenced object's id.
    IdResolved,
    /// The value is concrete.
    Resolved,
}

/// Deferred source of an attribute value, supplied by a backend.
pub trait LazyValueProvider {
    /// Whether [`reference_id`](Self::reference_id) can answer without a round trip.
    fn has_reference_id(&self) -> bool;

    fn reference_id(&self) -> Option<LocalId>;

    /// Fetches the full value. May block on the backend.
    fn resolve_value(&self) -> Result<Value>;
}

enum Slot {
    Concrete(Value),
    Pending(Rc<dyn LazyValueProvider>),
}

struct CellState {
    slot: Slot,
    dirty: bool,
}

pub struct Attribute {
    name: QualifiedName,
    kind: ValueKind,
    multi_value: bool,
    read_only: bool,
    state: RefCell<CellState>,
}

macro_rules! typed_getters {
    ($($kind:ident: $ty:ty => $single:ident, $list:ident;)*) => {
        $(
            #[doc = concat!("The value of a single-valued ", stringify!($kind), " attribute.")]
            pub fn $single(&self) -> Result<Option<$ty>> {
                self.require(ValueKind::$kind, false, stringify!($single))?;
                self.get_value()?.into_single::<$ty>()
            }

            #[doc = concat!("The values of a multi-valued ", stringify!($kind), " attribute.")]
            pub fn $list(&self) -> Result<Vec<$ty>> {
                self.require(ValueKind::$kind, true, stringify!($list))?;
                self.get_value()?.into_list::<$ty>()
            }
        )*
    };
}

impl Attribute {
    /// Creates a cell with a concrete value. The new cell is not dirty.
    pub fn new(
        name: QualifiedName,
        kind: ValueKind,
        multi_value: bool,
        value: impl Into<Value>,
    ) -> Result<Self> {
        let attr = Self {
            name,
            kind,
            multi_value,
            read_only: false,
            state: RefCell::new(CellState {
                slot: Slot::Concrete(Value::Null),
                dirty: false,
            }),
        };
        let value = value.into();
        attr.validate(&value)?;
        attr.state.borrow_mut().slot = Slot::Concrete(value);
        Ok(attr)
    }

    /// Creates a cell whose value is fetched from `provider` on first read.
    pub fn lazy(
        name: QualifiedName,
        kind: ValueKind,
        multi_value: bool,
        provider: Rc<dyn LazyValueProvider>,
    ) -> Self {
        Self {
            name,
            kind,
            multi_value,
            read_only: false,
            state: RefCell::new(CellState {
                slot: Slot::Pending(provider),
                dirty: false,
            }),
        }
    }

    /// Marks the cell read-only.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_multi_value(&self) -> bool {
        self.multi_value
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_dirty(&self) -> bool {
        self.state.borrow().dirty
    }

    /// Clears the dirty flag. Called by the backend after a successful save.
    pub fn mark_clean(&self) {
        self.state.borrow_mut().dirty = false;
    }

    pub fn resolution_state(&self) -> ResolutionState {
        match &self.state.borrow().slot {
            Slot::Concrete(_) => ResolutionState::Resolved,
            Slot::Pending(p)
                if self.kind == ValueKind::Reference
                    && !self.multi_value
                    && p.has_reference_id() =>
            {
                ResolutionState::IdResolved
            }
            Slot::Pending(_) => ResolutionState::Unresolved,
        }
    }

    /// e.g. "single-valued String"
    pub fn shape(&self) -> String {
        let cardinality = if self.multi_value { "multi" } else { "single" };
        format!("{}-valued {}", cardinality, self.kind)
    }

    /// The concrete value, resolving a pending provider first.
    pub fn get_value(&self) -> Result<Value> {
        self.enforce_value()?;
        match &self.state.borrow().slot {
            Slot::Concrete(value) => Ok(value.clone()),
            Slot::Pending(_) => Err(OdmaError::service(format!(
                "Attribute `{}` is still pending after resolution",
                self.name
            ))),
        }
    }

    /// Replaces the value. Any pending provider is discarded unconsulted.
    pub fn set_value(&self, value: impl Into<Value>) -> Result<()> {
        if self.read_only {
            return Err(OdmaError::AccessDenied(format!(
                "attribute `{}` is read-only",
                self.name
            )));
        }
        let value = value.into();
        self.validate(&value)?;
        let mut state = self.state.borrow_mut();
        state.slot = Slot::Concrete(value);
        state.dirty = true;
        Ok(())
    }

    typed_getters! {
        String: String => get_string, get_string_list;
        Integer: i32 => get_integer, get_integer_list;
        Short: i16 => get_short, get_short_list;
        Long: i64 => get_long, get_long_list;
        Float: f32 => get_float, get_float_list;
        Double: f64 => get_double, get_double_list;
        Boolean: bool => get_boolean, get_boolean_list;
        DateTime: DateTime<Utc> => get_date_time, get_date_time_list;
        Binary: Vec<u8> => get_binary, get_binary_list;
        Reference: ObjectRef => get_reference, get_reference_list;
        Content: ContentRef => get_content, get_content_list;
        Id: LocalId => get_id, get_id_list;
        Guid: GlobalId => get_guid, get_guid_list;
    }

    /// The id of the referenced object.
    ///
    /// Answered by a pending provider when it knows the id; otherwise the
    /// value is resolved and the id read from the referenced object.
    pub fn get_reference_id(&self) -> Result<Option<LocalId>> {
        self.require(ValueKind::Reference, false, "get_reference_id")?;
        let pending = match &self.state.borrow().slot {
            Slot::Pending(provider) => Some(Rc::clone(provider)),
            Slot::Concrete(_) => None,
        };
        if let Some(provider) = pending {
            if provider.has_reference_id() {
                return Ok(provider.reference_id());
            }
        }
        match self.get_reference()? {
            Some(target) => target.id(),
            None => Ok(None),
        }
    }

    fn require(&self, kind: ValueKind, multi_value: bool, accessor: &str) -> Result<()> {
        if self.kind == kind && self.multi_value == multi_value {
            Ok(())
        } else {
            Err(OdmaError::InvalidKind(format!(
                "attribute `{}` is {}; it cannot be read with `{}`",
                self.name,
                self.shape(),
                accessor
            )))
        }
    }

    fn validate(&self, value: &Value) -> Result<()> {
        let fits = match value {
            Value::Null if self.multi_value => {
                return Err(OdmaError::InvalidKind(format!(
                    "multi-valued attribute `{}` must not be null; use an empty list",
                    self.name
                )));
            }
            Value::Null => true,
            Value::Scalar(s) => !self.multi_value && s.kind() == self.kind,
            Value::List(l) => self.multi_value && l.kind() == self.kind,
        };
        if fits {
            Ok(())
        } else {
            Err(OdmaError::InvalidKind(format!(
                "attribute `{}` is {}; it cannot hold a {} value",
                self.name,
                self.shape(),
                value.describe()
            )))
        }
    }

    fn enforce_value(&self) -> Result<()> {
        let provider = match &self.state.borrow().slot {
            Slot::Pending(provider) => Rc::clone(provider),
            Slot::Concrete(_) => return Ok(()),
        };
        debug!(attribute = %self.name, "resolving lazy value");
        let value = provider.resolve_value()?;
        if let Err(e) = self.validate(&value) {
            warn!(attribute = %self.name, error = %e, "lazy provider delivered a mistyped value");
            return Err(e.into_service(format!(
                "Lazy resolution of `{}` failed: provider delivered wrong kind or cardinality",
                self.name
            )));
        }
        let mut state = self.state.borrow_mut();
        // A write during resolution wins over the provider's value.
        if matches!(state.slot, Slot::Pending(_)) {
            state.slot = Slot::Concrete(value);
            state.dirty = false;
        }
        Ok(())
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("multi_value", &self.multi_value)
            .field("read_only", &self.read_only)
            .field("dirty", &self.is_dirty())
            .field("resolution_state", &self.resolution_state())
            .finish()
    }
}
