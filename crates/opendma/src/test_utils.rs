use crate::attributes::{LazyValueProvider, Value};
use crate::error::{OdmaError, Result};
use crate::names::LocalId;
use std::cell::Cell;

/// A provider that hands out a fixed value and counts how often it is asked.
pub struct CountingProvider {
    value: Option<Value>,
    reference_id: Option<LocalId>,
    resolve_calls: Cell<usize>,
    id_calls: Cell<usize>,
}

impl CountingProvider {
    pub fn new(value: Value) -> Self {
        Self {
            value: Some(value),
            reference_id: None,
            resolve_calls: Cell::new(0),
            id_calls: Cell::new(0),
        }
    }

    /// A provider whose every resolution fails with `AuthenticationFailure`.
    pub fn failing() -> Self {
        Self {
            value: None,
            ..Self::new(Value::Null)
        }
    }

    /// Lets the provider name the referenced id without resolving.
    pub fn with_reference_id(mut self, id: &str) -> Self {
        self.reference_id = LocalId::new(id).ok();
        self
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.get()
    }

    pub fn id_calls(&self) -> usize {
        self.id_calls.get()
    }
}

impl LazyValueProvider for CountingProvider {
    fn has_reference_id(&self) -> bool {
        self.reference_id.is_some()
    }

    fn reference_id(&self) -> Option<LocalId> {
        self.id_calls.set(self.id_calls.get() + 1);
        self.reference_id.clone()
    }

    fn resolve_value(&self) -> Result<Value> {
        self.resolve_calls.set(self.resolve_calls.get() + 1);
        self.value
            .clone()
            .ok_or_else(|| OdmaError::AuthenticationFailure("credentials expired".to_string()))
    }
}
