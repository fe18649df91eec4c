//! # Error Taxonomy
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! partitions failures into three groups:
//!
//! | Group | Variants | Meaning |
//! |-------|----------|---------|
//! | Caller | `AccessDenied`, `InvalidKind`, `AttributeNotFound`, `Unsupported`, `InvalidName` | The caller asked for something the object cannot do |
//! | Contract | `Service` | The backend broke a guarantee the projector depends on |
//! | Backend | `ObjectNotFound`, `AuthenticationFailure`, `QuerySyntax`, `Io`, `Config`, `Fixture`, `InvalidTable` | Failures reported by a backend or the environment |
//!
//! Nothing in this crate retries. Errors raised for an *ad-hoc* attribute
//! lookup surface unchanged; the same errors raised for an attribute the
//! projector looks up through the registration table are promoted to
//! [`OdmaError::Service`], with the original error kept as the source.

use crate::names::{GlobalId, NameError, QualifiedName};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OdmaError {
    /// Write to a read-only attribute, or insufficient permission.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The accessor or value does not match the attribute's kind and cardinality.
    #[error("Invalid kind: {0}")]
    InvalidKind(String),

    #[error("Attribute not found: {0}")]
    AttributeNotFound(QualifiedName),

    #[error("Object not found: {0}")]
    ObjectNotFound(GlobalId),

    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),

    #[error("Query syntax error: {0}")]
    QuerySyntax(String),

    /// A backend contract violation.
    #[error("Service error: {message}")]
    Service {
        message: String,
        #[source]
        source: Option<Box<OdmaError>>,
    },

    #[error("Unsupported method: {0}")]
    Unsupported(String),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fixture error: {0}")]
    Fixture(String),

    /// An accessor or interface definition refers to something the table lacks.
    #[error("Invalid registration table: {0}")]
    InvalidTable(String),
}

pub type Result<T> = std::result::Result<T, OdmaError>;

impl OdmaError {
    /// A contract violation without an underlying cause.
    pub fn service(message: impl Into<String>) -> Self {
        OdmaError::Service {
            message: message.into(),
            source: None,
        }
    }

    /// Promotes this error into a contract violation, keeping it as the cause.
    pub fn into_service(self, message: impl Into<String>) -> Self {
        OdmaError::Service {
            message: message.into(),
            source: Some(Box::new(self)),
        }
    }

    /// True for errors that indicate a broken backend.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, OdmaError::Service { .. })
    }

    /// True for errors caused by what the caller asked for.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            OdmaError::AccessDenied(_)
                | OdmaError::InvalidKind(_)
                | OdmaError::AttributeNotFound(_)
                | OdmaError::Unsupported(_)
                | OdmaError::InvalidName(_)
        )
    }
}
