//! # Attribute System
//!
//! Every piece of object data is an *attribute*: a named, typed cell. This
//! module provides:
//!
//! - **Kinds**: the 13 primitive value kinds ([`ValueKind`])
//! - **Values**: a tagged union whose variant is the kind ([`Value`], [`Scalar`], [`List`])
//! - **Cells**: the typed attribute cell with lazy resolution ([`Attribute`])
//!
//! ## Kinds and cardinality
//!
//! | Kind | Rust type | Code |
//! |------|-----------|------|
//! | `String` | `String` | 1 |
//! | `Integer` | `i32` | 2 |
//! | `Short` | `i16` | 3 |
//! | `Long` | `i64` | 4 |
//! | `Float` | `f32` | 5 |
//! | `Double` | `f64` | 6 |
//! | `Boolean` | `bool` | 7 |
//! | `DateTime` | `DateTime<Utc>` | 8 |
//! | `Binary` | `Vec<u8>` | 9 |
//! | `Reference` | [`ObjectRef`] | 10 |
//! | `Content` | [`ContentRef`] | 11 |
//! | `Id` | [`LocalId`](crate::names::LocalId) | 100 |
//! | `Guid` | [`GlobalId`](crate::names::GlobalId) | 101 |
//!
//! Each attribute is single- or multi-valued. There are no implicit
//! conversions: an Integer attribute never accepts a Long, and a single
//! value is never read as a list.
//!
//! ## Usage
//!
//! ```ignore
//! let title = Attribute::new(common::attribute::TITLE, ValueKind::String, false, "Report")?;
//! assert_eq!(title.get_string()?.as_deref(), Some("Report"));
//!
//! title.set_value("Final")?;            // marks the cell dirty
//! assert!(title.get_integer().is_err()); // InvalidKind
//! ```

mod cell;
mod kind;
mod value;

pub use cell::{Attribute, LazyValueProvider, ResolutionState};
pub use kind::ValueKind;
pub use value::{BytesContent, Content, ContentRef, List, ObjectRef, Scalar, Value, ValueType};
