//! Attribute value types.
//!
//! A [`Value`] is either null, a [`Scalar`] or a [`List`]. The variant of a
//! scalar or list *is* its [`ValueKind`], so a value can never carry a kind
//! other than the one it was built with. Whether that kind (and cardinality)
//! fits a particular attribute is checked by the attribute cell.

use super::kind::ValueKind;
use crate::common::attribute;
use crate::error::{OdmaError, Result};
use crate::names::{GlobalId, LocalId};
use crate::store::AttributeStore;
use chrono::{DateTime, Utc};
use std::fmt;
use std::io::{self, Cursor, Read};
use std::rc::Rc;

/// A handle to another object, as held by Reference attributes.
///
/// Two handles are equal when they point at the same store instance.
#[derive(Clone)]
pub struct ObjectRef(Rc<dyn AttributeStore>);

impl ObjectRef {
    pub fn new(store: Rc<dyn AttributeStore>) -> Self {
        Self(store)
    }

    pub fn store(&self) -> &Rc<dyn AttributeStore> {
        &self.0
    }

    /// The referenced object's `opendma:Id`.
    ///
    /// Every object is required to expose its id, so failing to read it is a
    /// contract violation.
    pub fn id(&self) -> Result<Option<LocalId>> {
        self.0
            .attribute(&attribute::ID)
            .and_then(|attr| attr.get_id())
            .map_err(|e| e.into_service("Referenced object does not expose a valid opendma:Id"))
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectRef")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// A source of content bytes. How bytes are transported is up to the backend.
pub trait Content {
    fn open(&self) -> io::Result<Box<dyn Read + '_>>;

    fn size(&self) -> u64;
}

/// Content held in memory.
#[derive(Debug, Clone, Default)]
pub struct BytesContent {
    data: Vec<u8>,
}

impl BytesContent {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl Content for BytesContent {
    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.data.as_slice())))
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A shared handle to a [`Content`] source, as held by Content attributes.
#[derive(Clone)]
pub struct ContentRef(Rc<dyn Content>);

impl ContentRef {
    pub fn new(content: impl Content + 'static) -> Self {
        Self(Rc::new(content))
    }

    pub fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        self.0.open()
    }

    pub fn size(&self) -> u64 {
        self.0.size()
    }

    /// Reads the whole stream.
    pub fn read_to_vec(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.size() as usize);
        self.open()?.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl PartialEq for ContentRef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl fmt::Debug for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRef")
            .field("size", &self.size())
            .finish()
    }
}

/// A single value of one kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i32),
    Short(i16),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Binary(Vec<u8>),
    Reference(ObjectRef),
    Content(ContentRef),
    Id(LocalId),
    Guid(GlobalId),
}

/// An ordered list of values of one kind.
#[derive(Debug, Clone, PartialEq)]
pub enum List {
    String(Vec<String>),
    Integer(Vec<i32>),
    Short(Vec<i16>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Boolean(Vec<bool>),
    DateTime(Vec<DateTime<Utc>>),
    Binary(Vec<Vec<u8>>),
    Reference(Vec<ObjectRef>),
    Content(Vec<ContentRef>),
    Id(Vec<LocalId>),
    Guid(Vec<GlobalId>),
}

/// The value slot of an attribute.
///
/// `Null` is only valid for single-value attributes; an absent multi-value
/// is an empty [`List`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Scalar(Scalar),
    List(List),
}

impl Scalar {
    pub fn kind(&self) -> ValueKind {
        match self {
            Scalar::String(_) => ValueKind::String,
            Scalar::Integer(_) => ValueKind::Integer,
            Scalar::Short(_) => ValueKind::Short,
            Scalar::Long(_) => ValueKind::Long,
            Scalar::Float(_) => ValueKind::Float,
            Scalar::Double(_) => ValueKind::Double,
            Scalar::Boolean(_) => ValueKind::Boolean,
            Scalar::DateTime(_) => ValueKind::DateTime,
            Scalar::Binary(_) => ValueKind::Binary,
            Scalar::Reference(_) => ValueKind::Reference,
            Scalar::Content(_) => ValueKind::Content,
            Scalar::Id(_) => ValueKind::Id,
            Scalar::Guid(_) => ValueKind::Guid,
        }
    }
}

impl List {
    /// An empty list of the given kind.
    pub fn empty(kind: ValueKind) -> Self {
        match kind {
            ValueKind::String => List::String(Vec::new()),
            ValueKind::Integer => List::Integer(Vec::new()),
            ValueKind::Short => List::Short(Vec::new()),
            ValueKind::Long => List::Long(Vec::new()),
            ValueKind::Float => List::Float(Vec::new()),
            ValueKind::Double => List::Double(Vec::new()),
            ValueKind::Boolean => List::Boolean(Vec::new()),
            ValueKind::DateTime => List::DateTime(Vec::new()),
            ValueKind::Binary => List::Binary(Vec::new()),
            ValueKind::Reference => List::Reference(Vec::new()),
            ValueKind::Content => List::Content(Vec::new()),
            ValueKind::Id => List::Id(Vec::new()),
            ValueKind::Guid => List::Guid(Vec::new()),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            List::String(_) => ValueKind::String,
            List::Integer(_) => ValueKind::Integer,
            List::Short(_) => ValueKind::Short,
            List::Long(_) => ValueKind::Long,
            List::Float(_) => ValueKind::Float,
            List::Double(_) => ValueKind::Double,
            List::Boolean(_) => ValueKind::Boolean,
            List::DateTime(_) => ValueKind::DateTime,
            List::Binary(_) => ValueKind::Binary,
            List::Reference(_) => ValueKind::Reference,
            List::Content(_) => ValueKind::Content,
            List::Id(_) => ValueKind::Id,
            List::Guid(_) => ValueKind::Guid,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            List::String(v) => v.len(),
            List::Integer(v) => v.len(),
            List::Short(v) => v.len(),
            List::Long(v) => v.len(),
            List::Float(v) => v.len(),
            List::Double(v) => v.len(),
            List::Boolean(v) => v.len(),
            List::DateTime(v) => v.len(),
            List::Binary(v) => v.len(),
            List::Reference(v) => v.len(),
            List::Content(v) => v.len(),
            List::Id(v) => v.len(),
            List::Guid(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Value {
    pub fn empty_list(kind: ValueKind) -> Self {
        Value::List(List::empty(kind))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The kind carried by the value; `None` for null.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Value::Null => None,
            Value::Scalar(s) => Some(s.kind()),
            Value::List(l) => Some(l.kind()),
        }
    }

    /// Short shape description for error messages, e.g. "multi-valued String".
    pub fn describe(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Scalar(s) => format!("single-valued {}", s.kind()),
            Value::List(l) => format!("multi-valued {}", l.kind()),
        }
    }

    /// Takes a single value of type `T` out; null becomes `None`.
    pub fn into_single<T: ValueType>(self) -> Result<Option<T>> {
        match self {
            Value::Null => Ok(None),
            Value::Scalar(s) => match T::from_scalar(s) {
                Ok(v) => Ok(Some(v)),
                Err(s) => Err(OdmaError::InvalidKind(format!(
                    "expected single-valued {}, found single-valued {}",
                    T::KIND,
                    s.kind()
                ))),
            },
            Value::List(l) => Err(OdmaError::InvalidKind(format!(
                "expected single-valued {}, found multi-valued {}",
                T::KIND,
                l.kind()
            ))),
        }
    }

    /// Takes a list of type `T` out.
    pub fn into_list<T: ValueType>(self) -> Result<Vec<T>> {
        match self {
            Value::List(l) => T::from_list(l).map_err(|l| {
                OdmaError::InvalidKind(format!(
                    "expected multi-valued {}, found multi-valued {}",
                    T::KIND,
                    l.kind()
                ))
            }),
            other => Err(OdmaError::InvalidKind(format!(
                "expected multi-valued {}, found {}",
                T::KIND,
                other.describe()
            ))),
        }
    }
}

/// Rust types that hold exactly one value kind.
pub trait ValueType: Sized {
    const KIND: ValueKind;

    /// Returns the scalar back when it is of another kind.
    fn from_scalar(scalar: Scalar) -> std::result::Result<Self, Scalar>;

    /// Returns the list back when it is of another kind.
    fn from_list(list: List) -> std::result::Result<Vec<Self>, List>;

    fn into_scalar(self) -> Scalar;

    fn into_list(values: Vec<Self>) -> List;
}

macro_rules! impl_value_type {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ValueType for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                fn from_scalar(scalar: Scalar) -> std::result::Result<Self, Scalar> {
                    match scalar {
                        Scalar::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }

                fn from_list(list: List) -> std::result::Result<Vec<Self>, List> {
                    match list {
                        List::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }

                fn into_scalar(self) -> Scalar {
                    Scalar::$variant(self)
                }

                fn into_list(values: Vec<Self>) -> List {
                    List::$variant(values)
                }
            }

            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    Scalar::$variant(v)
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Scalar(Scalar::$variant(v))
                }
            }

            impl From<Option<$ty>> for Value {
                fn from(v: Option<$ty>) -> Self {
                    v.map_or(Value::Null, |v| Value::Scalar(Scalar::$variant(v)))
                }
            }

            impl From<Vec<$ty>> for List {
                fn from(v: Vec<$ty>) -> Self {
                    List::$variant(v)
                }
            }

            impl From<Vec<$ty>> for Value {
                fn from(v: Vec<$ty>) -> Self {
                    Value::List(List::$variant(v))
                }
            }
        )*
    };
}

impl_value_type!(
    String => String,
    i32 => Integer,
    i16 => Short,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    bool => Boolean,
    DateTime<Utc> => DateTime,
    Vec<u8> => Binary,
    ObjectRef => Reference,
    ContentRef => Content,
    LocalId => Id,
    GlobalId => Guid,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Scalar(Scalar::String(v.to_string()))
    }
}

impl From<Scalar> for Value {
    fn from(v: Scalar) -> Self {
        Value::Scalar(v)
    }
}

impl From<List> for Value {
    fn from(v: List) -> Self {
        Value::List(v)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(v) => f.write_str(v),
            Scalar::Integer(v) => write!(f, "{}", v),
            Scalar::Short(v) => write!(f, "{}", v),
            Scalar::Long(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Double(v) => write!(f, "{}", v),
            Scalar::Boolean(v) => write!(f, "{}", v),
            Scalar::DateTime(v) => f.write_str(&v.to_rfc3339()),
            Scalar::Binary(v) => write!(f, "<{} bytes>", v.len()),
            Scalar::Reference(r) => match r.id() {
                Ok(Some(id)) => write!(f, "-> {}", id),
                _ => f.write_str("-> <object>"),
            },
            Scalar::Content(c) => write!(f, "<content, {} bytes>", c.size()),
            Scalar::Id(v) => write!(f, "{}", v),
            Scalar::Guid(v) => write!(f, "{}", v),
        }
    }
}

fn join<T>(f: &mut fmt::Formatter<'_>, items: impl IntoIterator<Item = T>) -> fmt::Result
where
    T: Into<Scalar>,
{
    f.write_str("[")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item.into())?;
    }
    f.write_str("]")
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.clone() {
            List::String(v) => join(f, v),
            List::Integer(v) => join(f, v),
            List::Short(v) => join(f, v),
            List::Long(v) => join(f, v),
            List::Float(v) => join(f, v),
            List::Double(v) => join(f, v),
            List::Boolean(v) => join(f, v),
            List::DateTime(v) => join(f, v),
            List::Binary(v) => join(f, v),
            List::Reference(v) => join(f, v),
            List::Content(v) => join(f, v),
            List::Id(v) => join(f, v),
            List::Guid(v) => join(f, v),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Scalar(s) => write!(f, "{}", s),
            Value::List(l) => write!(f, "{}", l),
        }
    }
}
