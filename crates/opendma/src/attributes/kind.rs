//! The closed set of value kinds.
//!
//! Cardinality (single or multi value) is orthogonal to the kind and lives
//! on the attribute, not here.

use crate::names::NameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The primitive type of an attribute's value.
///
/// The numeric codes are the ones stored in `opendma:DataType` of a property
/// descriptor. They jump from 11 to 100; the codes are opaque and the gap is
/// not to be filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueKind {
    String,
    Integer,
    Short,
    Long,
    Float,
    Double,
    Boolean,
    DateTime,
    Binary,
    Reference,
    Content,
    Id,
    Guid,
}

impl ValueKind {
    pub const ALL: [ValueKind; 13] = [
        ValueKind::String,
        ValueKind::Integer,
        ValueKind::Short,
        ValueKind::Long,
        ValueKind::Float,
        ValueKind::Double,
        ValueKind::Boolean,
        ValueKind::DateTime,
        ValueKind::Binary,
        ValueKind::Reference,
        ValueKind::Content,
        ValueKind::Id,
        ValueKind::Guid,
    ];

    pub const fn code(self) -> i32 {
        match self {
            ValueKind::String => 1,
            ValueKind::Integer => 2,
            ValueKind::Short => 3,
            ValueKind::Long => 4,
            ValueKind::Float => 5,
            ValueKind::Double => 6,
            ValueKind::Boolean => 7,
            ValueKind::DateTime => 8,
            ValueKind::Binary => 9,
            ValueKind::Reference => 10,
            ValueKind::Content => 11,
            ValueKind::Id => 100,
            ValueKind::Guid => 101,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::String => "String",
            ValueKind::Integer => "Integer",
            ValueKind::Short => "Short",
            ValueKind::Long => "Long",
            ValueKind::Float => "Float",
            ValueKind::Double => "Double",
            ValueKind::Boolean => "Boolean",
            ValueKind::DateTime => "DateTime",
            ValueKind::Binary => "Binary",
            ValueKind::Reference => "Reference",
            ValueKind::Content => "Content",
            ValueKind::Id => "Id",
            ValueKind::Guid => "Guid",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueKind {
    type Err = NameError;

    /// Case-insensitive match on the kind name. No aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| NameError::UnknownKind(s.to_string()))
    }
}

impl TryFrom<String> for ValueKind {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ValueKind> for String {
    fn from(value: ValueKind) -> Self {
        value.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_keep_the_gap_after_content() {
        assert_eq!(ValueKind::Content.code(), 11);
        assert_eq!(ValueKind::Id.code(), 100);
        assert_eq!(ValueKind::Guid.code(), 101);
        for code in 12..100 {
            assert_eq!(ValueKind::from_code(code), None);
        }
    }

    #[test]
    fn every_code_maps_back() {
        for kind in ValueKind::ALL {
            assert_eq!(ValueKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ValueKind::from_code(0), None);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("datetime".parse::<ValueKind>(), Ok(ValueKind::DateTime));
        assert_eq!("GUID".parse::<ValueKind>(), Ok(ValueKind::Guid));
        assert_eq!("Reference".parse::<ValueKind>(), Ok(ValueKind::Reference));
    }

    #[test]
    fn parse_rejects_unknown_names_without_aliases() {
        assert!("Blob".parse::<ValueKind>().is_err());
        assert!("int".parse::<ValueKind>().is_err());
        assert!("".parse::<ValueKind>().is_err());
    }

    #[test]
    fn serializes_by_name() {
        let json = serde_json::to_string(&ValueKind::DateTime).unwrap();
        assert_eq!(json, "\"DateTime\"");
        let kind: ValueKind = serde_json::from_str("\"boolean\"").unwrap();
        assert_eq!(kind, ValueKind::Boolean);
    }
}
