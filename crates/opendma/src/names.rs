//! Identity and naming values.
//!
//! - [`QualifiedName`]: `namespace:name`, the key of every attribute, class and aspect.
//! - [`LocalId`]: an object id, unique within one repository.
//! - [`GlobalId`]: an object id paired with its repository id, unique everywhere.
//!
//! All three are immutable and compare by value. Construction validates the
//! format and fails with a [`NameError`].

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between namespace and local name.
pub const SEPARATOR: char = ':';

/// Namespace of all predefined OpenDMA classes and attributes.
pub const OPENDMA_NAMESPACE: &str = "opendma";

/// Format errors of the naming values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("namespace must not be empty")]
    EmptyNamespace,
    #[error("name must not be empty")]
    EmptyName,
    #[error("name `{0}` must not contain ':'")]
    SeparatorInName(String),
    #[error("namespace `{0}` has an empty segment")]
    EmptySegment(String),
    #[error("qualified name `{0}` must contain ':'")]
    MissingSeparator(String),
    #[error("id must not be empty")]
    EmptyId,
    #[error("unknown value kind `{0}`")]
    UnknownKind(String),
}

/// A namespace-qualified name such as `opendma:Title`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName {
    namespace: Cow<'static, str>,
    name: Cow<'static, str>,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Result<Self, NameError> {
        let namespace = namespace.into();
        let name = name.into();
        if namespace.trim().is_empty() {
            return Err(NameError::EmptyNamespace);
        }
        if name.trim().is_empty() {
            return Err(NameError::EmptyName);
        }
        if name.contains(SEPARATOR) {
            return Err(NameError::SeparatorInName(name));
        }
        if namespace.starts_with(SEPARATOR)
            || namespace.ends_with(SEPARATOR)
            || namespace.contains("::")
        {
            return Err(NameError::EmptySegment(namespace));
        }
        Ok(Self {
            namespace: Cow::Owned(namespace),
            name: Cow::Owned(name),
        })
    }

    /// A name from static parts that are known to be valid. Only used for
    /// compile-time constants.
    pub(crate) const fn from_static(namespace: &'static str, name: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(namespace),
            name: Cow::Borrowed(name),
        }
    }

    /// A name in the `opendma` namespace, for the constants in [`crate::common`].
    pub(crate) const fn opendma(name: &'static str) -> Self {
        Self::from_static(OPENDMA_NAMESPACE, name)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.namespace, SEPARATOR, self.name)
    }
}

impl FromStr for QualifiedName {
    type Err = NameError;

    /// Splits on the last `:`, so namespaces may themselves contain separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(NameError::EmptyName);
        }
        let (namespace, name) = s
            .rsplit_once(SEPARATOR)
            .ok_or_else(|| NameError::MissingSeparator(s.to_string()))?;
        Self::new(namespace, name)
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QualifiedName> for String {
    fn from(value: QualifiedName) -> Self {
        value.to_string()
    }
}

/// Object id, unique within one repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocalId(String);

impl LocalId {
    pub fn new(id: impl Into<String>) -> Result<Self, NameError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(NameError::EmptyId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocalId {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LocalId {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LocalId> for String {
    fn from(value: LocalId) -> Self {
        value.0
    }
}

/// Object id qualified by its repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GlobalId {
    object_id: LocalId,
    repository_id: LocalId,
}

impl GlobalId {
    pub fn new(object_id: LocalId, repository_id: LocalId) -> Self {
        Self {
            object_id,
            repository_id,
        }
    }

    pub fn object_id(&self) -> &LocalId {
        &self.object_id
    }

    pub fn repository_id(&self) -> &LocalId {
        &self.repository_id
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` in `{}`", self.object_id, self.repository_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qn(ns: &str, name: &str) -> QualifiedName {
        QualifiedName::new(ns, name).unwrap()
    }

    #[test]
    fn qualified_name_display_and_parse_are_inverse() {
        for (ns, name) in [
            ("opendma", "Title"),
            ("com:example", "Color"),
            ("a:b:c", "x"),
            ("urn", "with space"),
        ] {
            let q = qn(ns, name);
            let parsed: QualifiedName = q.to_string().parse().unwrap();
            assert_eq!(parsed, q);
        }
    }

    #[test]
    fn parse_splits_on_last_separator() {
        let q: QualifiedName = "com:example:Color".parse().unwrap();
        assert_eq!(q.namespace(), "com:example");
        assert_eq!(q.name(), "Color");
    }

    #[test]
    fn rejects_empty_parts() {
        assert_eq!(QualifiedName::new("", "x"), Err(NameError::EmptyNamespace));
        assert_eq!(QualifiedName::new("  ", "x"), Err(NameError::EmptyNamespace));
        assert_eq!(QualifiedName::new("ns", ""), Err(NameError::EmptyName));
        assert_eq!("".parse::<QualifiedName>(), Err(NameError::EmptyName));
    }

    #[test]
    fn rejects_separator_in_name() {
        assert!(matches!(
            QualifiedName::new("ns", "a:b"),
            Err(NameError::SeparatorInName(_))
        ));
    }

    #[test]
    fn rejects_empty_namespace_segments() {
        for ns in [":ns", "ns:", "a::b"] {
            assert!(matches!(
                QualifiedName::new(ns, "x"),
                Err(NameError::EmptySegment(_))
            ));
        }
    }

    #[test]
    fn parse_requires_separator() {
        assert!(matches!(
            "Title".parse::<QualifiedName>(),
            Err(NameError::MissingSeparator(_))
        ));
        assert!(matches!(
            "opendma:".parse::<QualifiedName>(),
            Err(NameError::EmptyName)
        ));
    }

    #[test]
    fn constant_names_equal_parsed_names() {
        let constant = QualifiedName::opendma("Title");
        let parsed: QualifiedName = "opendma:Title".parse().unwrap();
        assert_eq!(constant, parsed);

        use std::collections::HashSet;
        let set: HashSet<_> = [constant].into_iter().collect();
        assert!(set.contains(&parsed));
    }

    #[test]
    fn qualified_name_serializes_as_string() {
        let q = qn("opendma", "Title");
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, "\"opendma:Title\"");
        let back: QualifiedName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
        assert!(serde_json::from_str::<QualifiedName>("\"nocolon\"").is_err());
    }

    #[test]
    fn local_id_rejects_blank() {
        assert_eq!(LocalId::new(""), Err(NameError::EmptyId));
        assert_eq!(LocalId::new(" \t"), Err(NameError::EmptyId));
        assert_eq!(LocalId::new("doc-1").unwrap().as_str(), "doc-1");
    }

    #[test]
    fn global_id_equality_is_structural() {
        let a = GlobalId::new(LocalId::new("o").unwrap(), LocalId::new("r").unwrap());
        let b = GlobalId::new(LocalId::new("o").unwrap(), LocalId::new("r").unwrap());
        let c = GlobalId::new(LocalId::new("o").unwrap(), LocalId::new("other").unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "`o` in `r`");
    }
}
