//! # Configuration
//!
//! The registration table can be extended without recompiling: extra
//! accessors and interfaces are declared in `odma.toml` and merged over the
//! built-in OpenDMA table by [`RegistrationTable::from_config`].
//!
//! Loading is handled by [`clapfig`], which layers TOML files and
//! environment variables.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `ODMA__INCLUDE_BUILTIN`.
//! 2. **Config files**: `odma.toml` in each search directory, later ones winning.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `include_builtin` | `true` | Start from the OpenDMA table |
//! | `accessors` | none | Extra or replacement accessor mappings |
//! | `interfaces` | none | Extra or replacement interfaces |
//!
//! ## Example
//!
//! ```toml
//! [[accessors]]
//! accessor = "Color"
//! attribute = "com.example:Color"
//! kind = "String"
//! writable = true
//!
//! [[interfaces]]
//! name = "Colored"
//! class = "com.example:Colored"
//! accessors = ["Color"]
//! ```
//!
//! [`RegistrationTable::from_config`]: crate::projector::RegistrationTable::from_config

use crate::attributes::ValueKind;
use crate::error::{OdmaError, Result};
use crate::names::QualifiedName;
use crate::projector::{AccessorMapping, InterfaceDef};
use clapfig::{Clapfig, SearchMode, SearchPath};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// File name looked up in every search directory.
pub const CONFIG_FILE: &str = "odma.toml";

/// Configuration for the registration table, stored in `odma.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct OdmaConfig {
    /// Start from the built-in OpenDMA table.
    #[config(default = true)]
    pub include_builtin: bool,

    /// Accessors added to the table. An accessor with a built-in name
    /// replaces the built-in mapping.
    pub accessors: Option<Vec<AccessorConfig>>,

    /// Interfaces added to the table.
    pub interfaces: Option<Vec<InterfaceConfig>>,
}

impl Default for OdmaConfig {
    fn default() -> Self {
        Self {
            include_builtin: true,
            accessors: None,
            interfaces: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AccessorConfig {
    pub accessor: String,
    pub attribute: QualifiedName,
    pub kind: ValueKind,
    #[serde(default)]
    pub multi_value: bool,
    #[serde(default)]
    pub writable: bool,
    /// Interface a referenced object must implement.
    pub target: Option<String>,
}

impl AccessorConfig {
    pub(crate) fn to_mapping(&self) -> AccessorMapping {
        AccessorMapping {
            accessor: self.accessor.clone(),
            attribute: self.attribute.clone(),
            kind: self.kind,
            multi_value: self.multi_value,
            writable: self.writable,
            target: self.target.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct InterfaceConfig {
    pub name: String,
    pub class: QualifiedName,
    #[serde(default)]
    pub extends: Vec<String>,
    pub accessors: Vec<String>,
}

impl InterfaceConfig {
    pub(crate) fn to_def(&self) -> InterfaceDef {
        InterfaceDef {
            name: self.name.clone(),
            class: self.class.clone(),
            extends: self.extends.clone(),
            accessors: self.accessors.clone(),
        }
    }
}

impl OdmaConfig {
    /// Loads `odma.toml` from each directory in `dirs`, merged in order, then
    /// applies the environment.
    pub fn load(dirs: &[PathBuf]) -> Result<Self> {
        Self::load_file(CONFIG_FILE, dirs)
    }

    /// Like [`load`](Self::load) with a custom file name.
    pub fn load_file(file_name: &str, dirs: &[PathBuf]) -> Result<Self> {
        debug!(file = file_name, dirs = ?dirs, "loading configuration");
        let search_paths: Vec<SearchPath> = dirs.iter().cloned().map(SearchPath::Path).collect();
        let config: OdmaConfig = Clapfig::builder()
            .app_name("odma")
            .file_name(file_name)
            .search_paths(search_paths)
            .search_mode(SearchMode::Merge)
            .load()
            .map_err(|e| OdmaError::Config(e.to_string()))?;
        debug!(
            accessors = config.accessor_count(),
            interfaces = config.interface_count(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parses a configuration from TOML text, without touching the
    /// environment or the file system.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| OdmaError::Config(e.to_string()))
    }

    pub fn accessor_count(&self) -> usize {
        self.accessors.as_ref().map_or(0, Vec::len)
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.as_ref().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLORED: &str = r#"
        [[accessors]]
        accessor = "Color"
        attribute = "com.example:Color"
        kind = "String"
        writable = true

        [[interfaces]]
        name = "Colored"
        class = "com.example:Colored"
        accessors = ["Color"]
    "#;

    #[test]
    fn default_includes_builtin() {
        let config = OdmaConfig::default();
        assert!(config.include_builtin);
        assert_eq!(config.accessor_count(), 0);
        assert_eq!(config.interface_count(), 0);
    }

    #[test]
    fn parses_accessors_and_interfaces() {
        let config = OdmaConfig::from_toml(COLORED).unwrap();
        assert!(config.include_builtin);
        let accessors = config.accessors.unwrap();
        assert_eq!(accessors[0].accessor, "Color");
        assert_eq!(accessors[0].kind, ValueKind::String);
        assert!(accessors[0].writable);
        assert!(!accessors[0].multi_value);
        let interfaces = config.interfaces.unwrap();
        assert_eq!(interfaces[0].class.to_string(), "com.example:Colored");
        assert!(interfaces[0].extends.is_empty());
    }

    #[test]
    fn rejects_unknown_kind() {
        let text = r#"
            [[accessors]]
            accessor = "Blob"
            attribute = "x:Blob"
            kind = "Blob"
        "#;
        assert!(matches!(OdmaConfig::from_toml(text), Err(OdmaError::Config(_))));
    }

    #[test]
    fn rejects_malformed_attribute_name() {
        let text = r#"
            [[accessors]]
            accessor = "Color"
            attribute = "Color"
            kind = "String"
        "#;
        assert!(OdmaConfig::from_toml(text).is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = OdmaConfig::from_toml(COLORED).unwrap();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(OdmaConfig::from_toml(&text).unwrap(), config);
    }
}
