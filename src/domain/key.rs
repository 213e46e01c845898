//! Entry keys: plain names versus type keys

use crate::domain::catalog::TypeCatalog;

/// Classification of an entry key, decided once when the entry is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyKind {
    /// Arbitrary name, e.g. `color`.
    Plain,
    /// Type identifier, optionally qualified by a parameter name
    /// (`Engine` or `Engine$left`).
    Type {
        type_name: String,
        qualifier: Option<String>,
    },
}

impl KeyKind {
    /// Classify `key` against the catalog.
    ///
    /// `Type<sep>param` is a type key when `Type` is catalogued.
    pub fn classify(key: &str, catalog: &TypeCatalog, qualifier_separator: &str) -> Self {
        if catalog.contains(key) {
            return KeyKind::Type {
                type_name: key.to_string(),
                qualifier: None,
            };
        }
        if let Some((type_name, qualifier)) = key.split_once(qualifier_separator) {
            if !qualifier.is_empty() && catalog.contains(type_name) {
                return KeyKind::Type {
                    type_name: type_name.to_string(),
                    qualifier: Some(qualifier.to_string()),
                };
            }
        }
        KeyKind::Plain
    }

    /// The declared type a resolved value must satisfy, if any.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            KeyKind::Plain => None,
            KeyKind::Type { type_name, .. } => Some(type_name),
        }
    }
}

/// Compose the key that wires one specific parameter of a type.
pub fn qualified_key(type_name: &str, parameter: &str, qualifier_separator: &str) -> String {
    format!("{type_name}{qualifier_separator}{parameter}")
}
