//! Indifferent keys.
//!
//! A key may be supplied either as a string or as a [`Symbol`]; both forms
//! with the same text address the same entry. [`Key`] is the normalized
//! form that a construct actually stores.

use std::borrow::Borrow;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{ConstructError, Result};
use crate::value::Value;

/// A symbolic token, the non-textual spelling of a key.
///
/// As a key, a symbol is interchangeable with the string of the same name.
/// As a value, it stays distinct from that string. Its textual form is
/// `:name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol with the given name (without the leading `:`).
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The symbol's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the `:name` notation. Returns `None` unless `text` is a colon
    /// followed by an identifier (letters, digits, `_`, optionally ending in
    /// `?` or `!`, not starting with a digit).
    pub fn parse_notation(text: &str) -> Option<Self> {
        let name = text.strip_prefix(':')?;
        let body = name.strip_suffix(['?', '!']).unwrap_or(name);
        let mut chars = body.chars();
        let first = chars.next()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            Some(Self::new(name))
        } else {
            None
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A normalized construct key: a non-empty string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    /// Create a key from text. Fails if `text` is empty.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(ConstructError::InvalidKey {
                key: "\"\"".to_string(),
            });
        }
        Ok(Self(text))
    }

    /// Normalize a value used as a key.
    ///
    /// Strings and symbols normalize to their text. Every other value, and
    /// empty text, is rejected with [`ConstructError::InvalidKey`].
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Ok(Self(s.clone())),
            Value::Symbol(sym) if !sym.as_str().is_empty() => Ok(Self(sym.as_str().to_string())),
            other => Err(ConstructError::InvalidKey {
                key: format!("{other:?}"),
            }),
        }
    }

    /// Returns `true` if `value` would normalize to a key.
    pub fn accepts(value: &Value) -> bool {
        match value {
            Value::String(s) => !s.is_empty(),
            Value::Symbol(sym) => !sym.as_str().is_empty(),
            _ => false,
        }
    }

    /// The key's text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_and_symbol_normalize_to_same_key() {
        let a = Key::from_value(&Value::from("foo")).unwrap();
        let b = Key::from_value(&Value::from(Symbol::new("foo"))).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "foo");
    }

    #[test]
    fn reject_non_textual_keys() {
        assert!(Key::from_value(&Value::from(2)).is_err());
        assert!(Key::from_value(&Value::from(true)).is_err());
        assert!(Key::from_value(&Value::Null).is_err());
        assert!(Key::from_value(&Value::Sequence(vec![])).is_err());
    }

    #[test]
    fn reject_empty_text() {
        assert!(Key::new("").is_err());
        assert!(Key::from_value(&Value::from("")).is_err());
        assert!(Key::from_value(&Value::from(Symbol::new(""))).is_err());
        assert!(!Key::accepts(&Value::from("")));
    }

    #[test]
    fn invalid_key_error_names_the_value() {
        let err = Key::from_value(&Value::from(2)).unwrap_err();
        assert_eq!(
            err,
            ConstructError::InvalidKey {
                key: "Integer(2)".into()
            }
        );
    }

    #[test]
    fn symbol_notation() {
        assert_eq!(Symbol::parse_notation(":foo"), Some(Symbol::new("foo")));
        assert_eq!(Symbol::parse_notation(":new_key2"), Some(Symbol::new("new_key2")));
        assert_eq!(Symbol::parse_notation(":empty?"), Some(Symbol::new("empty?")));
        assert_eq!(Symbol::parse_notation("foo"), None);
        assert_eq!(Symbol::parse_notation(":"), None);
        assert_eq!(Symbol::parse_notation(":8080"), None);
        assert_eq!(Symbol::parse_notation(":a b"), None);
    }

    #[test]
    fn symbol_display_uses_colon() {
        assert_eq!(Symbol::new("host").to_string(), ":host");
    }
}
