//! Stored values.
//!
//! A [`Value`] is a tagged union over scalars, sequences, nested
//! [`Construct`]s and opaque [`Mapping`]s. Assignment funnels every raw
//! mapping through [`Value::coerce`], the single place where a mapping
//! becomes either a nested construct or an opaque value.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::construct::{promote, Construct};
use crate::key::Symbol;

/// A value held by a construct.
///
/// Equality is structural, with one bridge: a [`Value::Construct`] equals a
/// [`Value::Mapping`] holding the same entries under string keys. Mappings
/// inside sequences are never coerced, so that is the form a nested
/// construct takes after a trip through a serialized document.
#[derive(Clone, Debug)]
pub enum Value {
    /// The absent/nil scalar.
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Symbol(Symbol),
    /// An ordered sequence. Mappings inside a sequence are never coerced.
    Sequence(Vec<Value>),
    /// A mapping kept verbatim because at least one key is not a valid
    /// construct key, or one that has not been through assignment yet.
    Mapping(Mapping),
    /// A nested construct.
    Construct(Construct),
}

impl Value {
    /// Apply the mapping coercion rule.
    ///
    /// A [`Value::Mapping`] whose keys are all non-empty strings or symbols
    /// becomes a [`Value::Construct`], with its own mapping values coerced
    /// in turn. Any other value is returned unchanged.
    pub fn coerce(self) -> Value {
        match self {
            Value::Mapping(mapping) => match promote(Construct::new(), mapping) {
                Ok(construct) => Value::Construct(construct),
                Err(mapping) => Value::Mapping(mapping),
            },
            other => other,
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats, and integers widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_construct(&self) -> Option<&Construct> {
        match self {
            Value::Construct(construct) => Some(construct),
            _ => None,
        }
    }

    pub fn as_construct_mut(&mut self) -> Option<&mut Construct> {
        match self {
            Value::Construct(construct) => Some(construct),
            _ => None,
        }
    }

    /// A short name for the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Construct(_) => "construct",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Mapping(a), Value::Mapping(b)) => a == b,
            (Value::Construct(a), Value::Construct(b)) => a == b,
            (Value::Construct(c), Value::Mapping(m)) | (Value::Mapping(m), Value::Construct(c)) => {
                c.matches_mapping(m)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::Symbol(sym) => write!(f, "{sym}"),
            other => write!(f, "{other:?}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Symbol(sym) => serializer.collect_str(sym),
            Value::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Mapping(mapping) => mapping.serialize(serializer),
            Value::Construct(construct) => construct.serialize(serializer),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::Symbol(sym)
    }
}

impl From<Mapping> for Value {
    fn from(mapping: Mapping) -> Self {
        Value::Mapping(mapping)
    }
}

impl From<Construct> for Value {
    fn from(construct: Construct) -> Self {
        Value::Construct(construct)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Value::Float(f) if f == other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

/// An insertion-ordered mapping with arbitrary keys.
///
/// This is the raw form of a mapping before coercion, and the stored form
/// of a mapping that failed coercion. Keys are compared with `Value`
/// equality; inserting an equal key replaces the value in place. Equality
/// between mappings ignores entry order.
///
/// Keys may be floats or nested values, which have neither `Hash` nor a
/// total order, so entries live in a `Vec` and lookups scan linearly.
#[derive(Clone, Debug, Default)]
pub struct Mapping {
    entries: Vec<(Value, Value)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the previous value for an equal key.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

impl IntoIterator for Mapping {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

impl<K: Into<Value>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Mapping {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_promotes_textual_mappings() {
        let raw = Value::from(Mapping::from([("mary", true), ("joe", false)]));
        let coerced = raw.coerce();
        let construct = coerced.as_construct().expect("should be a construct");
        assert_eq!(*construct.get("mary").unwrap(), true);
        assert_eq!(*construct.get("joe").unwrap(), false);
    }

    #[test]
    fn coerce_accepts_symbol_keys() {
        let raw = Value::from(Mapping::from([(Symbol::new("baz"), 2)]));
        let coerced = raw.coerce();
        assert_eq!(*coerced.as_construct().unwrap().get("baz").unwrap(), 2);
    }

    #[test]
    fn coerce_keeps_mixed_key_mappings_opaque() {
        let mut mapping = Mapping::new();
        mapping.insert("name", "x");
        mapping.insert(2, 1);
        let coerced = Value::from(mapping.clone()).coerce();
        assert_eq!(coerced, Value::Mapping(mapping));
    }

    #[test]
    fn coerce_is_recursive_through_mapping_values() {
        let inner = Mapping::from([("port", 5432)]);
        let outer = Mapping::from([("db", Value::from(inner))]);
        let coerced = Value::from(outer).coerce();
        let db = coerced.as_construct().unwrap().get("db").unwrap();
        assert!(db.as_construct().is_some());
    }

    #[test]
    fn coerce_does_not_descend_into_sequences() {
        let items = Value::Sequence(vec![Value::from(Mapping::from([("a", 1)]))]);
        let coerced = items.clone().coerce();
        assert!(coerced.as_sequence().unwrap()[0].as_mapping().is_some());
    }

    #[test]
    fn coerce_leaves_scalars_alone() {
        assert_eq!(Value::from(3).coerce(), Value::Integer(3));
        assert_eq!(Value::from("x").coerce(), Value::from("x"));
    }

    #[test]
    fn empty_mapping_becomes_empty_construct() {
        let coerced = Value::from(Mapping::new()).coerce();
        assert!(coerced.as_construct().unwrap().is_empty());
    }

    #[test]
    fn mapping_insert_replaces_equal_keys_in_place() {
        let mut mapping = Mapping::new();
        mapping.insert("a", 1);
        mapping.insert("b", 2);
        assert_eq!(mapping.insert("a", 3), Some(Value::Integer(1)));
        let keys: Vec<_> = mapping.keys().cloned().collect();
        assert_eq!(keys, vec![Value::from("a"), Value::from("b")]);
        assert_eq!(mapping.get(&Value::from("a")), Some(&Value::Integer(3)));
    }

    #[test]
    fn mapping_equality_ignores_order() {
        let a = Mapping::from([("x", 1), ("y", 2)]);
        let b = Mapping::from([("y", 2), ("x", 1)]);
        assert_eq!(a, b);
        assert_ne!(a, Mapping::from([("x", 1)]));
    }

    #[test]
    fn construct_equals_mapping_with_same_text_keys() {
        let construct = Construct::from_entries([("a", 1), ("b", 2)]).unwrap();
        let same = Value::from(Mapping::from([("b", 2), ("a", 1)]));
        assert_eq!(Value::from(construct.clone()), same);
        assert_eq!(same, Value::from(construct.clone()));

        let symbol_keyed = Value::from(Mapping::from([(Symbol::new("a"), 1), (Symbol::new("b"), 2)]));
        assert_ne!(Value::from(construct.clone()), symbol_keyed);
        assert_ne!(
            Value::from(construct.clone()),
            Value::from(Mapping::from([("a", 1)]))
        );
        assert_ne!(
            Value::from(construct),
            Value::from(Mapping::from([("a", 1), ("b", 3)]))
        );
    }

    #[test]
    fn nested_constructs_compare_with_nested_mappings() {
        let inner = Construct::from_entries([("port", 5432)]).unwrap();
        let outer = Value::Sequence(vec![Value::from(
            Construct::from_entries([("db", inner)]).unwrap(),
        )]);
        let plain = Value::Sequence(vec![Value::from(Mapping::from([(
            "db",
            Value::from(Mapping::from([("port", 5432)])),
        )]))]);
        assert_eq!(outer, plain);
    }

    #[test]
    fn string_and_symbol_values_differ() {
        assert_ne!(Value::from("foo"), Value::from(Symbol::new("foo")));
    }

    #[test]
    fn scalar_comparisons() {
        assert_eq!(Value::from("hi"), "hi");
        assert_eq!(Value::from(7), 7);
        assert_eq!(Value::from(true), true);
        assert_eq!(Value::from(0.5), 0.5);
        assert_eq!(Value::from(2).as_f64(), Some(2.0));
    }

    #[test]
    fn serializes_through_serde() {
        let value = Value::from(vec![Value::from(1), Value::Null, Value::from(Symbol::new("s"))]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"[1,null,":s"]"#);
    }
}
