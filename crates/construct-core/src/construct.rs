//! The [`Construct`] container.
//!
//! A construct maps normalized keys to values in insertion order and falls
//! back to its [`Schema`] for keys that have no explicit entry. Explicit
//! entries are what get serialized and compared; schema defaults are only a
//! read-time fallback, except for template constructs, which are cloned into
//! every new instance.

use std::borrow::Cow;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::error::{ConstructError, Result};
use crate::key::Key;
use crate::schema::{Field, Schema};
use crate::value::{Mapping, Value};

/// An indifferent-key configuration container.
///
/// # Examples
///
/// ```
/// use construct_core::{Construct, Mapping, Symbol};
///
/// let mut c = Construct::new();
/// c.set("foo", "hi").unwrap();
/// c.set("bar", Mapping::from([("baz", 2)])).unwrap();
///
/// assert_eq!(*c.get(Symbol::new("foo")).unwrap(), "hi");
/// assert!(c.get("bar").unwrap().as_construct().is_some());
/// assert!(c.get("missing").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Construct {
    data: IndexMap<Key, Value>,
    schema: Arc<Schema>,
}

impl Construct {
    /// Create an empty construct with no schema.
    pub fn new() -> Self {
        Self {
            data: IndexMap::new(),
            schema: Schema::empty(),
        }
    }

    /// Create a construct of the given shape.
    ///
    /// Every template default in `schema` is cloned into the new instance's
    /// explicit data. Scalar and sequence defaults stay in the schema and are
    /// resolved on read.
    pub fn with_schema(schema: Arc<Schema>) -> Self {
        let mut data = IndexMap::new();
        for (key, field) in schema.fields() {
            if let Some(template) = field.template() {
                trace!(key = %key, "materializing template default");
                data.insert(key.clone(), Value::Construct(template.clone()));
            }
        }
        Self { data, schema }
    }

    /// Create a construct of the given shape and assign `entries` on top of
    /// its defaults, in order.
    pub fn with_values<I, K, V>(schema: Arc<Schema>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut construct = Self::with_schema(schema);
        construct.merge(entries)?;
        Ok(construct)
    }

    /// Create a schemaless construct from key/value pairs.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::with_values(Schema::empty(), entries)
    }

    /// Resolve the effective value for `key`: the explicit entry if there
    /// is one, otherwise the schema default.
    ///
    /// Fails with [`ConstructError::UndeclaredKey`] when neither exists.
    pub fn get(&self, key: impl Into<Value>) -> Result<Cow<'_, Value>> {
        let key = Key::from_value(&key.into())?;
        if let Some(value) = self.data.get(&key) {
            return Ok(Cow::Borrowed(value));
        }
        match self.schema.field(key.as_str()) {
            Some(field) => Ok(field.default_value()),
            None => Err(ConstructError::UndeclaredKey {
                key: key.to_string(),
            }),
        }
    }

    /// Mutable access to the explicit entry for `key`.
    ///
    /// If `key` only has a schema default, the default is first copied into
    /// the explicit data, so it becomes part of this instance's state.
    pub fn get_mut(&mut self, key: impl Into<Value>) -> Result<&mut Value> {
        let key = Key::from_value(&key.into())?;
        self.entry_mut(key)
    }

    /// Mutable access to a nested construct.
    pub fn child_mut(&mut self, key: impl Into<Value>) -> Result<&mut Construct> {
        let key = Key::from_value(&key.into())?;
        let name = key.to_string();
        match self.entry_mut(key)? {
            Value::Construct(child) => Ok(child),
            _ => Err(ConstructError::NotAConstruct { key: name }),
        }
    }

    /// Assign `value` to `key`, overwriting any previous entry.
    ///
    /// Mappings are coerced: if `key` is declared with a template default,
    /// the template is cloned and the mapping applied onto it; otherwise a
    /// mapping with all-valid keys becomes a fresh construct. Mappings with
    /// any other key are stored verbatim.
    pub fn set(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Result<()> {
        let key = Key::from_value(&key.into())?;
        self.store(key, value.into());
        Ok(())
    }

    /// Remove the explicit entry for `key`, returning it. Absent keys and
    /// invalid keys are a no-op.
    ///
    /// Schema defaults are unaffected, so a declared key still resolves to
    /// its default afterwards.
    pub fn delete(&mut self, key: impl Into<Value>) -> Option<Value> {
        let key = Key::from_value(&key.into()).ok()?;
        self.data.shift_remove(&key)
    }

    /// Returns `true` if `key` has an explicit entry. Schema defaults do not
    /// count.
    pub fn includes(&self, key: impl Into<Value>) -> bool {
        Key::from_value(&key.into()).is_ok_and(|key| self.data.contains_key(&key))
    }

    /// Assign every entry in order, as if by [`set`](Self::set).
    pub fn merge<I, K, V>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Declare a field on this instance only.
    ///
    /// The shared schema is copied on first write. A template default is
    /// materialized immediately unless the key already has an entry.
    pub fn define(&mut self, key: impl Into<Value>, field: Field) -> Result<()> {
        let key = Key::from_value(&key.into())?;
        if let Some(template) = field.template() {
            if !self.data.contains_key(&key) {
                self.data
                    .insert(key.clone(), Value::Construct(template.clone()));
            }
        }
        Arc::make_mut(&mut self.schema).insert(key, field);
        Ok(())
    }

    /// This instance's effective schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The shared handle to this instance's schema.
    pub fn schema_handle(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    /// Explicit entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.data.iter()
    }

    /// Explicit keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.data.keys()
    }

    /// Explicit keys, then schema keys that have no explicit entry.
    pub fn effective_keys(&self) -> Vec<&Key> {
        let mut keys: Vec<&Key> = self.data.keys().collect();
        keys.extend(self.schema.keys().filter(|k| !self.data.contains_key(*k)));
        keys
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn entry_mut(&mut self, key: Key) -> Result<&mut Value> {
        if !self.data.contains_key(&key) {
            let value = match self.schema.field(key.as_str()) {
                Some(field) => field.default_value().into_owned(),
                None => {
                    return Err(ConstructError::UndeclaredKey {
                        key: key.to_string(),
                    })
                }
            };
            trace!(key = %key, "materializing default for mutation");
            self.data.insert(key.clone(), value);
        }
        self.data
            .get_mut(&key)
            .ok_or_else(|| ConstructError::UndeclaredKey {
                key: key.to_string(),
            })
    }

    /// Store an already-normalized key, applying schema-aware coercion.
    fn store(&mut self, key: Key, value: Value) {
        let value = match value {
            Value::Mapping(mapping) => {
                let template = self.schema.field(key.as_str()).and_then(Field::template);
                match template {
                    Some(template) => match promote(template.clone(), mapping) {
                        Ok(merged) => {
                            debug!(key = %key, "merged mapping onto template default");
                            Value::Construct(merged)
                        }
                        Err(mapping) => Value::Mapping(mapping),
                    },
                    None => Value::Mapping(mapping).coerce(),
                }
            }
            other => other,
        };
        self.data.insert(key, value);
    }
}

/// Apply every entry of `mapping` onto `base`, if all of its keys are valid
/// construct keys. Otherwise hand the mapping back untouched.
pub(crate) fn promote(
    mut base: Construct,
    mapping: Mapping,
) -> std::result::Result<Construct, Mapping> {
    if !mapping.keys().all(Key::accepts) {
        trace!(entries = mapping.len(), "mapping has non-key entries; kept opaque");
        return Err(mapping);
    }
    for (key, value) in mapping {
        if let Ok(key) = Key::from_value(&key) {
            base.store(key, value);
        }
    }
    Ok(base)
}

impl Default for Construct {
    fn default() -> Self {
        Self::new()
    }
}

/// Constructs are equal when their explicit entries are equal, regardless of
/// order or schema.
impl PartialEq for Construct {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Construct {
    /// Returns `true` if `mapping` holds exactly this construct's explicit
    /// entries, keyed by their text.
    pub(crate) fn matches_mapping(&self, mapping: &Mapping) -> bool {
        self.data.len() == mapping.len()
            && self.data.iter().all(|(key, value)| {
                mapping
                    .get(&Value::String(key.to_string()))
                    .is_some_and(|v| v == value)
            })
    }
}

impl Serialize for Construct {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.data.len()))?;
        for (key, value) in &self.data {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
