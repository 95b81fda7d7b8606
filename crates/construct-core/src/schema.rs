//! Declarative schemas: per-shape defaults and descriptions.
//!
//! A [`Schema`] is built once through a [`SchemaBuilder`] and shared by
//! every construct of that shape behind an `Arc`. Schemas are read-only once
//! built; [`Construct::define`](crate::Construct::define) extends a single
//! instance's copy instead of mutating the shared one.
//!
//! A default is one of:
//!
//! - a plain value, resolved lazily by reads that find no explicit entry;
//! - a template construct (or a mapping that coerces into one), cloned into
//!   every new instance so nested fields are never shared;
//! - a thunk, evaluated on every read that falls back to it.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::construct::Construct;
use crate::error::Result;
use crate::key::Key;
use crate::value::Value;

type Thunk = Arc<dyn Fn() -> Value + Send + Sync>;

/// The default half of a field descriptor.
#[derive(Clone)]
pub enum FieldDefault {
    Value(Value),
    Lazy(Thunk),
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::Value(v) => f.debug_tuple("Value").field(v).finish(),
            FieldDefault::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl PartialEq for FieldDefault {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldDefault::Value(a), FieldDefault::Value(b)) => a == b,
            (FieldDefault::Lazy(a), FieldDefault::Lazy(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A schema entry: an optional default and an optional description.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    default: Option<FieldDefault>,
    description: Option<String>,
}

impl Field {
    /// A field with a fixed default. Mappings that qualify for coercion are
    /// promoted to template constructs here.
    pub fn new(default: impl Into<Value>) -> Self {
        Self {
            default: Some(FieldDefault::Value(default.into().coerce())),
            description: None,
        }
    }

    /// A field whose default is computed on every fallback read.
    pub fn lazy<F>(thunk: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            default: Some(FieldDefault::Lazy(Arc::new(thunk))),
            description: None,
        }
    }

    /// A declared field with no default. Reads resolve to [`Value::Null`].
    pub fn declared() -> Self {
        Self {
            default: None,
            description: None,
        }
    }

    /// Attach a human-readable description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn default(&self) -> Option<&FieldDefault> {
        self.default.as_ref()
    }

    /// Resolve the default for a read with no explicit entry.
    pub fn default_value(&self) -> Cow<'_, Value> {
        match &self.default {
            Some(FieldDefault::Value(v)) => Cow::Borrowed(v),
            Some(FieldDefault::Lazy(thunk)) => Cow::Owned(thunk()),
            None => Cow::Owned(Value::Null),
        }
    }

    /// The template construct, if the default is container-shaped.
    pub fn template(&self) -> Option<&Construct> {
        match &self.default {
            Some(FieldDefault::Value(Value::Construct(template))) => Some(template),
            _ => None,
        }
    }
}

/// The effective set of declared fields for one configuration shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    fields: IndexMap<Key, Field>,
}

impl Schema {
    /// Start building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// A shared, empty schema.
    pub fn empty() -> Arc<Schema> {
        Arc::new(Schema::default())
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    /// All declared fields, in declaration order.
    pub fn fields(&self) -> &IndexMap<Key, Field> {
        &self.fields
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Register or overwrite a field.
    pub(crate) fn insert(&mut self, key: Key, field: Field) {
        debug!(key = %key, has_default = field.default.is_some(), "schema field defined");
        self.fields.insert(key, field);
    }
}

/// Builds a [`Schema`] through explicit `define` calls.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a parent schema. Fields defined afterwards override the
    /// parent's field of the same key; the rest are inherited.
    pub fn extend(parent: &Schema) -> Self {
        Self {
            schema: parent.clone(),
        }
    }

    /// Declare `key` with the given descriptor.
    pub fn define(mut self, key: impl Into<Value>, field: Field) -> Result<Self> {
        let key = Key::from_value(&key.into())?;
        self.schema.insert(key, field);
        Ok(self)
    }

    pub fn build(self) -> Arc<Schema> {
        Arc::new(self.schema)
    }
}
