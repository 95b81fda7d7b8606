//! Indifferent-key configuration containers.
//!
//! A [`Construct`] maps keys to values and exposes every key through a
//! single `get` / `set` / `delete` surface. Keys may be given as strings or
//! [`Symbol`]s; both spellings address the same entry. Assigning a plain
//! mapping whose keys are all valid produces a nested construct, so
//! configuration trees can be built from literal data.
//!
//! A construct may carry a [`Schema`]: declared defaults and descriptions
//! per key, built once per configuration shape and shared between instances.
//!
//! # Architecture
//!
//! - **Explicit data** is what was assigned. It is ordered by first
//!   assignment, is what serialization emits, and is what equality compares.
//! - **Schema defaults** back reads for keys with no explicit entry. Template
//!   constructs are the exception: they are cloned into each new instance so
//!   nested fields can be mutated without sharing.
//! - **Coercion** ([`Value::coerce`]) is the one rule that turns a raw
//!   [`Mapping`] into a nested construct or leaves it opaque. Assignment and
//!   decoding both go through it.
//!
//! # Modules
//!
//! - [`error`]: error types for construct operations
//! - [`key`]: [`Key`] normalization and [`Symbol`]
//! - [`value`]: the [`Value`] union and opaque [`Mapping`]
//! - [`schema`]: [`Field`], [`Schema`], [`SchemaBuilder`]
//! - [`construct`]: the [`Construct`] container
//! - [`attr`]: attribute-call convention and dotted paths
//!
//! # Example
//!
//! ```
//! use construct_core::{Construct, Field, Mapping, Schema};
//!
//! let db = Schema::builder()
//!     .define("host", Field::new("127.0.0.1").describe("Database host"))
//!     .unwrap()
//!     .build();
//! let schema = Schema::builder()
//!     .define("db", Field::new(Construct::with_schema(db)))
//!     .unwrap()
//!     .build();
//!
//! let conf = Construct::with_values(schema, [("db", Mapping::from([("user", "app")]))]).unwrap();
//! assert_eq!(conf.lookup("db.host").unwrap(), "127.0.0.1");
//! assert_eq!(conf.lookup("db.user").unwrap(), "app");
//! ```

pub mod attr;
pub mod construct;
pub mod error;
pub mod key;
pub mod schema;
pub mod value;

pub use attr::Attr;
pub use construct::Construct;
pub use error::{ConstructError, Result};
pub use key::{Key, Symbol};
pub use schema::{Field, FieldDefault, Schema, SchemaBuilder};
pub use value::{Mapping, Value};
