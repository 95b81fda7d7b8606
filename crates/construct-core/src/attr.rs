//! Attribute-style access by name.
//!
//! Callers that address settings by name at runtime (command-line
//! overrides, templating, scripting bridges) use one naming convention:
//!
//! - `name=` writes `name`;
//! - a bare `name` reads `name`;
//! - `delete` and `include?` are structural operations taking a key.
//!
//! Dotted paths (`db.host`) walk through nested constructs.

use std::borrow::Cow;

use crate::construct::Construct;
use crate::error::{ConstructError, Result};
use crate::key::Key;
use crate::value::Value;

/// A classified attribute call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attr {
    /// `name`: read the effective value.
    Read(Key),
    /// `name=`: assign a value.
    Write(Key),
    /// `delete`: remove an explicit entry.
    Delete,
    /// `include?`: test for an explicit entry.
    Include,
}

impl Attr {
    /// Classify an attribute name.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "delete" => Ok(Attr::Delete),
            "include?" => Ok(Attr::Include),
            _ => match name.strip_suffix('=') {
                Some(stem) => Ok(Attr::Write(Key::new(stem)?)),
                None => Ok(Attr::Read(Key::new(name)?)),
            },
        }
    }

    fn arity(&self) -> usize {
        match self {
            Attr::Read(_) => 0,
            Attr::Write(_) | Attr::Delete | Attr::Include => 1,
        }
    }
}

impl Construct {
    /// Perform one attribute call.
    ///
    /// Reads return the effective value, `delete` returns the removed value
    /// (if any), `include?` returns a boolean, and writes return `None`.
    pub fn dispatch(&mut self, name: &str, args: Vec<Value>) -> Result<Option<Value>> {
        let attr = Attr::parse(name)?;
        if args.len() != attr.arity() {
            return Err(ConstructError::Arity {
                name: name.to_string(),
                expected: attr.arity(),
                given: args.len(),
            });
        }
        let mut args = args.into_iter();
        let arg = args.next().unwrap_or(Value::Null);
        match attr {
            Attr::Read(key) => self.get(key.as_str()).map(|v| Some(v.into_owned())),
            Attr::Write(key) => {
                self.set(key.as_str(), arg)?;
                Ok(None)
            }
            Attr::Delete => Ok(self.delete(arg)),
            Attr::Include => Ok(Some(Value::Bool(self.includes(arg)))),
        }
    }

    /// Read the effective value at a dotted path such as `db.host`.
    pub fn lookup(&self, path: &str) -> Result<Value> {
        match path.split_once('.') {
            None => self.get(path).map(Cow::into_owned),
            Some((head, rest)) => {
                let value = self.get(head)?;
                match value.as_construct() {
                    Some(child) => child.lookup(rest),
                    None => Err(ConstructError::NotAConstruct {
                        key: head.to_string(),
                    }),
                }
            }
        }
    }

    /// Assign `value` at a dotted path such as `db.host`.
    ///
    /// Intermediate segments resolve through explicit entries and schema
    /// defaults; a segment with neither is created as an empty construct.
    pub fn assign(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        match path.split_once('.') {
            None => self.set(path, value),
            Some((head, rest)) => {
                if matches!(self.get(head), Err(ConstructError::UndeclaredKey { .. })) {
                    self.set(head, Construct::new())?;
                }
                self.child_mut(head)?.assign(rest, value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, Schema};
    use crate::value::Mapping;

    #[test]
    fn parse_names() {
        assert_eq!(Attr::parse("foo").unwrap(), Attr::Read(Key::new("foo").unwrap()));
        assert_eq!(Attr::parse("foo=").unwrap(), Attr::Write(Key::new("foo").unwrap()));
        assert_eq!(Attr::parse("delete").unwrap(), Attr::Delete);
        assert_eq!(Attr::parse("include?").unwrap(), Attr::Include);
        assert!(Attr::parse("").is_err());
        assert!(Attr::parse("=").is_err());
    }

    #[test]
    fn dispatch_write_then_read() {
        let mut c = Construct::new();
        assert_eq!(c.dispatch("bar=", vec![Value::from(2)]).unwrap(), None);
        assert_eq!(c.dispatch("bar", vec![]).unwrap(), Some(Value::from(2)));
    }

    #[test]
    fn dispatch_unknown_name_is_undeclared() {
        let mut c = Construct::new();
        assert!(matches!(
            c.dispatch("foo", vec![]),
            Err(ConstructError::UndeclaredKey { .. })
        ));
    }

    #[test]
    fn dispatch_structural_operations() {
        let mut c = Construct::new();
        c.set("foo", 1).unwrap();
        assert_eq!(
            c.dispatch("include?", vec![Value::from("foo")]).unwrap(),
            Some(Value::Bool(true))
        );
        assert_eq!(
            c.dispatch("delete", vec![Value::from("foo")]).unwrap(),
            Some(Value::from(1))
        );
        assert!(c.dispatch("foo", vec![]).is_err());
        assert_eq!(c.dispatch("delete", vec![Value::from("foo")]).unwrap(), None);
    }

    #[test]
    fn dispatch_checks_arity() {
        let mut c = Construct::new();
        assert_eq!(
            c.dispatch("foo=", vec![]).unwrap_err(),
            ConstructError::Arity {
                name: "foo=".into(),
                expected: 1,
                given: 0
            }
        );
        assert!(c.dispatch("foo", vec![Value::Null]).is_err());
    }

    #[test]
    fn lookup_walks_nested_constructs() {
        let mut c = Construct::new();
        c.set("db", Mapping::from([("host", "localhost")])).unwrap();
        assert_eq!(c.lookup("db.host").unwrap(), "localhost");
        assert!(c.lookup("db.port").is_err());
        assert!(c.lookup("db..host").is_err());
    }

    #[test]
    fn lookup_through_scalar_fails() {
        let mut c = Construct::new();
        c.set("port", 80).unwrap();
        assert_eq!(
            c.lookup("port.number").unwrap_err(),
            ConstructError::NotAConstruct { key: "port".into() }
        );
    }

    #[test]
    fn assign_creates_intermediate_constructs() {
        let mut c = Construct::new();
        c.assign("server.tls.enabled", true).unwrap();
        assert_eq!(c.lookup("server.tls.enabled").unwrap(), true);
        assert!(c.get("server").unwrap().as_construct().is_some());
    }

    #[test]
    fn assign_reuses_template_defaults() {
        let db = Schema::builder()
            .define("host", Field::new("127.0.0.1"))
            .unwrap()
            .build();
        let schema = Schema::builder()
            .define("db", Field::new(Construct::with_schema(db)))
            .unwrap()
            .build();
        let mut c = Construct::with_schema(schema);
        c.assign("db.user", "admin").unwrap();
        assert_eq!(c.lookup("db.user").unwrap(), "admin");
        assert_eq!(c.lookup("db.host").unwrap(), "127.0.0.1");
    }
}
