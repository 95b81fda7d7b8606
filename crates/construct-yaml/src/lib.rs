//! YAML codec for constructs.
//!
//! Encoding emits a construct's explicit entries in insertion order, nested
//! constructs as nested blocks. Decoding parses a document into plain values
//! and assigns each top-level entry through [`Construct::set`], reusing the
//! construct's own mapping coercion. Ordinary `serde_yaml` use elsewhere is
//! unaffected.
//!
//! # Example
//!
//! ```
//! use construct_core::{Construct, Mapping};
//! use construct_yaml::ConstructYamlExt;
//!
//! let mut c = Construct::new();
//! c.set("foo", "hi").unwrap();
//! c.set("bar", Mapping::from([("baz", 2)])).unwrap();
//!
//! let text = c.to_yaml().unwrap();
//! assert_eq!(text, "foo: hi\nbar:\n  baz: 2\n");
//! assert_eq!(construct_yaml::from_str(&text).unwrap(), c);
//! ```

pub mod codec;
pub mod config;
pub mod error;

pub use codec::YamlCodec;
pub use config::CodecConfig;
pub use error::{CodecError, CodecResult};

use construct_core::Construct;

/// YAML conveniences on [`Construct`], using the default [`CodecConfig`].
pub trait ConstructYamlExt {
    /// Emit this construct as YAML.
    fn to_yaml(&self) -> CodecResult<String>;

    /// Merge a YAML document's top-level entries into this construct.
    fn load(&mut self, text: &str) -> CodecResult<()>;
}

impl ConstructYamlExt for Construct {
    fn to_yaml(&self) -> CodecResult<String> {
        YamlCodec::default().encode(self)
    }

    fn load(&mut self, text: &str) -> CodecResult<()> {
        YamlCodec::default().load_into(self, text)
    }
}

/// Emit a construct with the default codec.
pub fn to_string(construct: &Construct) -> CodecResult<String> {
    YamlCodec::default().encode(construct)
}

/// Decode a schemaless construct with the default codec.
pub fn from_str(text: &str) -> CodecResult<Construct> {
    YamlCodec::default().decode(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use construct_core::{Field, Schema};

    #[test]
    fn extension_trait_round_trip() {
        let mut c = Construct::new();
        c.set("name", "app").unwrap();
        let text = c.to_yaml().unwrap();

        let mut other = Construct::new();
        other.load(&text).unwrap();
        assert_eq!(other, c);
    }

    #[test]
    fn free_functions_match_codec() {
        let c = from_str("a: 1\nb:\n  c: true\n").unwrap();
        assert_eq!(to_string(&c).unwrap(), "a: 1\nb:\n  c: true\n");
    }

    #[test]
    fn load_respects_instance_schema() {
        let schema = Schema::builder()
            .define("people", Field::new(Vec::<construct_core::Value>::new()))
            .unwrap()
            .build();
        let mut c = Construct::with_schema(schema);
        c.load("extra: 1\n").unwrap();
        assert_eq!(
            *c.get("people").unwrap(),
            construct_core::Value::Sequence(vec![])
        );
        assert_eq!(c.to_yaml().unwrap(), "extra: 1\n");
    }
}
