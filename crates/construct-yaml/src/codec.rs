use std::sync::Arc;

use construct_core::{Construct, Mapping, Schema, Symbol, Value};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::Value as Yaml;
use tracing::{debug, trace};

use crate::config::CodecConfig;
use crate::error::{CodecError, CodecResult};

/// Encodes constructs to YAML and decodes YAML into constructs.
///
/// Encoding emits explicit entries only, in insertion order, at every
/// level. Decoding parses the text into plain values and then assigns each
/// top-level entry with [`Construct::set`], so a decoded construct is
/// exactly what constructing and then assigning would have produced.
///
/// With symbol notation on, text that reads as `:name` is written with a
/// `!str` tag so it loads back as text, and symbols whose names do not fit
/// the notation are written with a `!sym` tag.
#[derive(Clone, Debug, Default)]
pub struct YamlCodec {
    config: CodecConfig,
}

impl YamlCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Emit `construct` as a YAML document.
    pub fn encode(&self, construct: &Construct) -> CodecResult<String> {
        let doc = self.construct_to_yaml(construct);
        let body = serde_yaml::to_string(&doc).map_err(|e| CodecError::Emit(e.to_string()))?;
        debug!(keys = construct.len(), bytes = body.len(), "encoded construct");
        if self.config.document_marker {
            Ok(format!("---\n{body}"))
        } else {
            Ok(body)
        }
    }

    /// Decode a document into a schemaless construct.
    pub fn decode(&self, text: &str) -> CodecResult<Construct> {
        self.decode_with_schema(text, Schema::empty())
    }

    /// Decode a document into a construct of the given shape.
    ///
    /// The instance starts from the schema's defaults, so declared template
    /// fields come back as their declared type with the document merged in.
    pub fn decode_with_schema(&self, text: &str, schema: Arc<Schema>) -> CodecResult<Construct> {
        let mut construct = Construct::with_schema(schema);
        self.load_into(&mut construct, text)?;
        Ok(construct)
    }

    /// Merge a document's top-level entries into an existing construct.
    ///
    /// Later loads override earlier keys; keys absent from the document are
    /// left untouched.
    pub fn load_into(&self, construct: &mut Construct, text: &str) -> CodecResult<()> {
        let entries = self.document(text)?;
        debug!(entries = entries.len(), "merging document into construct");
        construct.merge(entries)?;
        Ok(())
    }

    /// Parse text into a plain value tree. Mappings are not coerced.
    pub fn parse_value(&self, text: &str) -> CodecResult<Value> {
        let doc: Yaml = serde_yaml::from_str(text).map_err(|e| CodecError::Parse(e.to_string()))?;
        Ok(self.value_from_yaml(doc))
    }

    fn document(&self, text: &str) -> CodecResult<Mapping> {
        match self.parse_value(text)? {
            Value::Mapping(entries) => Ok(entries),
            Value::Null => Ok(Mapping::new()),
            other => Err(CodecError::NotAMapping {
                found: other.kind(),
            }),
        }
    }

    fn value_from_yaml(&self, yaml: Yaml) -> Value {
        match yaml {
            Yaml::Null => Value::Null,
            Yaml::Bool(b) => Value::Bool(b),
            Yaml::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Yaml::String(s) => match self.symbol(&s) {
                Some(sym) => Value::Symbol(sym),
                None => Value::String(s),
            },
            Yaml::Sequence(items) => {
                Value::Sequence(items.into_iter().map(|v| self.value_from_yaml(v)).collect())
            }
            Yaml::Mapping(entries) => Value::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (self.value_from_yaml(k), self.value_from_yaml(v)))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => {
                let TaggedValue { tag, value } = *tagged;
                match (tag.to_string().as_str(), value) {
                    (STR_TAG, Yaml::String(s)) => Value::String(s),
                    (SYM_TAG, Yaml::String(s)) => Value::Symbol(Symbol::new(s)),
                    (_, value) => {
                        trace!(tag = %tag, "ignoring YAML tag");
                        self.value_from_yaml(value)
                    }
                }
            }
        }
    }

    fn symbol(&self, text: &str) -> Option<Symbol> {
        if self.config.symbol_notation {
            Symbol::parse_notation(text)
        } else {
            None
        }
    }

    fn construct_to_yaml(&self, construct: &Construct) -> Yaml {
        let mut entries = serde_yaml::Mapping::new();
        for (key, value) in construct.iter() {
            entries.insert(self.text_to_yaml(key.as_str()), self.value_to_yaml(value));
        }
        Yaml::Mapping(entries)
    }

    fn value_to_yaml(&self, value: &Value) -> Yaml {
        match value {
            Value::Null => Yaml::Null,
            Value::Bool(b) => Yaml::Bool(*b),
            Value::Integer(i) => Yaml::Number((*i).into()),
            Value::Float(f) => Yaml::Number((*f).into()),
            Value::String(s) => self.text_to_yaml(s),
            Value::Symbol(sym) if !self.config.symbol_notation => {
                Yaml::String(sym.as_str().to_string())
            }
            Value::Symbol(sym) => {
                let text = sym.to_string();
                if Symbol::parse_notation(&text).is_some() {
                    Yaml::String(text)
                } else {
                    tagged(SYM_TAG, sym.as_str())
                }
            }
            Value::Sequence(items) => {
                Yaml::Sequence(items.iter().map(|v| self.value_to_yaml(v)).collect())
            }
            Value::Mapping(mapping) => {
                let mut entries = serde_yaml::Mapping::new();
                for (k, v) in mapping.iter() {
                    entries.insert(self.value_to_yaml(k), self.value_to_yaml(v));
                }
                Yaml::Mapping(entries)
            }
            Value::Construct(construct) => self.construct_to_yaml(construct),
        }
    }

    /// Text that would read back as a symbol is tagged as a string.
    fn text_to_yaml(&self, text: &str) -> Yaml {
        if self.symbol(text).is_some() {
            tagged(STR_TAG, text)
        } else {
            Yaml::String(text.to_string())
        }
    }
}

const STR_TAG: &str = "!str";
const SYM_TAG: &str = "!sym";

fn tagged(tag: &str, text: &str) -> Yaml {
    Yaml::Tagged(Box::new(TaggedValue {
        tag: Tag::new(tag),
        value: Yaml::String(text.to_string()),
    }))
}
