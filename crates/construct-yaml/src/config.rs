use serde::{Deserialize, Serialize};

/// Configuration for [`YamlCodec`](crate::YamlCodec).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Prefix emitted documents with a `---` marker line.
    pub document_marker: bool,
    /// Read plain scalars written as `:identifier` as symbols, and emit
    /// symbols in that form. When off, symbols are emitted as their bare
    /// name and read back as strings.
    pub symbol_notation: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            document_marker: false,
            symbol_notation: true,
        }
    }
}

impl CodecConfig {
    /// Default settings, plus a leading `---` on every emitted document.
    pub fn with_document_marker() -> Self {
        Self {
            document_marker: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = CodecConfig::default();
        assert!(!c.document_marker);
        assert!(c.symbol_notation);
    }

    #[test]
    fn document_marker_preset() {
        let c = CodecConfig::with_document_marker();
        assert!(c.document_marker);
        assert!(c.symbol_notation);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let c: CodecConfig = serde_yaml::from_str("document_marker: true\n").unwrap();
        assert_eq!(c, CodecConfig::with_document_marker());
    }
}
