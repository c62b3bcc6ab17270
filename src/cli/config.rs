//! TOML configuration file support.
//!
//! Prefix bindings and vocabulary settings that would be tedious to pass as
//! flags live in a config file:
//!
//! ```toml
//! # xasmap.toml
//! [namespaces]
//! xas = "https://example.org/xas#"
//! nxs = "https://manual.nexusformat.org/classes/"
//!
//! [vocabulary]
//! authority = "xas"
//! external_prefixes = ["nxs"]
//!
//! [mapping]
//! delimiter = "\t"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use xasmap::namespace::{ExternalVocabularies, NamespaceMap};
use xasmap::validator::ValidationOptions;

/// Root configuration structure for xasmap.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Extra prefix -> namespace IRI bindings.
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,

    /// Vocabulary resolution settings.
    #[serde(default)]
    pub vocabulary: VocabularyConfig,

    /// Mapping table settings.
    #[serde(default)]
    pub mapping: MappingConfig,
}

/// Settings for resolving mapping targets.
#[derive(Debug, Default, Deserialize)]
pub struct VocabularyConfig {
    /// Prefix of the glossary's own vocabulary; never treated as external.
    pub authority: Option<String>,

    /// Prefixes accepted as external vocabularies in addition to the built-in list.
    #[serde(default)]
    pub external_prefixes: Vec<String>,
}

/// Settings for reading the mapping table.
#[derive(Debug, Default, Deserialize)]
pub struct MappingConfig {
    /// Field delimiter, a single character or "tab".
    pub delimiter: Option<String>,
}

impl MappingConfig {
    /// Delimiter as a byte, if configured.
    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        let Some(delimiter) = self.delimiter.as_deref() else {
            return Ok(None);
        };
        match delimiter {
            "\t" | "tab" | "\\t" => Ok(Some(b'\t')),
            d if d.len() == 1 && d.is_ascii() => Ok(Some(d.as_bytes()[0])),
            d => bail!("Invalid mapping delimiter '{}': expected a single ASCII character", d),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Build validation options on top of the built-in defaults.
    pub fn validation_options(&self) -> Result<ValidationOptions> {
        let mut namespaces = NamespaceMap::with_defaults();
        for (prefix, iri) in &self.namespaces {
            namespaces.insert(prefix.as_str(), iri.as_str());
        }

        let mut external = ExternalVocabularies::new();
        for prefix in &self.vocabulary.external_prefixes {
            external = external.with_prefix(prefix.as_str());
        }
        if let Some(authority) = &self.vocabulary.authority {
            external = external.with_authority(authority.as_str());
        }

        Ok(ValidationOptions {
            namespaces,
            external,
            delimiter: self.mapping.delimiter_byte()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [namespaces]
            xas = "https://example.org/xas#"

            [vocabulary]
            authority = "xas"
            external_prefixes = ["nxs"]

            [mapping]
            delimiter = ";"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(
            config.namespaces.get("xas").map(String::as_str),
            Some("https://example.org/xas#")
        );
        assert_eq!(config.vocabulary.authority.as_deref(), Some("xas"));
        assert_eq!(config.vocabulary.external_prefixes, vec!["nxs".to_string()]);

        let options = config.validation_options().unwrap();
        assert_eq!(options.delimiter, Some(b';'));
        assert_eq!(options.namespaces.get("xas"), Some("https://example.org/xas#"));
        assert!(options.namespaces.contains_prefix("skos"));
        assert!(options.external.is_external("nxs"));
        assert!(!options.external.is_external("xas"));
        assert_eq!(options.external.authority(), Some("xas"));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [mapping]
            delimiter = "tab"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert!(config.namespaces.is_empty());
        assert_eq!(config.mapping.delimiter_byte().unwrap(), Some(b'\t'));
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.vocabulary.authority, None);
        assert_eq!(config.validation_options().unwrap().delimiter, None);
    }

    #[test]
    fn test_invalid_delimiter() {
        let config = Config::from_str("[mapping]\ndelimiter = \"::\"").unwrap();
        assert!(config.validation_options().is_err());
    }
}
