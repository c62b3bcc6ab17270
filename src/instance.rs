//! # Example Instance
//!
//! Flattens the example linked-data record (JSON-LD) into an ordered list
//! of `property reference -> literal value` pairs. Property keys are
//! expanded through the document's `@context` and then normalized with the
//! run's [`NamespaceMap`], so `"name"` under `"@vocab": "https://schema.org/"`
//! and `"schema:name"` both become `schema:name`.
//!
//! Only the parts of JSON-LD that matter for key comparison are handled:
//! prefix and term definitions, `@vocab`, nested contexts, `@graph`,
//! `@value` and `@id`. Remote contexts are not fetched; a context given as a
//! bare IRI string is used as `@vocab`.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;
use serde_json::Value;

use crate::namespace::{is_iri, split_curie, NamespaceMap};

/// Errors that can occur while loading an example instance
#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    /// I/O error reading the instance file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file is not valid JSON
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Valid JSON that is not a JSON-LD node, array or graph
    #[error("Invalid JSON-LD structure: {0}")]
    InvalidStructure(String),
}

/// One flattened property occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceProperty {
    /// Normalized property reference
    pub key: String,
    /// Literal value (`@id` for node references, empty for anonymous nodes)
    pub value: String,
    /// JSON pointer of the occurrence in the source document
    pub pointer: String,
}

/// Flattened example instance. Never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct ExampleInstance {
    properties: Vec<InstanceProperty>,
}

#[derive(Debug, Clone, Default)]
struct Context {
    terms: BTreeMap<String, String>,
    vocab: Option<String>,
}

impl Context {
    fn extend(&mut self, value: &Value) {
        match value {
            Value::String(iri) => {
                debug!("Treating remote context {} as @vocab", iri);
                let mut vocab = iri.clone();
                if !vocab.ends_with('/') && !vocab.ends_with('#') {
                    vocab.push('/');
                }
                self.vocab = Some(vocab);
            }
            Value::Array(items) => items.iter().for_each(|item| self.extend(item)),
            Value::Object(map) => {
                for (term, definition) in map {
                    match (term.as_str(), definition) {
                        ("@vocab", Value::String(vocab)) => self.vocab = Some(vocab.clone()),
                        (t, _) if t.starts_with('@') => {}
                        (_, Value::String(iri)) => {
                            self.terms.insert(term.clone(), iri.clone());
                        }
                        (_, Value::Object(def)) => {
                            if let Some(Value::String(iri)) = def.get("@id") {
                                self.terms.insert(term.clone(), iri.clone());
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    /// Prefix-like terms (IRIs ending in `/` or `#`) as namespace bindings
    fn namespaces(&self) -> NamespaceMap {
        self.terms
            .iter()
            .filter(|(_, iri)| iri.ends_with('/') || iri.ends_with('#'))
            .map(|(p, i)| (p.clone(), i.clone()))
            .collect()
    }

    fn expand_curie(&self, value: &str) -> Option<String> {
        let (prefix, local) = split_curie(value)?;
        self.terms.get(prefix).map(|ns| format!("{}{}", ns, local))
    }

    fn expand_key(&self, key: &str) -> Option<String> {
        if let Some(iri) = self.terms.get(key) {
            return Some(self.expand_curie(iri).unwrap_or_else(|| iri.clone()));
        }
        if let Some(iri) = self.expand_curie(key) {
            return Some(iri);
        }
        if is_iri(key) || key.contains(':') {
            return None;
        }
        self.vocab.as_ref().map(|vocab| format!("{}{}", vocab, key))
    }
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn literal(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => match (map.get("@value"), map.get("@id")) {
            (Some(v), _) => literal(v),
            (None, Some(Value::String(id))) => Some(id.clone()),
            _ => Some(String::new()),
        },
        Value::Array(_) => None,
    }
}

struct Flattener<'a> {
    base: &'a NamespaceMap,
    properties: Vec<InstanceProperty>,
}

impl Flattener<'_> {
    fn node(&mut self, node: &serde_json::Map<String, Value>, context: &Context, pointer: &str) {
        let mut context = context.clone();
        if let Some(local) = node.get("@context") {
            context.extend(local);
        }
        let mut namespaces = self.base.clone();
        namespaces.merge_missing(&context.namespaces());

        if let Some(Value::Array(graph)) = node.get("@graph") {
            for (i, item) in graph.iter().enumerate() {
                if let Value::Object(child) = item {
                    self.node(child, &context, &format!("{}/@graph/{}", pointer, i));
                }
            }
        }

        for (key, value) in node {
            if key.starts_with('@') {
                continue;
            }
            let expanded = context.expand_key(key).unwrap_or_else(|| key.clone());
            let normalized = namespaces.normalize(&expanded);
            let path = format!("{}/{}", pointer, escape_pointer(key));
            self.value(&normalized, value, &context, &path);
        }
    }

    fn value(&mut self, key: &str, value: &Value, context: &Context, pointer: &str) {
        match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.value(key, item, context, &format!("{}/{}", pointer, i));
                }
            }
            other => {
                if let Some(literal) = literal(other) {
                    self.properties.push(InstanceProperty {
                        key: key.to_string(),
                        value: literal,
                        pointer: pointer.to_string(),
                    });
                }
                if let Value::Object(child) = other {
                    if !child.contains_key("@value") {
                        self.node(child, context, pointer);
                    }
                }
            }
        }
    }
}

impl ExampleInstance {
    /// Load and flatten a JSON-LD file
    pub fn from_file<P: AsRef<Path>>(path: P, base: &NamespaceMap) -> Result<Self, InstanceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let instance = Self::from_json_str(&content, base)?;
        info!(
            "Loaded {} properties ({} distinct) from {}",
            instance.properties.len(),
            instance.keys().len(),
            path.display()
        );
        Ok(instance)
    }

    /// Parse and flatten a JSON-LD string
    pub fn from_json_str(json: &str, base: &NamespaceMap) -> Result<Self, InstanceError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value, base)
    }

    /// Flatten an already-parsed JSON-LD document
    pub fn from_value(value: &Value, base: &NamespaceMap) -> Result<Self, InstanceError> {
        let mut flattener = Flattener {
            base,
            properties: Vec::new(),
        };
        let context = Context::default();

        match value {
            Value::Object(node) => flattener.node(node, &context, ""),
            Value::Array(nodes) => {
                for (i, node) in nodes.iter().enumerate() {
                    match node {
                        Value::Object(node) => flattener.node(node, &context, &format!("/{}", i)),
                        _ => {
                            return Err(InstanceError::InvalidStructure(format!(
                                "top-level array element {} is not an object",
                                i
                            )))
                        }
                    }
                }
            }
            _ => {
                return Err(InstanceError::InvalidStructure(
                    "top level must be an object or an array of objects".to_string(),
                ))
            }
        }

        Ok(Self {
            properties: flattener.properties,
        })
    }

    /// Build an instance directly from `(key, value)` pairs
    pub fn from_pairs<K: Into<String>, V: Into<String>>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let properties = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (key, value))| InstanceProperty {
                key: key.into(),
                value: value.into(),
                pointer: format!("/{}", i),
            })
            .collect();
        Self { properties }
    }

    /// All property occurrences in document order
    pub fn properties(&self) -> &[InstanceProperty] {
        &self.properties
    }

    /// Distinct property keys in order of first occurrence
    pub fn keys(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.properties
            .iter()
            .map(|p| p.key.as_str())
            .filter(|k| seen.insert(*k))
            .collect()
    }

    /// Returns true if the instance carries the property
    pub fn contains(&self, key: &str) -> bool {
        self.properties.iter().any(|p| p.key == key)
    }

    /// First value of the property
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// First occurrence of the property
    pub fn occurrence(&self, key: &str) -> Option<&InstanceProperty> {
        self.properties.iter().find(|p| p.key == key)
    }

    /// Number of property occurrences
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if no property was found
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
