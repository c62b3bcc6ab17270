//! # Namespace Prefixes and External Vocabularies
//!
//! Property references in the mapping table, the glossary and the example
//! instance come in three spellings: full IRIs (`https://schema.org/name`),
//! CURIEs (`schema:name`) and dotted references (`schema.name`). This module
//! normalizes all three onto a single comparable form (a CURIE whenever the
//! namespace is known) and keeps the static list of external vocabularies
//! whose terms are accepted without a glossary entry.
//!
//! ## Reference
//! - CURIE syntax: https://www.w3.org/TR/curie/
//! - SKOS core: http://www.w3.org/2004/02/skos/core#

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// RDF syntax namespace
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// SKOS core namespace
pub const SKOS_NS: &str = "http://www.w3.org/2004/02/skos/core#";

/// Well-known prefix bindings available to every run.
pub const DEFAULT_PREFIXES: &[(&str, &str)] = &[
    ("rdf", RDF_NS),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("skos", SKOS_NS),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("dcat", "http://www.w3.org/ns/dcat#"),
    ("prov", "http://www.w3.org/ns/prov#"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("schema", "https://schema.org/"),
    ("sosa", "http://www.w3.org/ns/sosa/"),
    ("ssn", "http://www.w3.org/ns/ssn/"),
    ("qudt", "http://qudt.org/schema/qudt/"),
    ("unit", "http://qudt.org/vocab/unit/"),
    ("time", "http://www.w3.org/2006/time#"),
    ("spdx", "http://spdx.org/rdf/terms#"),
];

/// Vocabularies outside the glossary's authority whose terms are accepted
/// as mapping targets without a matching concept.
pub const EXTERNAL_PREFIXES: &[&str] = &[
    "rdf", "rdfs", "owl", "xsd", "skos", "dcterms", "dcat", "prov", "foaf", "schema", "sosa",
    "ssn", "qudt", "unit", "time", "spdx",
];

/// Returns true if the reference is written as an absolute IRI rather than a CURIE.
pub fn is_iri(reference: &str) -> bool {
    reference.contains("://") || reference.starts_with("urn:")
}

/// Split a CURIE into `(prefix, local)`.
///
/// Absolute IRIs are not CURIEs and return `None`, as do references with an
/// empty prefix.
pub fn split_curie(reference: &str) -> Option<(&str, &str)> {
    if is_iri(reference) {
        return None;
    }
    let (prefix, local) = reference.split_once(':')?;
    if prefix.is_empty() {
        return None;
    }
    Some((prefix, local))
}

/// A set of `prefix -> namespace IRI` bindings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceMap {
    prefixes: BTreeMap<String, String>,
}

impl NamespaceMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map pre-populated with [`DEFAULT_PREFIXES`]
    pub fn with_defaults() -> Self {
        DEFAULT_PREFIXES
            .iter()
            .map(|(prefix, iri)| (prefix.to_string(), iri.to_string()))
            .collect()
    }

    /// Bind a prefix, replacing any previous binding
    pub fn insert(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        self.insert(prefix, iri);
        self
    }

    /// Add every binding of `other` whose prefix is not yet bound here
    pub fn merge_missing(&mut self, other: &NamespaceMap) {
        for (prefix, iri) in &other.prefixes {
            self.prefixes
                .entry(prefix.clone())
                .or_insert_with(|| iri.clone());
        }
    }

    /// Namespace IRI bound to `prefix`
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Returns true if `prefix` is bound
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.prefixes.contains_key(prefix)
    }

    /// Iterate over bindings in prefix order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, i)| (p.as_str(), i.as_str()))
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Returns true if there are no bindings
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Expand a CURIE to a full IRI. Absolute IRIs are returned unchanged.
    pub fn expand(&self, reference: &str) -> Option<String> {
        if is_iri(reference) {
            return Some(reference.to_string());
        }
        let (prefix, local) = split_curie(reference)?;
        self.get(prefix).map(|ns| format!("{}{}", ns, local))
    }

    /// Compact an absolute IRI to a CURIE using the longest matching namespace.
    ///
    /// `http` and `https` spellings of the same namespace are treated alike.
    pub fn compact(&self, iri: &str) -> Option<String> {
        let flipped = flip_scheme(iri);
        let mut best: Option<(usize, String)> = None;

        for (prefix, ns) in &self.prefixes {
            let local = iri
                .strip_prefix(ns.as_str())
                .or_else(|| flipped.as_deref().and_then(|f| f.strip_prefix(ns.as_str())));
            let Some(local) = local else { continue };
            if local.is_empty() {
                continue;
            }
            if best.as_ref().map_or(true, |(len, _)| ns.len() > *len) {
                best = Some((ns.len(), format!("{}:{}", prefix, local)));
            }
        }

        best.map(|(_, curie)| curie)
    }

    /// Normalize a property reference to its comparable form.
    ///
    /// - absolute IRIs are compacted when a namespace matches
    /// - `prefix.local` becomes `prefix:local` when `prefix` is bound
    /// - everything else is returned trimmed
    pub fn normalize(&self, reference: &str) -> String {
        let reference = reference.trim();
        if is_iri(reference) {
            return self
                .compact(reference)
                .unwrap_or_else(|| reference.to_string());
        }
        if split_curie(reference).is_some() {
            return reference.to_string();
        }
        if let Some((prefix, local)) = reference.split_once('.') {
            if !local.is_empty() && self.contains_prefix(prefix) {
                return format!("{}:{}", prefix, local);
            }
        }
        reference.to_string()
    }
}

impl FromIterator<(String, String)> for NamespaceMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            prefixes: iter.into_iter().collect(),
        }
    }
}

fn flip_scheme(iri: &str) -> Option<String> {
    if let Some(rest) = iri.strip_prefix("https://") {
        Some(format!("http://{}", rest))
    } else {
        iri.strip_prefix("http://")
            .map(|rest| format!("https://{}", rest))
    }
}

/// Prefixes recognized as external vocabularies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalVocabularies {
    prefixes: BTreeSet<String>,
    authority: Option<String>,
}

impl Default for ExternalVocabularies {
    fn default() -> Self {
        Self {
            prefixes: EXTERNAL_PREFIXES.iter().map(|p| p.to_string()).collect(),
            authority: None,
        }
    }
}

impl ExternalVocabularies {
    /// The static external prefix list
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognize an additional prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into());
        self
    }

    /// Set the glossary's own prefix; it is never treated as external
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    /// The glossary's own prefix, if configured
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// Returns true if `prefix` names an external vocabulary
    pub fn is_external(&self, prefix: &str) -> bool {
        self.authority.as_deref() != Some(prefix) && self.prefixes.contains(prefix)
    }

    /// External prefix of a normalized reference, if any
    pub fn external_prefix<'a>(&self, normalized: &'a str) -> Option<&'a str> {
        let (prefix, _) = split_curie(normalized)?;
        self.is_external(prefix).then_some(prefix)
    }
}

impl fmt::Display for ExternalVocabularies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list: Vec<&str> = self.prefixes.iter().map(String::as_str).collect();
        write!(f, "{}", list.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_curie() {
        assert_eq!(split_curie("xas:elementSymbol"), Some(("xas", "elementSymbol")));
        assert_eq!(split_curie("https://schema.org/name"), None);
        assert_eq!(split_curie(":name"), None);
        assert_eq!(split_curie("element.symbol"), None);
    }

    #[test]
    fn test_expand_and_compact() {
        let ns = NamespaceMap::with_defaults().with("xas", "https://example.org/xas#");

        assert_eq!(
            ns.expand("xas:edge").as_deref(),
            Some("https://example.org/xas#edge")
        );
        assert_eq!(
            ns.compact("https://example.org/xas#edge").as_deref(),
            Some("xas:edge")
        );
        assert_eq!(ns.expand("nope:edge"), None);
    }

    #[test]
    fn test_compact_prefers_longest_namespace() {
        let ns = NamespaceMap::new()
            .with("ex", "https://example.org/")
            .with("exv", "https://example.org/vocab/");

        assert_eq!(
            ns.compact("https://example.org/vocab/term").as_deref(),
            Some("exv:term")
        );
    }

    #[test]
    fn test_compact_ignores_scheme_difference() {
        let ns = NamespaceMap::with_defaults();
        assert_eq!(ns.compact("http://schema.org/name").as_deref(), Some("schema:name"));
    }

    #[test]
    fn test_normalize() {
        let ns = NamespaceMap::with_defaults();
        assert_eq!(ns.normalize(" schema.name "), "schema:name");
        assert_eq!(ns.normalize("https://schema.org/name"), "schema:name");
        assert_eq!(ns.normalize("element.symbol"), "element.symbol");
        assert_eq!(ns.normalize("xas:edge"), "xas:edge");
    }

    #[test]
    fn test_merge_missing_and_iter() {
        let mut ns = NamespaceMap::new().with("xas", "https://example.org/xas#");
        let doc = NamespaceMap::new()
            .with("xas", "https://other.org/v#")
            .with("dcat", "http://www.w3.org/ns/dcat#");
        ns.merge_missing(&doc);

        let bindings: Vec<_> = ns.iter().collect();
        assert_eq!(
            bindings,
            vec![
                ("dcat", "http://www.w3.org/ns/dcat#"),
                ("xas", "https://example.org/xas#"),
            ]
        );
    }

    #[test]
    fn test_external_vocabularies() {
        let ext = ExternalVocabularies::new().with_authority("skos");
        assert!(ext.is_external("schema"));
        assert!(!ext.is_external("skos"));
        assert!(!ext.is_external("xas"));
        assert_eq!(ext.external_prefix("schema:name"), Some("schema"));
        assert_eq!(ext.external_prefix("xas:edge"), None);
    }
}
