use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// SKOS semantic relation between two concepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// skos:broader
    Broader,
    /// skos:narrower
    Narrower,
    /// skos:related
    Related,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationKind::Broader => "skos:broader",
            RelationKind::Narrower => "skos:narrower",
            RelationKind::Related => "skos:related",
        };
        f.write_str(name)
    }
}

/// A single glossary concept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRecord {
    /// Unique identifier (CURIE when the IRI falls under a known prefix)
    pub identifier: String,

    /// Absolute IRI from `rdf:about`
    pub iri: String,

    /// Preferred label
    pub pref_label: String,

    /// Alternative labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alt_labels: Vec<String>,

    /// Definition text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,

    /// `skos:notation` values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notations: Vec<String>,

    /// Identifiers of broader concepts
    #[serde(default)]
    pub broader: BTreeSet<String>,

    /// Identifiers of narrower concepts
    #[serde(default)]
    pub narrower: BTreeSet<String>,

    /// Identifiers of associatively related concepts
    #[serde(default)]
    pub related: BTreeSet<String>,

    /// Source vocabulary (concept scheme or namespace prefix)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<String>,
}

impl ConceptRecord {
    /// Create a concept with the given identifier and IRI
    pub fn new(identifier: &str, iri: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            iri: iri.to_string(),
            ..Default::default()
        }
    }

    /// Set the preferred label
    pub fn with_label(mut self, label: &str) -> Self {
        self.pref_label = label.to_string();
        self
    }

    /// Set the definition
    pub fn with_definition(mut self, definition: &str) -> Self {
        self.definition = Some(definition.to_string());
        self
    }

    /// Add a relation to another concept
    pub fn with_relation(mut self, kind: RelationKind, target: &str) -> Self {
        self.relations_mut(kind).insert(target.to_string());
        self
    }

    pub(crate) fn relations_mut(&mut self, kind: RelationKind) -> &mut BTreeSet<String> {
        match kind {
            RelationKind::Broader => &mut self.broader,
            RelationKind::Narrower => &mut self.narrower,
            RelationKind::Related => &mut self.related,
        }
    }

    /// All relations as `(kind, target)` pairs, grouped by kind
    pub fn relations(&self) -> impl Iterator<Item = (RelationKind, &str)> {
        self.broader
            .iter()
            .map(|t| (RelationKind::Broader, t.as_str()))
            .chain(self.narrower.iter().map(|t| (RelationKind::Narrower, t.as_str())))
            .chain(self.related.iter().map(|t| (RelationKind::Related, t.as_str())))
    }
}

impl fmt::Display for ConceptRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pref_label.is_empty() {
            write!(f, "[{}]", self.identifier)
        } else {
            write!(f, "[{}: {}]", self.identifier, self.pref_label)
        }
    }
}
