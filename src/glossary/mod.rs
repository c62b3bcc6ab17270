//! # Glossary Module
//!
//! Loads the machine-readable glossary, a SKOS vocabulary serialized as
//! RDF/XML, into an immutable set of [`ConceptRecord`]s keyed by identifier.
//!
//! Identifiers are the concept IRIs compacted against the namespace map
//! (for example `https://example.org/xas#elementSymbol` becomes
//! `xas:elementSymbol` when the document declares `xmlns:xas`). IRIs outside
//! every known namespace are kept verbatim.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use xasmap::glossary::Glossary;
//! use xasmap::namespace::NamespaceMap;
//!
//! let glossary = Glossary::from_file("glossary.rdf", &NamespaceMap::with_defaults())?;
//! if let Some(concept) = glossary.get("xas:elementSymbol") {
//!     println!("{}", concept);
//! }
//! # Ok::<(), xasmap::glossary::GlossaryError>(())
//! ```

mod concept;
mod error;
mod skos;

#[cfg(test)]
mod tests;

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::namespace::{ExternalVocabularies, NamespaceMap};

pub use concept::{ConceptRecord, RelationKind};
pub use error::GlossaryError;

/// A relation whose target is neither a glossary concept nor an external term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingRelation {
    /// Concept carrying the relation
    pub concept: String,
    /// Relation kind
    pub relation: RelationKind,
    /// Unresolved target identifier
    pub target: String,
}

/// The loaded vocabulary
#[derive(Debug, Clone)]
pub struct Glossary {
    concepts: BTreeMap<String, ConceptRecord>,
    notations: BTreeMap<String, String>,
    namespaces: NamespaceMap,
    schemes: Vec<String>,
}

impl Glossary {
    /// Load a SKOS RDF/XML file.
    ///
    /// `base` supplies prefix bindings that take precedence over the ones
    /// declared inside the document.
    pub fn from_file<P: AsRef<Path>>(path: P, base: &NamespaceMap) -> Result<Self, GlossaryError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let glossary = Self::from_reader(BufReader::new(file), base)?;
        info!(
            "Loaded {} concepts ({} schemes) from {}",
            glossary.len(),
            glossary.schemes.len(),
            path.display()
        );
        Ok(glossary)
    }

    /// Load SKOS RDF/XML from a reader
    pub fn from_reader<R: BufRead>(reader: R, base: &NamespaceMap) -> Result<Self, GlossaryError> {
        let parsed = skos::parse_rdf_xml(reader)?;

        let mut namespaces = base.clone();
        namespaces.merge_missing(&parsed.namespaces);

        let records = parsed
            .drafts
            .into_iter()
            .map(|draft| draft.into_record(&namespaces))
            .collect();

        let mut glossary = Self::from_records(records, namespaces)?;
        glossary.schemes = parsed.schemes;
        Ok(glossary)
    }

    /// Build a glossary from already-constructed records.
    ///
    /// Fails with [`GlossaryError::DuplicateIdentifier`] listing every
    /// repeated identifier; nothing is returned in that case.
    pub fn from_records(
        records: Vec<ConceptRecord>,
        namespaces: NamespaceMap,
    ) -> Result<Self, GlossaryError> {
        let mut concepts = BTreeMap::new();
        let mut duplicates: Vec<String> = Vec::new();

        for record in records {
            match concepts.entry(record.identifier.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                Entry::Occupied(_) => {
                    if !duplicates.contains(&record.identifier) {
                        duplicates.push(record.identifier);
                    }
                }
            }
        }

        if !duplicates.is_empty() {
            return Err(GlossaryError::DuplicateIdentifier(duplicates));
        }

        let mut notations = BTreeMap::new();
        for concept in concepts.values() {
            for notation in &concept.notations {
                if notations
                    .insert(notation.clone(), concept.identifier.clone())
                    .is_some()
                {
                    debug!("Notation '{}' is shared by several concepts", notation);
                }
            }
        }

        Ok(Self {
            concepts,
            notations,
            namespaces,
            schemes: Vec::new(),
        })
    }

    /// Concept with the given identifier
    pub fn get(&self, identifier: &str) -> Option<&ConceptRecord> {
        self.concepts.get(identifier)
    }

    /// Returns true if a concept with this identifier exists
    pub fn contains(&self, identifier: &str) -> bool {
        self.concepts.contains_key(identifier)
    }

    /// Concept carrying the given `skos:notation`
    pub fn find_by_notation(&self, notation: &str) -> Option<&ConceptRecord> {
        self.notations
            .get(notation)
            .and_then(|identifier| self.concepts.get(identifier))
    }

    /// Resolve a normalized reference by identifier, then by notation
    pub fn resolve(&self, reference: &str) -> Option<&ConceptRecord> {
        self.get(reference)
            .or_else(|| self.find_by_notation(reference))
    }

    /// Iterate over concepts in identifier order
    pub fn concepts(&self) -> impl Iterator<Item = &ConceptRecord> {
        self.concepts.values()
    }

    /// Number of concepts
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Returns true if the glossary has no concepts
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Namespace map used to assign identifiers (base bindings plus the
    /// document's own declarations)
    pub fn namespaces(&self) -> &NamespaceMap {
        &self.namespaces
    }

    /// Concept scheme IRIs declared in the file
    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }

    /// Broader / narrower / related targets that resolve nowhere
    pub fn find_dangling_relations(&self, external: &ExternalVocabularies) -> Vec<DanglingRelation> {
        let mut dangling = Vec::new();
        for concept in self.concepts.values() {
            for (relation, target) in concept.relations() {
                if self.contains(target) || external.external_prefix(target).is_some() {
                    continue;
                }
                dangling.push(DanglingRelation {
                    concept: concept.identifier.clone(),
                    relation,
                    target: target.to_string(),
                });
            }
        }
        dangling
    }
}
