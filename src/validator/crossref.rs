use serde::Serialize;

use crate::glossary::{ConceptRecord, Glossary};
use crate::mapping::MappingRecord;
use crate::namespace::{ExternalVocabularies, NamespaceMap};

use super::report::Location;
use super::{ValidationCheck, ValidationReport};

/// Outcome of resolving one mapping target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "reference", rename_all = "snake_case")]
pub enum CheckResult {
    /// Resolved to the glossary concept with this identifier
    Ok(String),
    /// Term of a recognized external vocabulary (the prefix)
    External(String),
    /// Neither a glossary concept nor an external term (the reference as written)
    Unresolved(String),
}

impl CheckResult {
    /// Returns true for [`CheckResult::Unresolved`]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, CheckResult::Unresolved(_))
    }
}

/// Resolve one target reference
pub fn resolve_target(
    glossary: &Glossary,
    target: &str,
    external: &ExternalVocabularies,
) -> CheckResult {
    let target = target.trim();
    let normalized = glossary.namespaces().normalize(target);

    if let Some(concept) = lookup(glossary, &normalized, target) {
        return CheckResult::Ok(concept.identifier.clone());
    }
    if let Some(prefix) = external.external_prefix(&normalized) {
        return CheckResult::External(prefix.to_string());
    }
    CheckResult::Unresolved(target.to_string())
}

fn lookup<'g>(glossary: &'g Glossary, normalized: &str, raw: &str) -> Option<&'g ConceptRecord> {
    glossary.resolve(normalized).or_else(|| glossary.resolve(raw))
}

/// Form of a mapping target that instance keys are compared against.
///
/// A target that resolves to a glossary concept (by CURIE, IRI or notation)
/// becomes the concept identifier; anything else stays normalized.
pub fn canonical_target(target: &str, namespaces: &NamespaceMap, glossary: Option<&Glossary>) -> String {
    let target = target.trim();
    let normalized = namespaces.normalize(target);
    glossary
        .and_then(|g| lookup(g, &normalized, target))
        .map(|concept| concept.identifier.clone())
        .unwrap_or(normalized)
}

/// Resolve every record's target, one result per record in input order
pub fn check_cross_references(
    glossary: &Glossary,
    records: &[MappingRecord],
    external: &ExternalVocabularies,
) -> Vec<CheckResult> {
    records
        .iter()
        .map(|record| resolve_target(glossary, &record.target_property, external))
        .collect()
}

/// Step 3: cross-reference mapping targets against the glossary
pub(crate) fn check_mapping_targets(
    glossary: &Glossary,
    records: &[MappingRecord],
    external: &ExternalVocabularies,
    mapping_file: &str,
    report: &mut ValidationReport,
) {
    let results = check_cross_references(glossary, records, external);

    for (record, result) in records.iter().zip(results) {
        let name = format!("{} -> {}", record.source_field, record.target_property);
        let check = match result {
            CheckResult::Ok(identifier) if identifier == record.target_property => {
                ValidationCheck::ok("Resolved", name)
            }
            CheckResult::Ok(identifier) => {
                ValidationCheck::ok("Resolved", format!("{} ({})", name, identifier))
            }
            CheckResult::External(prefix) => ValidationCheck::warning(
                "External",
                name,
                format!("term of external vocabulary '{}', not checked against the glossary", prefix),
            ),
            CheckResult::Unresolved(reference) => ValidationCheck::failed(
                "Unresolved",
                name,
                format!(
                    "'{}' is neither a glossary concept nor a term of a recognized external vocabulary",
                    reference
                ),
            ),
        };
        report.add_check(check.at(Location::line(mapping_file, record.row)));
    }
}

/// Glossary self-consistency: broader / narrower / related targets must resolve
pub(crate) fn check_glossary_relations(
    glossary: &Glossary,
    external: &ExternalVocabularies,
    glossary_file: &str,
    report: &mut ValidationReport,
) {
    let dangling = glossary.find_dangling_relations(external);
    if dangling.is_empty() {
        report.add_check(
            ValidationCheck::ok("DanglingRelation", "All concept relations resolve")
                .at(Location::file(glossary_file)),
        );
        return;
    }
    for relation in dangling {
        report.add_check(
            ValidationCheck::warning(
                "DanglingRelation",
                relation.concept.clone(),
                format!("{} target '{}' is not a known concept", relation.relation, relation.target),
            )
            .at(Location::file(glossary_file)),
        );
    }
}
