use std::collections::HashSet;

use serde::Serialize;

use crate::glossary::Glossary;
use crate::instance::ExampleInstance;
use crate::mapping::MappingRecord;
use crate::namespace::NamespaceMap;

use super::crossref::canonical_target;
use super::report::Location;
use super::{ValidationCheck, ValidationReport};

/// Mismatch between the example instance and the mapping table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExampleFinding {
    /// Instance property that no mapping record targets
    UnmappedProperty {
        /// Normalized property reference
        key: String,
        /// JSON pointer of its first occurrence
        pointer: String,
    },
    /// Required record whose target is absent from the instance
    MissingRequiredProperty {
        /// Normalized target reference
        target: String,
        /// Source field of the record
        source_field: String,
        /// Mapping table row
        row: usize,
    },
}

/// Check the instance against the mapping table.
///
/// Both checks always run; findings are unmapped properties in instance key
/// order followed by missing required properties in table order. With a
/// glossary, targets written as notations or IRIs compare by concept.
pub fn validate_example(
    instance: &ExampleInstance,
    records: &[MappingRecord],
    namespaces: &NamespaceMap,
    glossary: Option<&Glossary>,
) -> Vec<ExampleFinding> {
    let targets: HashSet<String> = records
        .iter()
        .map(|r| canonical_target(&r.target_property, namespaces, glossary))
        .collect();

    let mut findings = Vec::new();

    for key in instance.keys() {
        if !targets.contains(key) {
            let pointer = instance
                .occurrence(key)
                .map(|p| p.pointer.clone())
                .unwrap_or_default();
            findings.push(ExampleFinding::UnmappedProperty {
                key: key.to_string(),
                pointer,
            });
        }
    }

    for record in records.iter().filter(|r| r.required) {
        let target = canonical_target(&record.target_property, namespaces, glossary);
        if !instance.contains(&target) {
            findings.push(ExampleFinding::MissingRequiredProperty {
                target,
                source_field: record.source_field.clone(),
                row: record.row,
            });
        }
    }

    findings
}

/// Step 4: example instance against the mapping table
pub(crate) fn check_example_instance(
    instance: &ExampleInstance,
    records: &[MappingRecord],
    namespaces: &NamespaceMap,
    glossary: Option<&Glossary>,
    instance_file: &str,
    mapping_file: &str,
    report: &mut ValidationReport,
) {
    let findings = validate_example(instance, records, namespaces, glossary);

    let unmapped = findings
        .iter()
        .filter(|f| matches!(f, ExampleFinding::UnmappedProperty { .. }))
        .count();
    let missing = findings.len() - unmapped;

    for finding in findings {
        let check = match finding {
            ExampleFinding::UnmappedProperty { key, pointer } => ValidationCheck::failed(
                "UnmappedProperty",
                key,
                "instance property is not the target of any mapping record",
            )
            .at(Location::pointer(instance_file, pointer)),
            ExampleFinding::MissingRequiredProperty {
                target,
                source_field,
                row,
            } => ValidationCheck::failed(
                "MissingRequiredProperty",
                target,
                format!("required mapping for '{}' has no value in the instance", source_field),
            )
            .at(Location::line(mapping_file, row)),
        };
        report.add_check(check);
    }

    if unmapped == 0 {
        report.add_check(
            ValidationCheck::ok(
                "UnmappedProperty",
                format!("All {} instance properties are mapped", instance.keys().len()),
            )
            .at(Location::file(instance_file)),
        );
    }
    if missing == 0 {
        let required = records.iter().filter(|r| r.required).count();
        report.add_check(
            ValidationCheck::ok(
                "MissingRequiredProperty",
                format!("All {} required properties present", required),
            )
            .at(Location::file(instance_file)),
        );
    }
}
