use serde::Serialize;

use crate::glossary::Glossary;
use crate::instance::ExampleInstance;
use crate::mapping::MappingRecord;
use crate::namespace::NamespaceMap;
use crate::xdi::{XdiFile, RECOMMENDED_XDI_FIELDS, REQUIRED_XDI_FIELDS};

use super::crossref::canonical_target;
use super::report::Location;
use super::{ValidationCheck, ValidationReport};

/// Source format name used to select applicable mapping records
pub const XDI_FORMAT: &str = "XDI";

/// Mismatch between the example source file and the mapping table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceFinding {
    /// A field the XDI grammar requires or recommends is absent
    MissingXdiField {
        /// `family.keyword`
        field: String,
        /// Required (true) or only recommended
        required: bool,
    },
    /// Source field present in the file with no mapping record
    UnmappedSourceField {
        /// `family.keyword`
        field: String,
        /// Line in the source file
        line: usize,
    },
    /// Mapped source field whose target is absent from the instance
    SourceFieldNotRepresented {
        /// `family.keyword`
        field: String,
        /// Normalized target reference
        target: String,
        /// Line in the source file
        line: usize,
    },
}

/// Check the XDI file against the mapping table and the instance.
///
/// Required records are not reported here; the instance check already
/// flags them as missing.
pub fn check_source_coverage(
    xdi: &XdiFile,
    records: &[MappingRecord],
    instance: &ExampleInstance,
    namespaces: &NamespaceMap,
    glossary: Option<&Glossary>,
) -> Vec<SourceFinding> {
    let mut findings = Vec::new();

    let structural = REQUIRED_XDI_FIELDS
        .iter()
        .map(|f| (*f, true))
        .chain(RECOMMENDED_XDI_FIELDS.iter().map(|f| (*f, false)));
    for (field, required) in structural {
        if !xdi.has_field(field) {
            findings.push(SourceFinding::MissingXdiField {
                field: field.to_string(),
                required,
            });
        }
    }

    for field in &xdi.fields {
        let name = field.name();
        let record = records
            .iter()
            .filter(|r| r.applies_to(XDI_FORMAT))
            .find(|r| r.source_field.eq_ignore_ascii_case(&name));

        match record {
            None if field.family == "column" => {}
            None => findings.push(SourceFinding::UnmappedSourceField {
                field: name,
                line: field.line,
            }),
            Some(record) if record.required => {}
            Some(record) => {
                let target = canonical_target(&record.target_property, namespaces, glossary);
                if !instance.contains(&target) {
                    findings.push(SourceFinding::SourceFieldNotRepresented {
                        field: name,
                        target,
                        line: field.line,
                    });
                }
            }
        }
    }

    findings
}

/// Step 5: example source file coverage
pub(crate) fn check_source_file(
    xdi: &XdiFile,
    records: &[MappingRecord],
    instance: &ExampleInstance,
    namespaces: &NamespaceMap,
    glossary: Option<&Glossary>,
    source_file: &str,
    report: &mut ValidationReport,
) {
    let findings = check_source_coverage(xdi, records, instance, namespaces, glossary);
    if findings.is_empty() {
        report.add_check(
            ValidationCheck::ok(
                "SourceCoverage",
                format!("All {} source fields are mapped and represented", xdi.fields.len()),
            )
            .at(Location::file(source_file)),
        );
        return;
    }

    for finding in findings {
        let check = match finding {
            SourceFinding::MissingXdiField { field, required: true } => ValidationCheck::warning(
                "MissingXdiField",
                field,
                "required XDI header field is absent",
            )
            .at(Location::file(source_file)),
            SourceFinding::MissingXdiField { field, required: false } => ValidationCheck::warning(
                "MissingXdiField",
                field,
                "recommended XDI header field is absent",
            )
            .at(Location::file(source_file)),
            SourceFinding::UnmappedSourceField { field, line } => ValidationCheck::warning(
                "UnmappedSourceField",
                field,
                "source field has no mapping record",
            )
            .at(Location::line(source_file, line)),
            SourceFinding::SourceFieldNotRepresented { field, target, line } => {
                ValidationCheck::warning(
                    "SourceFieldNotRepresented",
                    field,
                    format!("mapped to '{}' but the instance has no such property", target),
                )
                .at(Location::line(source_file, line))
            }
        };
        report.add_check(check);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glossary::ConceptRecord;

    const XDI: &str = "# XDI/1.0
# Column.1: energy eV
# Element.symbol: Cu
# Element.edge: K
# Mono.d_spacing: 3.13555
# Sample.temperature: 295
# Facility.name: APS
#----
8979.0
";

    fn records() -> Vec<MappingRecord> {
        vec![
            MappingRecord::new("element.symbol", "xas:elementSymbol").required(),
            MappingRecord::new("element.edge", "xas:absorptionEdge").required(),
            MappingRecord::new("mono.d_spacing", "xas:dSpacing"),
            MappingRecord::new("facility.name", "schema:name").with_format("NXxas"),
            MappingRecord::new("sample.temperature", "xas:temperature").with_format("XDI"),
        ]
    }

    #[test]
    fn test_source_coverage() {
        let xdi = XdiFile::from_reader(XDI.as_bytes()).unwrap();
        let instance = ExampleInstance::from_pairs([("xas:elementSymbol", "Cu"), ("xas:temperature", "295")]);

        let findings = check_source_coverage(&xdi, &records(), &instance, &NamespaceMap::with_defaults(), None);
        assert_eq!(
            findings,
            vec![
                SourceFinding::SourceFieldNotRepresented {
                    field: "mono.d_spacing".to_string(),
                    target: "xas:dSpacing".to_string(),
                    line: 5,
                },
                SourceFinding::UnmappedSourceField {
                    field: "facility.name".to_string(),
                    line: 7,
                },
            ]
        );
    }

    #[test]
    fn test_missing_structural_fields() {
        let xdi = XdiFile::from_reader("# XDI/1.0\n# Element.symbol: Fe\n".as_bytes()).unwrap();
        let instance = ExampleInstance::from_pairs([("xas:elementSymbol", "Fe")]);

        let findings = check_source_coverage(&xdi, &records(), &instance, &NamespaceMap::new(), None);
        assert_eq!(
            findings,
            vec![
                SourceFinding::MissingXdiField {
                    field: "element.edge".to_string(),
                    required: true,
                },
                SourceFinding::MissingXdiField {
                    field: "mono.d_spacing".to_string(),
                    required: false,
                },
            ]
        );
    }

    #[test]
    fn test_report_severity() {
        let xdi = XdiFile::from_reader("# XDI/1.0\n# Element.symbol: Fe\n# Scan.mode: step\n".as_bytes()).unwrap();
        let instance = ExampleInstance::from_pairs([("xas:elementSymbol", "Fe")]);
        let mut report = ValidationReport::new();

        check_source_file(&xdi, &records(), &instance, &NamespaceMap::new(), None, "fe.xdi", &mut report);

        assert!(!report.has_failures());
        assert_eq!(report.warning_count(), 3);
        let unmapped = report.checks_for_rule("UnmappedSourceField").next().unwrap();
        assert_eq!(unmapped.location, Some(Location::line("fe.xdi", 3)));
    }

    #[test]
    fn test_notation_target_is_represented() {
        let namespaces = NamespaceMap::with_defaults().with("xas", "https://example.org/xas#");
        let glossary = Glossary::from_records(
            vec![ConceptRecord {
                notations: vec!["d-spacing".to_string()],
                ..ConceptRecord::new("xas:dSpacing", "https://example.org/xas#dSpacing")
            }],
            namespaces.clone(),
        )
        .unwrap();
        let xdi = XdiFile::from_reader(
            "# XDI/1.0\n# Element.symbol: Cu\n# Element.edge: K\n# Mono.d_spacing: 3.13555\n".as_bytes(),
        )
        .unwrap();
        let records = vec![
            MappingRecord::new("element.symbol", "xas:elementSymbol").required(),
            MappingRecord::new("element.edge", "xas:absorptionEdge").required(),
            MappingRecord::new("mono.d_spacing", "d-spacing"),
        ];
        let instance = ExampleInstance::from_pairs([("xas:dSpacing", "3.13555")]);

        let findings = check_source_coverage(&xdi, &records, &instance, &namespaces, Some(&glossary));
        assert!(findings.is_empty(), "{:?}", findings);
    }
}
