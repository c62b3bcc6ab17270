//! # Mapping Validation Module
//!
//! Loads the four inputs of a mapping deliverable and checks them against
//! each other, accumulating every finding into one [`ValidationReport`].
//!
//! ## Validation Checklist
//!
//! 1. **Glossary**: SKOS file parses, identifiers are unique, relations resolve
//! 2. **Mapping Table**: required columns present, no blank cells, no repeated source fields
//! 3. **Cross-References**: every mapping target resolves to a concept or an external vocabulary
//! 4. **Example Instance**: every property is mapped, every required mapping is present
//! 5. **Source Coverage**: the example XDI file is covered by the mapping table
//!
//! A file that fails to load is reported as a failed check; the steps that
//! need it are skipped with a warning and the rest still run.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use xasmap::validator::{validate_inputs, ValidationInputs, ValidationOptions};
//!
//! let inputs = ValidationInputs::new(
//!     "glossary.rdf",
//!     "mapping.csv",
//!     "example.jsonld",
//!     "cu_metal_rt.xdi",
//! );
//! let report = validate_inputs(&inputs, &ValidationOptions::default());
//! println!("{}", report);
//! std::process::exit(report.exit_code());
//! ```

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::glossary::{Glossary, GlossaryError};
use crate::instance::{ExampleInstance, InstanceError};
use crate::mapping::{MappingError, MappingTable, RowIssue};
use crate::namespace::{ExternalVocabularies, NamespaceMap};
use crate::xdi::{XdiError, XdiFile};

pub use crossref::{canonical_target, check_cross_references, resolve_target, CheckResult};
pub use example::{validate_example, ExampleFinding};
pub use report::{CheckStatus, Location, ReportFormat, ReportInput, ValidationCheck, ValidationReport};
pub use source::{check_source_coverage, SourceFinding, XDI_FORMAT};

mod crossref;
mod example;
mod report;
mod source;

/// Errors that stop one input from loading
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Glossary could not be loaded
    #[error("Glossary error: {0}")]
    Glossary(#[from] GlossaryError),

    /// Mapping table could not be loaded
    #[error("Mapping table error: {0}")]
    Mapping(#[from] MappingError),

    /// Example instance could not be loaded
    #[error("Example instance error: {0}")]
    Instance(#[from] InstanceError),

    /// Example source file could not be loaded
    #[error("Source file error: {0}")]
    Source(#[from] XdiError),
}

impl ValidationError {
    /// Report rule name for the failure
    pub fn rule(&self) -> &'static str {
        match self {
            ValidationError::Glossary(GlossaryError::DuplicateIdentifier(_)) => "DuplicateIdentifierError",
            ValidationError::Mapping(MappingError::MissingColumn(_)) => "MissingColumnError",
            ValidationError::Glossary(GlossaryError::IoError(_))
            | ValidationError::Mapping(MappingError::IoError(_))
            | ValidationError::Instance(InstanceError::IoError(_))
            | ValidationError::Source(XdiError::IoError(_)) => "IoError",
            _ => "ParseError",
        }
    }
}

/// Paths of the four inputs of a run
#[derive(Debug, Clone)]
pub struct ValidationInputs {
    /// SKOS glossary (RDF/XML)
    pub glossary: PathBuf,
    /// Mapping table (CSV/TSV)
    pub mapping: PathBuf,
    /// Example instance (JSON-LD)
    pub instance: PathBuf,
    /// Example source file (XDI)
    pub source: PathBuf,
}

impl ValidationInputs {
    /// Bundle the four input paths
    pub fn new(
        glossary: impl Into<PathBuf>,
        mapping: impl Into<PathBuf>,
        instance: impl Into<PathBuf>,
        source: impl Into<PathBuf>,
    ) -> Self {
        Self {
            glossary: glossary.into(),
            mapping: mapping.into(),
            instance: instance.into(),
            source: source.into(),
        }
    }
}

/// Settings for a run
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Base prefix bindings; take precedence over the glossary's own
    pub namespaces: NamespaceMap,
    /// Recognized external vocabularies
    pub external: ExternalVocabularies,
    /// Mapping table delimiter; detected from the extension when unset
    pub delimiter: Option<u8>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            namespaces: NamespaceMap::with_defaults(),
            external: ExternalVocabularies::new(),
            delimiter: None,
        }
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn load_failed(report: &mut ValidationReport, role: &str, file: &str, err: &ValidationError) {
    warn!("Failed to load {} {}: {}", role, file, err);
    report.add_check(
        ValidationCheck::failed(err.rule(), format!("{} failed to load", role), err.to_string())
            .at(Location::file(file)),
    );
}

fn skipped(report: &mut ValidationReport, rule: &str, missing: &[&str]) {
    report.add_check(ValidationCheck::warning(
        rule,
        "Skipped",
        format!("requires {} which failed to load", missing.join(" and ")),
    ));
}

fn load_glossary(path: &Path, options: &ValidationOptions) -> Result<Glossary, ValidationError> {
    Ok(Glossary::from_file(path, &options.namespaces)?)
}

fn load_mapping(path: &Path, options: &ValidationOptions) -> Result<MappingTable, ValidationError> {
    let table = match options.delimiter {
        Some(delimiter) => MappingTable::from_file_with_delimiter(path, delimiter)?,
        None => MappingTable::from_file(path)?,
    };
    Ok(table)
}

fn load_instance(path: &Path, namespaces: &NamespaceMap) -> Result<ExampleInstance, ValidationError> {
    Ok(ExampleInstance::from_file(path, namespaces)?)
}

fn load_source(path: &Path) -> Result<XdiFile, ValidationError> {
    Ok(XdiFile::from_file(path)?)
}

fn row_issue_check(issue: &RowIssue, mapping_file: &str) -> ValidationCheck {
    let (rule, name) = match issue {
        RowIssue::EmptyField { column, .. } => ("EmptyFieldError", column.clone()),
        RowIssue::DuplicateSourceField { source_field, .. } => {
            ("DuplicateSourceField", source_field.clone())
        }
    };
    ValidationCheck::failed(rule, name, issue.to_string()).at(Location::line(mapping_file, issue.row()))
}

/// Run the full pipeline: load every input, then run every check whose
/// inputs loaded.
pub fn validate_inputs(inputs: &ValidationInputs, options: &ValidationOptions) -> ValidationReport {
    let mut report = ValidationReport::new();
    let glossary_file = display(&inputs.glossary);
    let mapping_file = display(&inputs.mapping);
    let instance_file = display(&inputs.instance);
    let source_file = display(&inputs.source);

    report.add_input("glossary", &glossary_file);
    report.add_input("mapping", &mapping_file);
    report.add_input("instance", &instance_file);
    report.add_input("source", &source_file);

    // 1. Glossary
    let glossary = match load_glossary(&inputs.glossary, options) {
        Ok(glossary) => {
            report.add_check(
                ValidationCheck::ok("GlossaryLoaded", format!("{} concepts", glossary.len()))
                    .at(Location::file(&glossary_file)),
            );
            crossref::check_glossary_relations(&glossary, &options.external, &glossary_file, &mut report);
            Some(glossary)
        }
        Err(e) => {
            load_failed(&mut report, "glossary", &glossary_file, &e);
            None
        }
    };

    // Prefixes declared by the glossary apply to the other inputs too
    let namespaces = glossary
        .as_ref()
        .map_or_else(|| options.namespaces.clone(), |g| g.namespaces().clone());

    // 2. Mapping table
    let table = match load_mapping(&inputs.mapping, options) {
        Ok(table) => {
            report.add_check(
                ValidationCheck::ok("MappingLoaded", format!("{} records", table.len()))
                    .at(Location::file(&mapping_file)),
            );
            for issue in table.issues() {
                report.add_check(row_issue_check(issue, &mapping_file));
            }
            Some(table)
        }
        Err(e) => {
            load_failed(&mut report, "mapping table", &mapping_file, &e);
            None
        }
    };

    // 3. Cross-references
    match (&glossary, &table) {
        (Some(glossary), Some(table)) => crossref::check_mapping_targets(
            glossary,
            table.records(),
            &options.external,
            &mapping_file,
            &mut report,
        ),
        _ => skipped(
            &mut report,
            "Resolved",
            &missing(&[("glossary", glossary.is_some()), ("mapping table", table.is_some())]),
        ),
    }

    // 4. Example instance
    let instance = match load_instance(&inputs.instance, &namespaces) {
        Ok(instance) => Some(instance),
        Err(e) => {
            load_failed(&mut report, "example instance", &instance_file, &e);
            None
        }
    };
    match (&instance, &table) {
        (Some(instance), Some(table)) => example::check_example_instance(
            instance,
            table.records(),
            &namespaces,
            glossary.as_ref(),
            &instance_file,
            &mapping_file,
            &mut report,
        ),
        _ => skipped(
            &mut report,
            "UnmappedProperty",
            &missing(&[("example instance", instance.is_some()), ("mapping table", table.is_some())]),
        ),
    }

    // 5. Source coverage
    let source = match load_source(&inputs.source) {
        Ok(source) => Some(source),
        Err(e) => {
            load_failed(&mut report, "source file", &source_file, &e);
            None
        }
    };
    match (&source, &table, &instance) {
        (Some(source), Some(table), Some(instance)) => source::check_source_file(
            source,
            table.records(),
            instance,
            &namespaces,
            glossary.as_ref(),
            &source_file,
            &mut report,
        ),
        _ => skipped(
            &mut report,
            "SourceCoverage",
            &missing(&[
                ("source file", source.is_some()),
                ("mapping table", table.is_some()),
                ("example instance", instance.is_some()),
            ]),
        ),
    }

    info!(
        "Validation finished: {} passed, {} warnings, {} failed",
        report.success_count(),
        report.warning_count(),
        report.failure_count()
    );
    report
}

fn missing<'a>(inputs: &[(&'a str, bool)]) -> Vec<&'a str> {
    inputs
        .iter()
        .filter(|(_, loaded)| !loaded)
        .map(|(role, _)| *role)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_report_display() {
        let mut report = ValidationReport::new();
        report.add_check(ValidationCheck::ok("Resolved", "Test check 1"));
        report.add_check(ValidationCheck::warning("External", "Test check 2", "This is a warning"));
        report.add_check(ValidationCheck::failed("Unresolved", "Test check 3", "This failed"));

        let output = format!("{}", report);
        assert!(output.contains("✓"));
        assert!(output.contains("⚠"));
        assert!(output.contains("✗"));
        assert!(output.contains("1 passed, 1 warnings, 1 failed"));
    }

    #[test]
    fn test_missing_inputs_are_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = ValidationInputs::new(
            dir.path().join("glossary.rdf"),
            dir.path().join("mapping.csv"),
            dir.path().join("example.jsonld"),
            dir.path().join("source.xdi"),
        );

        let report = validate_inputs(&inputs, &ValidationOptions::default());

        assert_eq!(report.failure_count(), 4);
        assert!(report.checks.iter().all(|c| c.rule == "IoError" || c.name == "Skipped"));
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.inputs.len(), 4);
    }

    #[test]
    fn test_error_rule_names() {
        let err = ValidationError::from(GlossaryError::DuplicateIdentifier(vec!["xas:a".to_string()]));
        assert_eq!(err.rule(), "DuplicateIdentifierError");
        let err = ValidationError::from(MappingError::MissingColumn("target property".to_string()));
        assert_eq!(err.rule(), "MissingColumnError");
        let err = ValidationError::from(XdiError::ParseError {
            line: 1,
            message: "empty file".to_string(),
        });
        assert_eq!(err.rule(), "ParseError");
    }
}
