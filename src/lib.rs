//! # xasmap - Machine-Checkable XAS Metadata Mappings
//!
//! `xasmap` validates the deliverables of an X-ray absorption spectroscopy
//! metadata mapping: a SKOS glossary of the cross-domain vocabulary, the
//! table that maps XDI and NXxas fields onto it, one example linked-data
//! record, and one example XDI source file.
//!
//! ## Key Features
//!
//! - **SKOS Glossary Loading**: RDF/XML concepts keyed by compacted CURIE,
//!   with labels, definitions, notations and broader/narrower/related links.
//!
//! - **Flexible Mapping Tables**: CSV or TSV, header aliases, a `required`
//!   convention column, and canonical re-serialization.
//!
//! - **Cross-Referencing**: every mapping target must resolve to a glossary
//!   concept or to a recognized external vocabulary (schema.org, DCAT, PROV, ...).
//!
//! - **Example Checks**: the JSON-LD instance and the XDI source file are
//!   checked against the mapping table in both directions.
//!
//! - **Deterministic Reports**: errors, then warnings, then passed checks,
//!   as text, colored text or JSON.
//!
//! ## Quick Start
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
//!
//! println!("{}", report);
//! if report.has_failures() {
//!     eprintln!("{} checks failed", report.failure_count());
//! }
//! ```
//!
//! ## Checking Pieces Individually
//!
//! ```rust,no_run
//! use xasmap::glossary::Glossary;
//! use xasmap::mapping::MappingTable;
//! use xasmap::namespace::{ExternalVocabularies, NamespaceMap};
//! use xasmap::validator::{check_cross_references, CheckResult};
//!
//! let glossary = Glossary::from_file("glossary.rdf", &NamespaceMap::with_defaults())?;
//! let table = MappingTable::from_file("mapping.csv")?;
//!
//! let results = check_cross_references(&glossary, table.records(), &ExternalVocabularies::new());
//! for (record, result) in table.iter().zip(&results) {
//!     if let CheckResult::Unresolved(target) = result {
//!         println!("row {}: {} does not resolve", record.row, target);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`glossary`]: SKOS RDF/XML loader and concept records
//! - [`mapping`]: mapping table loader and writer
//! - [`instance`]: JSON-LD flattening of the example instance
//! - [`xdi`]: XDI source file reader
//! - [`namespace`]: prefix map, CURIE handling, external vocabulary list
//! - [`validator`]: the checks and the report
//!
//! ## Report Rules
//!
//! | Rule | Severity | Meaning |
//! |------|----------|---------|
//! | ParseError | Error | An input is not well-formed |
//! | DuplicateIdentifierError | Error | Two glossary concepts share an identifier |
//! | MissingColumnError | Error | The mapping table lacks a required column |
//! | EmptyFieldError | Error | A mapping row has a blank required cell |
//! | DuplicateSourceField | Error | A source field is mapped twice |
//! | Unresolved | Error | A mapping target resolves nowhere |
//! | External | Warning | A mapping target belongs to an external vocabulary |
//! | UnmappedProperty | Error | An instance property has no mapping |
//! | MissingRequiredProperty | Error | A required mapping has no value in the instance |
//! | DanglingRelation | Warning | A glossary relation points nowhere |
//! | MissingXdiField | Warning | The XDI file lacks a required or recommended field |
//! | UnmappedSourceField | Warning | An XDI field has no mapping |
//! | SourceFieldNotRepresented | Warning | A mapped XDI field is absent from the instance |

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod glossary;
pub mod instance;
pub mod mapping;
pub mod namespace;
pub mod validator;
pub mod xdi;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::glossary::{ConceptRecord, Glossary, GlossaryError, RelationKind};
    pub use crate::instance::{ExampleInstance, InstanceError};
    pub use crate::mapping::{MappingError, MappingRecord, MappingTable, RowIssue};
    pub use crate::namespace::{ExternalVocabularies, NamespaceMap};
    pub use crate::validator::{
        check_cross_references, validate_example, validate_inputs, CheckResult, CheckStatus,
        ExampleFinding, ReportFormat, ValidationInputs, ValidationOptions, ValidationReport,
    };
    pub use crate::xdi::{XdiError, XdiFile};
}
