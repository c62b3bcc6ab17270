use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the mapping table: a source-format field and the vocabulary
/// property it maps to.
///
/// Row numbers are provenance only and do not take part in equality, so a
/// table that is written out and read back compares equal to the original.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingRecord {
    /// Source format the field belongs to (e.g. "XDI", "NXxas")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_format: Option<String>,

    /// Field name in the source format (e.g. "element.symbol")
    pub source_field: String,

    /// Target property reference (CURIE, dotted or absolute IRI)
    pub target_property: String,

    /// Free-text transformation note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Whether an example instance must carry the target property
    #[serde(default)]
    pub required: bool,

    /// 1-based line number in the source table (0 when built in code)
    #[serde(skip)]
    pub row: usize,
}

impl MappingRecord {
    /// Create a record mapping `source_field` to `target_property`
    pub fn new(source_field: &str, target_property: &str) -> Self {
        Self {
            source_field: source_field.to_string(),
            target_property: target_property.to_string(),
            ..Default::default()
        }
    }

    /// Set the source format
    pub fn with_format(mut self, format: &str) -> Self {
        self.source_format = Some(format.to_string());
        self
    }

    /// Set the transformation note
    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    /// Mark the record as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns true if the record applies to the named source format.
    /// Records without a format apply to every format.
    pub fn applies_to(&self, format: &str) -> bool {
        self.source_format
            .as_deref()
            .map_or(true, |f| f.eq_ignore_ascii_case(format))
    }
}

impl PartialEq for MappingRecord {
    fn eq(&self, other: &Self) -> bool {
        self.source_format == other.source_format
            && self.source_field == other.source_field
            && self.target_property == other.target_property
            && self.note == other.note
            && self.required == other.required
    }
}

impl Eq for MappingRecord {}

impl fmt::Display for MappingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(format) = &self.source_format {
            write!(f, "{}:", format)?;
        }
        write!(f, "{} -> {}", self.source_field, self.target_property)?;
        if self.required {
            write!(f, " (required)")?;
        }
        Ok(())
    }
}
