use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use log::{debug, info, warn};

use super::{MappingError, MappingRecord, RowIssue};

/// Canonical header names, in the order they are written back
pub const CANONICAL_HEADERS: [&str; 5] = [
    "source format",
    "source field",
    "target property",
    "required",
    "note",
];

const SOURCE_FIELD_ALIASES: &[&str] = &["source field", "source", "field", "source field name"];
const TARGET_ALIASES: &[&str] = &[
    "target property",
    "target",
    "property",
    "target property reference",
];
const NOTE_ALIASES: &[&str] = &["note", "notes", "transformation note", "transformation", "comment"];
const REQUIRED_ALIASES: &[&str] = &["required", "mandatory"];
const FORMAT_ALIASES: &[&str] = &["source format", "format"];

/// Truthy spellings of the `required` convention column
const REQUIRED_MARKERS: &[&str] = &["yes", "y", "true", "1", "x", "required", "mandatory"];

/// Pick the delimiter from the file extension: tab for `.tsv`/`.tab`, comma otherwise
pub fn delimiter_for_path(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("tsv") | Some("tab") => b'\t',
        _ => b',',
    }
}

/// Interpret a `required` cell
pub fn parse_required_flag(value: &str) -> bool {
    let value = value.trim();
    REQUIRED_MARKERS
        .iter()
        .any(|marker| value.eq_ignore_ascii_case(marker))
}

fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|h| aliases.contains(&h.as_str()))
}

#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    source_field: usize,
    target_property: usize,
    note: Option<usize>,
    required: Option<usize>,
    source_format: Option<usize>,
}

impl ColumnLayout {
    fn detect(headers: &[String]) -> Result<Self, MappingError> {
        let source_field = find_column(headers, SOURCE_FIELD_ALIASES);
        let target_property = find_column(headers, TARGET_ALIASES);

        match (source_field, target_property) {
            (Some(source_field), Some(target_property)) => Ok(Self {
                source_field,
                target_property,
                note: find_column(headers, NOTE_ALIASES),
                required: find_column(headers, REQUIRED_ALIASES),
                source_format: find_column(headers, FORMAT_ALIASES),
            }),
            (None, Some(_)) => Err(MappingError::MissingColumn("source field".to_string())),
            (Some(_), None) => Err(MappingError::MissingColumn("target property".to_string())),
            (None, None) => Err(MappingError::MissingColumn(
                "source field, target property".to_string(),
            )),
        }
    }
}

/// The loaded mapping table: records in input order plus row issues
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    records: Vec<MappingRecord>,
    issues: Vec<RowIssue>,
    delimiter: u8,
}

impl MappingTable {
    /// Build a table from records (comma-delimited when written)
    pub fn from_records(records: Vec<MappingRecord>) -> Self {
        Self {
            records,
            issues: Vec::new(),
            delimiter: b',',
        }
    }

    /// Load a CSV/TSV file, choosing the delimiter from its extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MappingError> {
        let path = path.as_ref();
        Self::from_file_with_delimiter(path, delimiter_for_path(path))
    }

    /// Load a file with an explicit delimiter
    pub fn from_file_with_delimiter<P: AsRef<Path>>(
        path: P,
        delimiter: u8,
    ) -> Result<Self, MappingError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let table = Self::from_reader(BufReader::new(file), delimiter)?;
        info!(
            "Loaded {} mapping records from {} ({} row issues)",
            table.len(),
            path.display(),
            table.issues.len()
        );
        Ok(table)
    }

    /// Parse a mapping table from a reader
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, MappingError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(normalize_header).collect();
        let layout = ColumnLayout::detect(&headers)?;
        debug!("Mapping table columns: {:?} -> {:?}", headers, layout);

        let mut records: Vec<MappingRecord> = Vec::new();
        let mut issues = Vec::new();
        let mut first_seen: HashMap<(Option<String>, String), usize> = HashMap::new();

        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            // Header is line 1; fall back to index arithmetic for readers without positions.
            let row = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(index + 2);

            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            let cell = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");
            let optional = |idx: Option<usize>| {
                idx.map(|i| cell(i))
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };

            let source_field = cell(layout.source_field);
            let target_property = cell(layout.target_property);

            let mut blank = false;
            for (value, column) in [(source_field, "source field"), (target_property, "target property")] {
                if value.is_empty() {
                    warn!("Mapping row {}: empty '{}' cell", row, column);
                    issues.push(RowIssue::EmptyField {
                        row,
                        column: column.to_string(),
                    });
                    blank = true;
                }
            }
            if blank {
                continue;
            }

            let source_format = optional(layout.source_format);
            let key = (
                source_format.as_ref().map(|f| f.to_lowercase()),
                source_field.to_lowercase(),
            );
            if let Some(&first_row) = first_seen.get(&key) {
                issues.push(RowIssue::DuplicateSourceField {
                    row,
                    first_row,
                    source_field: source_field.to_string(),
                });
                continue;
            }
            first_seen.insert(key, row);

            records.push(MappingRecord {
                source_format,
                source_field: source_field.to_string(),
                target_property: target_property.to_string(),
                note: optional(layout.note),
                required: layout.required.map_or(false, |i| parse_required_flag(cell(i))),
                row,
            });
        }

        Ok(Self {
            records,
            issues,
            delimiter,
        })
    }

    /// Write the records back with canonical headers
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), MappingError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        csv_writer.write_record(CANONICAL_HEADERS)?;
        for record in &self.records {
            csv_writer.write_record([
                record.source_format.as_deref().unwrap_or(""),
                record.source_field.as_str(),
                record.target_property.as_str(),
                if record.required { "yes" } else { "" },
                record.note.as_deref().unwrap_or(""),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the records to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), MappingError> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    /// Use a different delimiter when writing
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Records in input order
    pub fn records(&self) -> &[MappingRecord] {
        &self.records
    }

    /// Non-fatal row issues in input order
    pub fn issues(&self) -> &[RowIssue] {
        &self.issues
    }

    /// Field delimiter
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record was loaded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records
    pub fn iter(&self) -> impl Iterator<Item = &MappingRecord> {
        self.records.iter()
    }

    /// Records that apply to the named source format
    pub fn for_format<'a>(&'a self, format: &'a str) -> impl Iterator<Item = &'a MappingRecord> {
        self.records.iter().filter(move |r| r.applies_to(format))
    }
}
