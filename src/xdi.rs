//! # XDI Source Files
//!
//! Reader for the XAS Data Interchange text format, the source side of the
//! mapping table. Only what the mapping checks need is interpreted:
//! the version line, `Family.keyword: value` header fields, `Column.N`
//! declarations, the free-comment block, and the numeric data table.
//!
//! ```text
//! # XDI/1.0 GSE/1.0
//! # Column.1: energy eV
//! # Column.2: i0
//! # Element.symbol: Cu
//! # Element.edge: K
//! # ///
//! # Cu foil, room temperature
//! #----
//! # energy i0
//!   8779.0  149013.7
//! ```
//!
//! Family and keyword names are case-insensitive and stored lower-cased,
//! so `Element.symbol` is addressed as `element.symbol`.
//!
//! Reference: <https://github.com/XraySpectroscopy/XAS-Data-Interchange>

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

/// Fields every XDI file must declare
pub const REQUIRED_XDI_FIELDS: &[&str] = &["element.symbol", "element.edge"];

/// Fields an XDI file should declare
pub const RECOMMENDED_XDI_FIELDS: &[&str] = &["mono.d_spacing"];

/// Errors that can occur while reading an XDI file
#[derive(Debug, thiserror::Error)]
pub enum XdiError {
    /// I/O error reading the file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file does not follow the XDI grammar
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// Description of the problem
        message: String,
    },
}

fn parse_error(line: usize, message: impl Into<String>) -> XdiError {
    XdiError::ParseError {
        line,
        message: message.into(),
    }
}

/// A `Family.keyword: value` header field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XdiField {
    /// Lower-cased family name
    pub family: String,
    /// Lower-cased keyword
    pub keyword: String,
    /// Raw value
    pub value: String,
    /// 1-based line number
    pub line: usize,
}

impl XdiField {
    /// `family.keyword`
    pub fn name(&self) -> String {
        format!("{}.{}", self.family, self.keyword)
    }
}

/// A `Column.N` declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XdiColumn {
    /// 1-based column index
    pub index: usize,
    /// Array label (e.g. "energy")
    pub label: String,
    /// Units (e.g. "eV")
    pub units: Option<String>,
}

/// A parsed XDI file
#[derive(Debug, Clone, Default, Serialize)]
pub struct XdiFile {
    /// XDI specification version (e.g. "1.0")
    pub version: String,
    /// Additional application version tokens from the first line
    pub extra_versions: Vec<String>,
    /// Header fields in file order
    pub fields: Vec<XdiField>,
    /// Column declarations ordered by index
    pub columns: Vec<XdiColumn>,
    /// Free-text comment lines between `# ///` and `#---`
    pub comments: Vec<String>,
    /// Labels from the line following `#---`, if present
    pub column_labels: Vec<String>,
    /// Numeric data rows
    pub data: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Comments,
    Labels,
    Data,
}

impl XdiFile {
    /// Read an XDI file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, XdiError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let xdi = Self::from_reader(BufReader::new(file))?;
        info!(
            "Loaded XDI {} with {} fields, {} arrays x {} points from {}",
            xdi.version,
            xdi.fields.len(),
            xdi.narrays(),
            xdi.npts(),
            path.display()
        );
        Ok(xdi)
    }

    /// Parse XDI text from a reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, XdiError> {
        let mut xdi = XdiFile::default();
        let mut section = Section::Header;
        let mut seen_version = false;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let lineno = index + 1;
            let line = if index == 0 {
                line.trim_start_matches('\u{feff}')
            } else {
                line.as_str()
            };
            let trimmed = line.trim();

            if !seen_version {
                if trimmed.is_empty() {
                    continue;
                }
                xdi.parse_version(trimmed, lineno)?;
                seen_version = true;
                continue;
            }

            if trimmed.is_empty() {
                continue;
            }

            match trimmed.strip_prefix('#') {
                Some(body) => {
                    let body = body.trim();
                    if section == Section::Data {
                        return Err(parse_error(lineno, "comment line inside data table"));
                    }
                    if body.starts_with("---") {
                        section = Section::Labels;
                    } else if body.starts_with("///") {
                        section = Section::Comments;
                    } else {
                        match section {
                            Section::Header if body.is_empty() => {}
                            Section::Header => xdi.parse_field(body, lineno)?,
                            Section::Comments => xdi.comments.push(body.to_string()),
                            Section::Labels => {
                                xdi.column_labels =
                                    body.split_whitespace().map(str::to_string).collect();
                            }
                            Section::Data => {}
                        }
                    }
                }
                None => {
                    section = Section::Data;
                    xdi.parse_row(trimmed, lineno)?;
                }
            }
        }

        if !seen_version {
            return Err(parse_error(1, "empty file"));
        }

        xdi.columns.sort_by_key(|c| c.index);
        if !xdi.columns.is_empty() && xdi.narrays() > 0 && xdi.columns.len() != xdi.narrays() {
            debug!(
                "{} Column.N declarations for {} data columns",
                xdi.columns.len(),
                xdi.narrays()
            );
        }
        Ok(xdi)
    }

    fn parse_version(&mut self, line: &str, lineno: usize) -> Result<(), XdiError> {
        let body = line
            .strip_prefix('#')
            .map(str::trim)
            .ok_or_else(|| parse_error(lineno, "first line must be '# XDI/<version>'"))?;
        let mut tokens = body.split_whitespace();
        let version = tokens
            .next()
            .and_then(|t| t.strip_prefix("XDI/"))
            .filter(|v| !v.is_empty())
            .ok_or_else(|| parse_error(lineno, format!("not an XDI version line: '{}'", line)))?;

        self.version = version.to_string();
        self.extra_versions = tokens.map(str::to_string).collect();
        Ok(())
    }

    fn parse_field(&mut self, body: &str, lineno: usize) -> Result<(), XdiError> {
        let (name, value) = body
            .split_once(':')
            .ok_or_else(|| parse_error(lineno, format!("expected 'Family.keyword: value', got '{}'", body)))?;
        let (family, keyword) = name
            .trim()
            .split_once('.')
            .filter(|(f, k)| !f.is_empty() && !k.is_empty() && !f.contains(char::is_whitespace))
            .ok_or_else(|| parse_error(lineno, format!("invalid field name '{}'", name.trim())))?;

        let family = family.to_lowercase();
        let keyword = keyword.trim().to_lowercase();
        let value = value.trim().to_string();

        if family == "column" {
            let index = keyword
                .parse::<usize>()
                .map_err(|_| parse_error(lineno, format!("invalid column index '{}'", keyword)))?;
            let mut parts = value.split_whitespace();
            let label = parts.next().unwrap_or_default().to_string();
            let units = parts.next().map(|u| u.split("||").next().unwrap_or(u).trim().to_string());
            self.columns.push(XdiColumn { index, label, units });
        }

        self.fields.push(XdiField {
            family,
            keyword,
            value,
            line: lineno,
        });
        Ok(())
    }

    fn parse_row(&mut self, line: &str, lineno: usize) -> Result<(), XdiError> {
        let row = line
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<f64>()
                    .map_err(|_| parse_error(lineno, format!("non-numeric value '{}'", token)))
            })
            .collect::<Result<Vec<f64>, XdiError>>()?;

        if let Some(first) = self.data.first() {
            if first.len() != row.len() {
                return Err(parse_error(
                    lineno,
                    format!("expected {} values, found {}", first.len(), row.len()),
                ));
            }
        }
        self.data.push(row);
        Ok(())
    }

    /// Header field by `family.keyword` (case-insensitive)
    pub fn field(&self, name: &str) -> Option<&XdiField> {
        let name = name.to_lowercase();
        let (family, keyword) = name.split_once('.')?;
        self.fields
            .iter()
            .find(|f| f.family == family && f.keyword == keyword)
    }

    /// Returns true if the header declares the field
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Value of a header field
    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name).map(|f| f.value.as_str())
    }

    /// Absorbing element symbol
    pub fn element_symbol(&self) -> Option<&str> {
        self.value("element.symbol")
    }

    /// Absorption edge
    pub fn edge(&self) -> Option<&str> {
        self.value("element.edge")
    }

    /// Monochromator d-spacing in Angstrom
    pub fn d_spacing(&self) -> Option<f64> {
        self.value("mono.d_spacing").and_then(|v| v.parse().ok())
    }

    /// Number of data points
    pub fn npts(&self) -> usize {
        self.data.len()
    }

    /// Number of data arrays (columns)
    pub fn narrays(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// Column of values for the array with the given label
    pub fn array(&self, label: &str) -> Option<Vec<f64>> {
        let position = self
            .columns
            .iter()
            .position(|c| c.label.eq_ignore_ascii_case(label))
            .or_else(|| {
                self.column_labels
                    .iter()
                    .position(|l| l.eq_ignore_ascii_case(label))
            })?;
        self.data.iter().map(|row| row.get(position).copied()).collect()
    }
}
