/// Fatal errors that can occur while loading a mapping table
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// I/O error reading or writing the table
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV/TSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Missing required column in the header row
    #[error("Missing required mapping column: {0}")]
    MissingColumn(String),
}

/// Row-level problems that skip the row but let loading continue
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowIssue {
    /// A required cell is blank
    #[error("row {row}: empty '{column}' cell")]
    EmptyField {
        /// 1-based line number
        row: usize,
        /// Canonical column name
        column: String,
    },

    /// The same source field is mapped twice within one source format
    #[error("row {row}: source field '{source_field}' already mapped on row {first_row}")]
    DuplicateSourceField {
        /// 1-based line number of the repeated row
        row: usize,
        /// 1-based line number of the first occurrence
        first_row: usize,
        /// The repeated source field
        source_field: String,
    },
}

impl RowIssue {
    /// Line number the issue refers to
    pub fn row(&self) -> usize {
        match self {
            RowIssue::EmptyField { row, .. } | RowIssue::DuplicateSourceField { row, .. } => *row,
        }
    }
}
