//! # Mapping Table Module
//!
//! The mapping table is the spreadsheet that pairs source-format fields
//! (XDI keywords, NXxas paths) with properties of the cross-domain
//! vocabulary. It is read as CSV or TSV with one header row.
//!
//! ## Columns
//!
//! | Column | Required | Aliases |
//! |--------|----------|---------|
//! | source field | Yes | source, field |
//! | target property | Yes | target, property |
//! | note | No | notes, transformation note, comment |
//! | required | No | mandatory |
//! | source format | No | format |
//!
//! Header names are matched case-insensitively; `_` and `-` count as spaces.
//! A missing required column aborts the load. A blank required cell or a
//! repeated source field only skips that row and is recorded as a
//! [`RowIssue`].

mod error;
mod record;
mod table;

#[cfg(test)]
mod tests;

pub use error::{MappingError, RowIssue};
pub use record::MappingRecord;
pub use table::{delimiter_for_path, parse_required_flag, MappingTable, CANONICAL_HEADERS};
