use anyhow::{Context, Result};
use log::info;
use std::io;
use std::path::PathBuf;

use xasmap::mapping::{delimiter_for_path, MappingTable};

use super::config::Config;

/// Rewrite a mapping table with canonical headers.
///
/// Files get the delimiter their extension calls for; stdout keeps the
/// input's delimiter.
pub fn run(mapping: PathBuf, output: Option<PathBuf>, config: &Config) -> Result<()> {
    let table = match config.mapping.delimiter_byte()? {
        Some(delimiter) => MappingTable::from_file_with_delimiter(&mapping, delimiter),
        None => MappingTable::from_file(&mapping),
    }
    .with_context(|| format!("Failed to load mapping table: {}", mapping.display()))?;

    for issue in table.issues() {
        eprintln!("Skipped {}", issue);
    }

    match output {
        Some(path) => {
            let table = table.with_delimiter(delimiter_for_path(&path));
            table
                .to_file(&path)
                .with_context(|| format!("Failed to write mapping table: {}", path.display()))?;
            info!("Wrote {} records to {}", table.len(), path.display());
        }
        None => {
            table
                .write_to(io::stdout().lock())
                .context("Failed to write mapping table")?;
        }
    }

    Ok(())
}
