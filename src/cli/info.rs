use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use xasmap::glossary::Glossary;
use xasmap::instance::ExampleInstance;
use xasmap::mapping::MappingTable;
use xasmap::xdi::XdiFile;

use super::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Glossary,
    Mapping,
    Instance,
    Source,
}

fn input_kind(path: &Path) -> Option<InputKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "rdf" | "xml" | "owl" | "skos" => Some(InputKind::Glossary),
        "csv" | "tsv" | "tab" => Some(InputKind::Mapping),
        "json" | "jsonld" => Some(InputKind::Instance),
        "xdi" => Some(InputKind::Source),
        _ => None,
    }
}

/// Display information about one input file
pub fn run(file: PathBuf, config: &Config) -> Result<()> {
    if !file.exists() {
        bail!("File does not exist: {}", file.display());
    }
    let Some(kind) = input_kind(&file) else {
        bail!(
            "Cannot tell the input kind of {} (expected .rdf, .csv, .tsv, .jsonld or .xdi)",
            file.display()
        );
    };
    let options = config.validation_options()?;

    match kind {
        InputKind::Glossary => {
            let glossary = Glossary::from_file(&file, &options.namespaces)
                .with_context(|| format!("Failed to load glossary: {}", file.display()))?;

            println!("Glossary Information");
            println!("====================");
            println!("File: {}", file.display());
            println!("Concepts: {}", glossary.len());
            for scheme in glossary.schemes() {
                println!("Scheme: {}", scheme);
            }
            println!();

            println!("Namespaces:");
            for (prefix, iri) in glossary.namespaces().iter() {
                println!("  {:8} {}", prefix, iri);
            }
            println!();

            println!("Concepts:");
            for concept in glossary.concepts() {
                println!("  {}", concept);
            }

            let dangling = glossary.find_dangling_relations(&options.external);
            if !dangling.is_empty() {
                println!();
                println!("Dangling relations:");
                for relation in dangling {
                    println!("  {} {} {}", relation.concept, relation.relation, relation.target);
                }
            }
        }
        InputKind::Mapping => {
            let table = match options.delimiter {
                Some(delimiter) => MappingTable::from_file_with_delimiter(&file, delimiter),
                None => MappingTable::from_file(&file),
            }
            .with_context(|| format!("Failed to load mapping table: {}", file.display()))?;

            let required = table.iter().filter(|r| r.required).count();
            println!("Mapping Table Information");
            println!("=========================");
            println!("File: {}", file.display());
            println!("Records: {} ({} required)", table.len(), required);
            println!();

            println!("Records:");
            for record in table.iter() {
                println!("  {:4}. {}", record.row, record);
            }

            if !table.issues().is_empty() {
                println!();
                println!("Skipped rows:");
                for issue in table.issues() {
                    println!("  {}", issue);
                }
            }
        }
        InputKind::Instance => {
            let instance = ExampleInstance::from_file(&file, &options.namespaces)
                .with_context(|| format!("Failed to load example instance: {}", file.display()))?;

            println!("Example Instance Information");
            println!("============================");
            println!("File: {}", file.display());
            println!(
                "Properties: {} ({} distinct)",
                instance.len(),
                instance.keys().len()
            );
            println!();

            for property in instance.properties() {
                let value_preview = if property.value.chars().count() > 60 {
                    let head: String = property.value.chars().take(60).collect();
                    format!("{}...", head)
                } else {
                    property.value.clone()
                };
                println!("  {} = {}  ({})", property.key, value_preview, property.pointer);
            }
        }
        InputKind::Source => {
            let xdi = XdiFile::from_file(&file)
                .with_context(|| format!("Failed to load XDI file: {}", file.display()))?;

            println!("XDI File Information");
            println!("====================");
            println!("File: {}", file.display());
            println!("Version: {} {}", xdi.version, xdi.extra_versions.join(" "));
            println!("Element: {}", xdi.element_symbol().unwrap_or("<missing>"));
            println!("Edge: {}", xdi.edge().unwrap_or("<missing>"));
            println!("Data: {} arrays x {} points", xdi.narrays(), xdi.npts());
            println!();

            println!("Fields:");
            for field in &xdi.fields {
                println!("  {:3}. {}: {}", field.line, field.name(), field.value);
            }

            if !xdi.columns.is_empty() {
                println!();
                println!("Columns:");
                for column in &xdi.columns {
                    match &column.units {
                        Some(units) => println!("  {:3}. {} ({})", column.index, column.label, units),
                        None => println!("  {:3}. {}", column.index, column.label),
                    }
                }
            }
        }
    }

    Ok(())
}
