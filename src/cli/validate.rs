use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use xasmap::validator::{validate_inputs, ReportFormat, ValidationInputs};

use super::config::Config;

/// Validate the four inputs of a mapping deliverable
pub fn run(
    glossary: PathBuf,
    mapping: PathBuf,
    instance: PathBuf,
    source: PathBuf,
    output: Option<PathBuf>,
    format: ReportFormat,
    config: &Config,
) -> Result<()> {
    let options = config.validation_options()?;
    let inputs = ValidationInputs::new(glossary, mapping, instance, source);

    info!("xasmap Validator");
    info!("================");
    info!("Glossary: {}", inputs.glossary.display());
    info!("Mapping:  {}", inputs.mapping.display());
    info!("Instance: {}", inputs.instance.display());
    info!("Source:   {}", inputs.source.display());
    info!("External vocabularies: {}", options.external);

    let report = validate_inputs(&inputs, &options);

    match output {
        Some(path) => {
            report
                .write_to_path(&path, format)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => match format {
            ReportFormat::Json => println!("{}", report.to_json()?),
            ReportFormat::Text => {
                // Use colorized output if available
                #[cfg(feature = "colorized_output")]
                {
                    println!("{}", report.format_colored());
                }

                #[cfg(not(feature = "colorized_output"))]
                {
                    println!("{}", report);
                }
            }
        },
    }

    // Exit with error code if validation failed
    if report.has_failures() {
        std::process::exit(report.exit_code());
    }

    Ok(())
}
