use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use xasmap::validator::ReportFormat;

mod config;
mod info;
mod normalize;
mod validate;

/// xasmap - XAS metadata mapping validator
#[derive(Parser)]
#[command(name = "xasmap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Report output format.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON document
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a glossary, mapping table, example instance and source file together
    Validate {
        /// SKOS glossary (RDF/XML)
        #[arg(value_name = "GLOSSARY")]
        glossary: PathBuf,

        /// Mapping table (CSV or TSV)
        #[arg(value_name = "MAPPING")]
        mapping: PathBuf,

        /// Example instance (JSON-LD)
        #[arg(value_name = "INSTANCE")]
        instance: PathBuf,

        /// Example source file (XDI)
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Write the report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report format
        #[arg(short, long, default_value = "text", value_enum)]
        format: FormatArg,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Display a summary of one input file
    Info {
        /// Glossary, mapping table, instance or XDI file
        file: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Rewrite a mapping table with canonical headers
    Normalize {
        /// Input mapping table
        #[arg(value_name = "MAPPING")]
        mapping: PathBuf,

        /// Output path (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

fn load_config(path: Option<PathBuf>) -> Result<config::Config> {
    match path {
        Some(path) => config::Config::from_file(&path),
        None => Ok(config::Config::default()),
    }
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Validate {
            glossary,
            mapping,
            instance,
            source,
            output,
            format,
            config,
        } => {
            let config = load_config(config)?;
            validate::run(
                glossary,
                mapping,
                instance,
                source,
                output,
                ReportFormat::from(format),
                &config,
            )
        }
        Commands::Info { file, config } => info::run(file, &load_config(config)?),
        Commands::Normalize {
            mapping,
            output,
            config,
        } => normalize::run(mapping, output, &load_config(config)?),
    }
}
