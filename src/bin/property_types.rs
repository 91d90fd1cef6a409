//! Property datatype CLI
//!
//! Look up property datatypes and regenerate the seed snapshot.
//!
//! # Usage
//!
//! ```bash
//! # Resolve datatypes (seed first, then the API)
//! property_types get P31 P2044
//!
//! # Refresh a few properties online and write a new seed
//! property_types export --refresh P2044 P2048 -o data/property_types.tsv
//!
//! # Against a different Wikibase
//! WIKIBASE_API_URL=https://test.wikidata.org/w/api.php property_types get P10
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;

use property_types::{PropertyId, PropertyTypes, RegistryConfig};

#[derive(Parser)]
#[command(name = "property_types")]
#[command(version)]
#[command(about = "Resolve knowledge-base property datatypes and export the seed snapshot")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base API URL (overrides WIKIBASE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Extra snapshot file merged over the built-in seed
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the datatype of one or more properties
    Get {
        /// Property ids, e.g. P31
        #[arg(required = true)]
        properties: Vec<PropertyId>,
    },

    /// Write the registry contents as a snapshot
    Export {
        /// Output file (stdout if not provided)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Look these properties up online before exporting, even if already known
        #[arg(long, num_args = 1..)]
        refresh: Vec<PropertyId>,
    },
}

#[derive(Serialize)]
struct Resolution<'a> {
    property: &'a PropertyId,
    datatype: Option<String>,
    iri: Option<String>,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = RegistryConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url);
    }

    let mut registry =
        PropertyTypes::with_config(config).context("Failed to create HTTP client")?;

    if let Some(path) = &cli.snapshot {
        let file = File::open(path)
            .with_context(|| format!("Failed to open snapshot {}", path.display()))?;
        let merged = registry
            .load_snapshot(file)
            .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
        tracing::info!(entries = merged, path = %path.display(), "Merged snapshot");
    }

    match cli.command {
        Commands::Get { properties } => cmd_get(&mut registry, &properties, cli.format),
        Commands::Export { output, refresh } => cmd_export(&mut registry, output, &refresh),
    }
}

fn cmd_get(
    registry: &mut PropertyTypes,
    properties: &[PropertyId],
    format: OutputFormat,
) -> Result<()> {
    let resolutions: Vec<Resolution> = properties
        .iter()
        .map(|property| {
            let datatype = registry.get_type(property);
            Resolution {
                property,
                datatype: datatype.map(|dt| dt.token().to_string()),
                iri: datatype.map(|dt| dt.iri()),
            }
        })
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&resolutions)?);
        }
        OutputFormat::Text => {
            for r in &resolutions {
                match &r.datatype {
                    Some(token) => println!("{}\t{}", r.property, token.green()),
                    None => println!("{}\t{}", r.property, "unresolved".yellow()),
                }
            }
        }
    }

    Ok(())
}

fn cmd_export(
    registry: &mut PropertyTypes,
    output: Option<PathBuf>,
    refresh: &[PropertyId],
) -> Result<()> {
    for property in refresh {
        if registry.refresh(property).is_none() {
            eprintln!("{} {} could not be refreshed", "warning:".yellow().bold(), property);
        }
    }

    let written = match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            let written = registry.export_snapshot(&mut writer)?;
            writer.flush()?;
            written
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            registry.export_snapshot(&mut lock)?
        }
    };

    if let Some(path) = output {
        eprintln!("Wrote {} entries to {}", written, path.display());
    }

    Ok(())
}
