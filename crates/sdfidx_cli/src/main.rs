//! SDFIDX CLI
//!
//! Command-line tools for indexing and merging SDF record files.
//!
//! # Commands
//!
//! - `index` - Write a byte-offset index for a record file
//! - `merge` - Filter indexed record files into one re-indexed file
//! - `verify` - Check an index against its record file
//! - `sample` - Print a randomly chosen indexed record, optionally retrying
//!   until a molecule with enough chiral carbons turns up
//! - `inspect` - Display record file statistics

mod commands;
mod error;

use clap::{Parser, Subcommand, ValueEnum};
use commands::merge::{FilterKind, MergeArgs};
use commands::sample::SampleOptions;
use sdfidx_core::{MergeInput, OffsetLayout};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SDF record file indexing and merging tools.
#[derive(Parser)]
#[command(name = "sdfidx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a byte-offset index for a record file
    Index {
        /// Record file to index
        input: PathBuf,

        /// Index file to write
        output: PathBuf,

        /// Which offsets to record
        #[arg(short, long, value_enum, default_value_t = LayoutArg::RecordStarts)]
        layout: LayoutArg,

        /// Only index records this filter accepts
        #[arg(short, long, value_enum, default_value_t = FilterKind::All)]
        filter: FilterKind,

        /// Length threshold for the carbon-size filter
        #[arg(long, default_value_t = sdfidx_core::CarbonSizeFilter::DEFAULT_MIN_LEN)]
        min_length: usize,

        /// Minimum chiral carbon count for the chiral filter
        #[arg(long, default_value_t = sdfidx_core::ChiralCarbonFilter::DEFAULT_MIN_CHIRAL)]
        min_chiral: usize,
    },

    /// Filter indexed record files into one re-indexed file
    Merge {
        /// JSON merge configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Input pair as RECORDS=INDEX (repeatable)
        #[arg(short, long, value_parser = parse_input_pair)]
        input: Vec<MergeInput>,

        /// Output record file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output index file
        #[arg(long)]
        output_index: Option<PathBuf>,

        /// Record filter to apply
        #[arg(short, long, value_enum, default_value_t = FilterKind::CarbonSize)]
        filter: FilterKind,

        /// Length threshold for the carbon-size filter
        #[arg(long, default_value_t = sdfidx_core::CarbonSizeFilter::DEFAULT_MIN_LEN)]
        min_length: usize,

        /// Minimum chiral carbon count for the chiral filter
        #[arg(long, default_value_t = sdfidx_core::ChiralCarbonFilter::DEFAULT_MIN_CHIRAL)]
        min_chiral: usize,

        /// Filter and write each record as soon as it is read
        #[arg(short, long)]
        streaming: bool,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check an index against its record file
    Verify {
        /// Record file
        input: PathBuf,

        /// Index file
        index: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print a randomly chosen indexed record
    Sample {
        /// Record file
        input: PathBuf,

        /// Index file
        index: PathBuf,

        /// Also list the chiral carbons of the sampled molecule
        #[arg(short, long)]
        chiral: bool,

        /// Redraw until a molecule has at least this many chiral carbons
        #[arg(long)]
        min_chiral: Option<usize>,

        /// Draws allowed with --min-chiral
        #[arg(long, default_value_t = 5, requires = "min_chiral")]
        attempts: usize,

        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Display record file statistics
    Inspect {
        /// Record file
        input: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    RecordStarts,
    AfterDelimiter,
}

impl From<LayoutArg> for OffsetLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::RecordStarts => OffsetLayout::RecordStarts,
            LayoutArg::AfterDelimiter => OffsetLayout::AfterDelimiter,
        }
    }
}

fn parse_input_pair(value: &str) -> Result<MergeInput, error::CliError> {
    match value.split_once('=') {
        Some((records, index)) if !records.is_empty() && !index.is_empty() => {
            Ok(MergeInput::new(records, index))
        }
        _ => Err(error::CliError::InvalidInputPair(value.to_string())),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Index {
            input,
            output,
            layout,
            filter,
            min_length,
            min_chiral,
        } => {
            let filter = (filter != FilterKind::All).then(|| filter.build(min_length, min_chiral));
            commands::index::run(&input, &output, layout.into(), filter.as_deref())?;
        }
        Commands::Merge {
            config,
            input,
            output,
            output_index,
            filter,
            min_length,
            min_chiral,
            streaming,
            format,
        } => {
            let args = MergeArgs {
                config,
                inputs: input,
                output,
                output_index,
                filter,
                min_length,
                min_chiral,
                streaming,
            };
            commands::merge::run(args, &format)?;
        }
        Commands::Verify {
            input,
            index,
            format,
        } => {
            commands::verify::run(&input, &index, &format)?;
        }
        Commands::Sample {
            input,
            index,
            chiral,
            min_chiral,
            attempts,
            seed,
        } => {
            let options = SampleOptions {
                chiral,
                min_chiral,
                attempts,
                seed,
            };
            commands::sample::run(&input, &index, options)?;
        }
        Commands::Inspect { input, format } => {
            commands::inspect::run(&input, &format)?;
        }
        Commands::Version => {
            println!("SDFIDX CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("SDFIDX Core v{}", sdfidx_core::VERSION);
        }
    }

    Ok(())
}
