//! Merge command implementation.

use crate::error::CliError;
use clap::ValueEnum;
use sdfidx_core::{
    merge, AcceptAll, CarbonSizeFilter, ChiralCarbonFilter, MergeConfig, MergeInput, MergeMode,
    MergeReport, RecordFilter,
};
use std::path::PathBuf;
use tracing::info;

/// Record filter selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterKind {
    /// Records containing `C` and longer than `--min-length` bytes.
    CarbonSize,
    /// Molecules with at least `--min-chiral` chiral carbons.
    Chiral,
    /// Every record.
    All,
}

impl FilterKind {
    /// Builds the filter with the given thresholds.
    pub fn build(self, min_length: usize, min_chiral: usize) -> Box<dyn RecordFilter> {
        match self {
            Self::CarbonSize => Box::new(CarbonSizeFilter::new(min_length)),
            Self::Chiral => Box::new(ChiralCarbonFilter::new(min_chiral)),
            Self::All => Box::new(AcceptAll),
        }
    }
}

/// Parsed merge options.
#[derive(Debug)]
pub struct MergeArgs {
    /// JSON configuration file.
    pub config: Option<PathBuf>,
    /// Input pairs given with `--input`.
    pub inputs: Vec<MergeInput>,
    /// Output record file.
    pub output: Option<PathBuf>,
    /// Output index file.
    pub output_index: Option<PathBuf>,
    /// Filter to apply.
    pub filter: FilterKind,
    /// Carbon-size threshold.
    pub min_length: usize,
    /// Chiral carbon minimum.
    pub min_chiral: usize,
    /// Use streaming mode.
    pub streaming: bool,
}

impl MergeArgs {
    /// Builds the merge configuration. Command-line paths override the file.
    fn into_config(self) -> Result<MergeConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| CliError::Config {
                    path: path.display().to_string(),
                    source,
                })?;
                MergeConfig::from_json(&json)?
            }
            None => {
                let output = self.output.clone().ok_or(CliError::MissingArgument("--output"))?;
                let output_index = self
                    .output_index
                    .clone()
                    .ok_or(CliError::MissingArgument("--output-index"))?;
                MergeConfig::new(output, output_index)
            }
        };

        if let Some(output) = self.output {
            config.output_records = output;
        }
        if let Some(output_index) = self.output_index {
            config.output_index = output_index;
        }
        config.inputs.extend(self.inputs);
        if self.streaming {
            config.mode = MergeMode::Streaming;
        }

        Ok(config)
    }

    fn record_filter(&self) -> Box<dyn RecordFilter> {
        self.filter.build(self.min_length, self.min_chiral)
    }
}

/// Runs the merge command.
pub fn run(args: MergeArgs, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter = args.record_filter();
    let config = args.into_config()?;

    info!(
        "Merging {} input(s) into {:?}",
        config.inputs.len(),
        config.output_records
    );
    let report = merge(&config, filter.as_ref())?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text_output(&report);
    }

    Ok(())
}

fn print_text_output(report: &MergeReport) {
    println!("Merge Summary");
    println!("=============");
    println!("Inputs:          {}", report.inputs);
    println!("Records read:    {}", report.records_read);
    println!("Records kept:    {}", report.records_kept);
    if report.offsets_without_record > 0 {
        println!("Empty offsets:   {}", report.offsets_without_record);
    }
    println!();
    println!("✓ records written: {}", report.output_records.display());
    println!("✓ index written: {}", report.output_index.display());
}
