//! Index command implementation.

use sdfidx_core::{build_filtered_index, build_index, IndexConfig, OffsetLayout, RecordFilter};
use std::path::Path;
use tracing::info;

/// Runs the index command.
///
/// With a filter, only records it accepts get an offset. The offsets still
/// point into `input`.
pub fn run(
    input: &Path,
    output: &Path,
    layout: OffsetLayout,
    filter: Option<&dyn RecordFilter>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Indexing {:?}", input);

    let config = IndexConfig::new().layout(layout);
    let summary = match filter {
        Some(filter) => build_filtered_index(input, output, &config, filter)?,
        None => build_index(input, output, &config)?,
    };

    println!(
        "  {} records, {} offsets ({})",
        summary.records,
        summary.offsets_written,
        summary.layout.as_str()
    );
    if filter.is_some() {
        println!("  {} records rejected by filter", summary.records_rejected);
    }
    println!("index written: {}", output.display());

    Ok(())
}
