//! Inspect command implementation.

use super::format_size;
use sdfidx_core::{inspect_records, RecordFileStats};
use serde::Serialize;
use std::path::Path;

/// Record file inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Record file path.
    pub path: String,
    /// Statistics gathered by scanning the file.
    #[serde(flatten)]
    pub stats: RecordFileStats,
}

/// Runs the inspect command.
pub fn run(input: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = InspectResult {
        path: input.display().to_string(),
        stats: inspect_records(input)?,
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_text_output(&result);
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    let stats = &result.stats;
    println!("Record File: {}", result.path);
    println!("==========================================");
    println!();
    println!("Size:            {}", format_size(stats.file_size));
    println!("Records:         {}", stats.records);
    if stats.records > 0 {
        println!("Smallest record: {}", format_size(stats.smallest));
        println!("Largest record:  {}", format_size(stats.largest));
        println!("Mean record:     {:.1} B", stats.mean);
    }
    if stats.unterminated_tail {
        println!();
        println!("! Last record has no $$$$ delimiter");
    }
}
