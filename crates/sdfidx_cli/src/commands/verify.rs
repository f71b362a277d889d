//! Verify command implementation.

use crate::error::CliError;
use sdfidx_core::{verify_index, VerifyReport};
use std::path::Path;

/// Runs the verify command.
///
/// Fails with [`CliError::VerificationFailed`] when the index is invalid.
pub fn run(input: &Path, index: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let report = verify_index(input, index)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Verifying {:?} against {:?}", index, input);
        println!();
        print_text_output(&report);
        println!();
    }

    if report.is_valid() {
        if format != "json" {
            println!("✓ Index verification passed");
        }
        Ok(())
    } else {
        if format != "json" {
            println!("✗ Index verification failed");
        }
        Err(CliError::VerificationFailed.into())
    }
}

fn print_text_output(report: &VerifyReport) {
    println!("  Offsets in index:  {}", report.offsets);
    println!("  Records in file:   {}", report.records_in_file);
    match report.layout {
        Some(layout) => println!("  Layout:            {}", layout.as_str()),
        None => println!("  Layout:            partial or mixed"),
    }
    if report.end_of_file_offsets > 0 {
        println!("  End-of-file offsets: {}", report.end_of_file_offsets);
    }

    if !report.malformed_lines.is_empty() {
        println!("  Malformed lines:   {}", join(&report.malformed_lines));
    }
    if !report.out_of_order.is_empty() {
        println!("  Out of order at:   {}", join(&report.out_of_order));
    }
    if !report.past_end.is_empty() {
        println!("  Past end of file:  {}", join(&report.past_end));
    }
    if !report.misaligned.is_empty() {
        println!("  Misaligned:        {}", join(&report.misaligned));
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn valid_and_invalid_indexes() {
        let dir = tempdir().unwrap();
        let sdf = dir.path().join("in.sdf");
        let good = dir.path().join("good.index");
        let bad = dir.path().join("bad.index");
        std::fs::write(&sdf, "foo\nbar\n$$$$\nbaz\n$$$$\n").unwrap();
        std::fs::write(&good, "0\n13\n").unwrap();
        std::fs::write(&bad, "0\n5\n").unwrap();

        assert!(run(&sdf, &good, "text").is_ok());
        assert!(run(&sdf, &bad, "json").is_err());
    }

    #[test]
    fn join_values() {
        assert_eq!(join(&[1u64, 2, 3]), "1, 2, 3");
        assert_eq!(join::<u64>(&[]), "");
    }
}
