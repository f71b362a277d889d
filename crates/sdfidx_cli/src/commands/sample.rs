//! Sample command implementation.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sdfidx_core::{sample_matching, sample_record, ChiralCarbonFilter, Molecule};
use std::path::Path;
use tracing::{info, warn};

/// Sampling options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleOptions {
    /// List the chiral carbons of the sampled molecule.
    pub chiral: bool,
    /// Redraw until a molecule with at least this many chiral carbons turns up.
    pub min_chiral: Option<usize>,
    /// Draws allowed when `min_chiral` is set.
    pub attempts: usize,
    /// Seed for reproducible sampling.
    pub seed: Option<u64>,
}

/// Runs the sample command.
pub fn run(
    input: &Path,
    index: &Path,
    options: SampleOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let sampled = match options.min_chiral {
        Some(min_chiral) => {
            let filter = ChiralCarbonFilter::new(min_chiral);
            sample_matching(input, index, &filter, options.attempts, &mut rng)?
        }
        None => sample_record(input, index, &mut rng)?,
    };
    let Some(record) = sampled else {
        match options.min_chiral {
            Some(min_chiral) => warn!(
                attempts = options.attempts,
                min_chiral, "No sampled molecule had enough chiral carbons"
            ),
            None => warn!("Sampled offset holds no record"),
        }
        return Ok(());
    };
    info!(offset = ?record.source_offset(), "Sampled record");

    print!("{}", record.text());

    if options.chiral {
        let mut mol = Molecule::from_record(&record)?;
        mol.hydrogenate();
        let Some(chiral) = mol.chiral_carbons_bounded(ChiralCarbonFilter::DEFAULT_MAX_STEPS)
        else {
            println!();
            println!("Chiral carbons: search limit reached");
            return Ok(());
        };
        let chiral_atoms: Vec<String> = chiral
            .into_iter()
            .map(|atom| (atom + 1).to_string())
            .collect();
        println!();
        println!("Chiral carbons: {}", chiral_atoms.len());
        if !chiral_atoms.is_empty() {
            println!("  Atoms: {}", chiral_atoms.join(", "));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn samples_with_seed() {
        let dir = tempdir().unwrap();
        let sdf = dir.path().join("in.sdf");
        let idx = dir.path().join("in.index");
        std::fs::write(&sdf, "foo\n$$$$\nbar\n$$$$\n").unwrap();
        std::fs::write(&idx, "0\n9\n").unwrap();

        let options = SampleOptions {
            seed: Some(7),
            ..SampleOptions::default()
        };
        assert!(run(&sdf, &idx, options).is_ok());
    }

    #[test]
    fn chiral_on_non_molecule_fails() {
        let dir = tempdir().unwrap();
        let sdf = dir.path().join("in.sdf");
        let idx = dir.path().join("in.index");
        std::fs::write(&sdf, "foo\n$$$$\n").unwrap();
        std::fs::write(&idx, "0\n").unwrap();

        let options = SampleOptions {
            chiral: true,
            seed: Some(1),
            ..SampleOptions::default()
        };
        assert!(run(&sdf, &idx, options).is_err());
    }

    #[test]
    fn empty_index_fails() {
        let dir = tempdir().unwrap();
        let sdf = dir.path().join("in.sdf");
        let idx = dir.path().join("in.index");
        std::fs::write(&sdf, "foo\n$$$$\n").unwrap();
        std::fs::write(&idx, "").unwrap();

        assert!(run(&sdf, &idx, SampleOptions::default()).is_err());
    }

    #[test]
    fn retries_until_chiral_minimum_is_met() {
        let dir = tempdir().unwrap();
        let sdf = dir.path().join("in.sdf");
        let idx = dir.path().join("in.index");
        std::fs::write(&sdf, "foo\n$$$$\n").unwrap();
        std::fs::write(&idx, "0\n").unwrap();

        // A record that never parses as a molecule exhausts the attempts.
        let options = SampleOptions {
            chiral: true,
            min_chiral: Some(1),
            attempts: 5,
            seed: Some(3),
        };
        assert!(run(&sdf, &idx, options).is_ok());
    }
}
