//! Record selection predicates.
//!
//! The merge takes its selection rule as a [`RecordFilter`]. Any closure
//! `Fn(&Record) -> bool` is a filter; the types here cover the rules the
//! command line exposes.

use crate::molecule::Molecule;
use crate::record::Record;
use tracing::debug;

/// Decides whether a record is kept.
pub trait RecordFilter {
    /// Returns true if `record` should be kept.
    fn accepts(&self, record: &Record) -> bool;
}

impl<F> RecordFilter for F
where
    F: Fn(&Record) -> bool,
{
    fn accepts(&self, record: &Record) -> bool {
        self(record)
    }
}

/// Keeps the records accepted by `predicate`, in their original order.
#[must_use]
pub fn filter_records(records: Vec<Record>, predicate: &dyn RecordFilter) -> Vec<Record> {
    records
        .into_iter()
        .filter(|record| predicate.accepts(record))
        .collect()
}

/// Keeps every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl RecordFilter for AcceptAll {
    fn accepts(&self, _record: &Record) -> bool {
        true
    }
}

/// Keeps records that contain the byte `C` and are longer than a threshold.
///
/// This is an illustrative rule: a `C` anywhere in the record (header,
/// atom block or data items) satisfies it, so it is not a carbon test.
#[derive(Debug, Clone, Copy)]
pub struct CarbonSizeFilter {
    /// Records must be strictly longer than this many bytes.
    pub min_len: usize,
}

impl CarbonSizeFilter {
    /// Default length threshold.
    pub const DEFAULT_MIN_LEN: usize = 100;

    /// Creates a filter with the given length threshold.
    #[must_use]
    pub const fn new(min_len: usize) -> Self {
        Self { min_len }
    }
}

impl Default for CarbonSizeFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_LEN)
    }
}

impl RecordFilter for CarbonSizeFilter {
    fn accepts(&self, record: &Record) -> bool {
        record.contains(b'C') && record.len() > self.min_len
    }
}

/// Keeps records whose molecule has at least `min_chiral` chiral carbons.
///
/// Records that are not valid V2000 mol blocks are rejected, and so are
/// molecules whose chirality search exceeds `max_steps` branch comparisons.
#[derive(Debug, Clone, Copy)]
pub struct ChiralCarbonFilter {
    /// Minimum number of chiral carbons.
    pub min_chiral: usize,
    /// Branch comparison budget per molecule.
    pub max_steps: usize,
}

impl ChiralCarbonFilter {
    /// Default minimum number of chiral carbons.
    pub const DEFAULT_MIN_CHIRAL: usize = 3;

    /// Default branch comparison budget per molecule.
    pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

    /// Creates a filter with the given minimum.
    #[must_use]
    pub const fn new(min_chiral: usize) -> Self {
        Self {
            min_chiral,
            max_steps: Self::DEFAULT_MAX_STEPS,
        }
    }

    /// Sets the branch comparison budget.
    #[must_use]
    pub const fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Counts the chiral carbons of `record`, or `None` if it is not a mol
    /// block or the search budget runs out.
    #[must_use]
    pub fn count(&self, record: &Record) -> Option<usize> {
        let mut mol = Molecule::from_record(record).ok()?;
        mol.hydrogenate();
        let chiral = mol.chiral_carbons_bounded(self.max_steps);
        if chiral.is_none() {
            debug!(
                offset = ?record.source_offset(),
                atoms = mol.atoms.len(),
                "chirality search budget exhausted"
            );
        }
        chiral.map(|atoms| atoms.len())
    }
}

impl Default for ChiralCarbonFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_CHIRAL)
    }
}

impl RecordFilter for ChiralCarbonFilter {
    fn accepts(&self, record: &Record) -> bool {
        self.count(record).is_some_and(|count| count >= self.min_chiral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::tests::mol_block;
    use proptest::prelude::*;

    fn padded(prefix: &str, len: usize) -> Record {
        let mut text = String::from(prefix);
        while text.len() < len - 6 {
            text.push('x');
        }
        text.push_str("\n$$$$\n");
        Record::from(text.as_str())
    }

    #[test]
    fn carbon_size_rule() {
        let filter = CarbonSizeFilter::default();

        assert!(!filter.accepts(&Record::from("foo\nbar\n$$$$\n")));
        assert!(filter.accepts(&padded("C", 150)));
        assert!(!filter.accepts(&padded("N", 150)));
        assert!(!filter.accepts(&padded("C", 100)));
        assert!(filter.accepts(&padded("C", 101)));
    }

    #[test]
    fn carbon_size_custom_threshold() {
        let filter = CarbonSizeFilter::new(5);
        assert!(filter.accepts(&Record::from("CC\n$$$$\n")));
    }

    #[test]
    fn closures_are_filters() {
        let short = |record: &Record| record.len() < 10;
        let records = vec![Record::from("a\n$$$$\n"), padded("C", 50)];

        let kept = filter_records(records, &short);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].as_bytes(), b"a\n$$$$\n");
    }

    #[test]
    fn accept_all_keeps_everything() {
        let records = vec![Record::from("a\n$$$$\n"), Record::from("b\n$$$$\n")];
        assert_eq!(filter_records(records.clone(), &AcceptAll), records);
    }

    #[test]
    fn chiral_filter_counts_chiral_carbons() {
        // butan-2-ol has one chiral carbon
        let butanol = Record::from(
            mol_block(
                &["C", "C", "O", "C", "C"],
                &[(1, 2, 1), (2, 3, 1), (2, 4, 1), (4, 5, 1)],
            )
            .as_str(),
        );

        assert!(ChiralCarbonFilter::new(1).accepts(&butanol));
        assert!(!ChiralCarbonFilter::default().accepts(&butanol));
        assert!(!ChiralCarbonFilter::new(1).accepts(&Record::from("not\na\nmol\n$$$$\n")));
    }

    #[test]
    fn chiral_filter_rejects_when_budget_runs_out() {
        let mut elements = Vec::new();
        let mut bonds = Vec::new();
        let n = 12;
        for row in 0..n {
            for col in 0..n {
                elements.push("C");
                let atom = row * n + col + 1;
                if col + 1 < n {
                    bonds.push((atom, atom + 1, 1));
                }
                if row + 1 < n {
                    bonds.push((atom, atom + n, 1));
                }
            }
        }
        let lattice = Record::from(mol_block(&elements, &bonds).as_str());

        let filter = ChiralCarbonFilter::new(0).max_steps(10_000);
        assert_eq!(filter.count(&lattice), None);
        assert!(!filter.accepts(&lattice));
    }

    proptest! {
        #[test]
        fn filter_returns_ordered_subsequence(
            bodies in prop::collection::vec("[A-Cx\n]{0,160}", 0..24)
        ) {
            let records: Vec<Record> = bodies
                .iter()
                .map(|body| Record::from(format!("{body}\n$$$$\n").as_str()))
                .collect();
            let filter = CarbonSizeFilter::default();

            let kept = filter_records(records.clone(), &filter);
            let expected: Vec<Record> = records
                .into_iter()
                .filter(|r| r.contains(b'C') && r.len() > 100)
                .collect();
            prop_assert_eq!(kept, expected);
        }
    }
}
