//! Property-based test generators using proptest.
//!
//! Provides strategies for record files and mol blocks that keep the
//! record format intact: bodies never contain the delimiter.

use crate::fixtures::{plain_record, MolBlock};
use proptest::prelude::*;

/// Strategy for a record body: a few lines of text without `$`.
pub fn record_body_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::string::string_regex("[A-Za-z0-9 .>< -]{0,60}").expect("Invalid regex"),
        1..8,
    )
    .prop_map(|lines| lines.join("\n"))
}

/// Strategy for one delimiter-terminated record.
pub fn record_strategy() -> impl Strategy<Value = String> {
    record_body_strategy().prop_map(|body| plain_record(&body))
}

/// Strategy for the records of a whole file.
pub fn record_file_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(record_strategy(), 0..24)
}

/// Strategy for an element symbol used in generated molecules.
pub fn element_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["C", "C", "C", "N", "O", "S", "F", "Cl", "Br"])
}

/// Strategy for a tree-shaped molecule: each atom after the first is bonded
/// to an earlier one.
pub fn molecule_strategy() -> impl Strategy<Value = MolBlock> {
    (
        element_strategy(),
        prop::collection::vec((element_strategy(), any::<prop::sample::Index>()), 0..16),
    )
        .prop_map(|(first, rest)| {
            let mut block = MolBlock::new("generated").atom(first);
            for (i, (element, parent)) in rest.into_iter().enumerate() {
                let atom = i + 2;
                block = block
                    .atom(element)
                    .bond(parent.index(atom - 1) + 1, atom, 1);
            }
            block
        })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
