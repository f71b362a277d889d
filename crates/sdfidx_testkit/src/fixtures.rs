//! Test fixtures and record file helpers.
//!
//! Provides builders for SDF records and mol blocks, and a temporary
//! directory that writes and indexes record files.

use sdfidx_core::{build_index, IndexConfig, OffsetLayout, Record};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Returns `body` followed by a delimiter line.
pub fn plain_record(body: &str) -> String {
    format!("{body}\n$$$$\n")
}

/// Returns a delimiter-terminated record of exactly `len` bytes that
/// starts with `prefix`.
///
/// # Panics
///
/// Panics if `len` cannot hold `prefix` and the delimiter line.
pub fn padded_record(prefix: &str, len: usize) -> String {
    assert!(
        len >= prefix.len() + 6,
        "record of {len} bytes cannot hold {prefix:?}"
    );
    let mut text = String::with_capacity(len);
    text.push_str(prefix);
    while text.len() < len - 6 {
        text.push('x');
    }
    text.push_str("\n$$$$\n");
    text
}

/// Builder for a V2000 mol block record.
#[derive(Debug, Clone, Default)]
pub struct MolBlock {
    name: String,
    elements: Vec<String>,
    bonds: Vec<(usize, usize, u32)>,
    data: Vec<(String, String)>,
}

impl MolBlock {
    /// Creates an empty mol block with a title line.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an atom.
    #[must_use]
    pub fn atom(mut self, element: impl Into<String>) -> Self {
        self.elements.push(element.into());
        self
    }

    /// Adds a bond between 1-based atom numbers.
    #[must_use]
    pub fn bond(mut self, from: usize, to: usize, order: u32) -> Self {
        self.bonds.push((from, to, order));
        self
    }

    /// Adds a `> <key>` data item.
    #[must_use]
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.push((key.into(), value.into()));
        self
    }

    /// Number of atoms.
    pub fn atom_count(&self) -> usize {
        self.elements.len()
    }

    /// Renders the record text, delimiter included.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "{}", self.name);
        text.push_str("  sdfidx\n\n");
        let _ = writeln!(
            text,
            "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
            self.elements.len(),
            self.bonds.len()
        );
        for (i, element) in self.elements.iter().enumerate() {
            let _ = writeln!(
                text,
                "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
                i as f64 * 1.5,
                0.0,
                0.0,
                element
            );
        }
        for (from, to, order) in &self.bonds {
            let _ = writeln!(text, "{from:>3}{to:>3}{order:>3}  0");
        }
        text.push_str("M  END\n");
        for (key, value) in &self.data {
            let _ = write!(text, "> <{key}>\n{value}\n\n");
        }
        text.push_str("$$$$\n");
        text
    }

    /// Renders the mol block as a [`Record`].
    pub fn to_record(&self) -> Record {
        Record::from(self.to_text().as_str())
    }
}

/// Butan-2-ol: one chiral carbon (atom 2).
pub fn butan_2_ol() -> MolBlock {
    MolBlock::new("butan-2-ol")
        .atom("C")
        .atom("C")
        .atom("O")
        .atom("C")
        .atom("C")
        .bond(1, 2, 1)
        .bond(2, 3, 1)
        .bond(2, 4, 1)
        .bond(4, 5, 1)
}

/// 5-chloropentane-2,3,4-triol: three chiral carbons (atoms 2, 3 and 4).
pub fn chloropentanetriol() -> MolBlock {
    MolBlock::new("5-chloropentane-2,3,4-triol")
        .atom("C")
        .atom("C")
        .atom("C")
        .atom("C")
        .atom("C")
        .atom("O")
        .atom("O")
        .atom("O")
        .atom("Cl")
        .bond(1, 2, 1)
        .bond(2, 3, 1)
        .bond(3, 4, 1)
        .bond(4, 5, 1)
        .bond(2, 6, 1)
        .bond(3, 7, 1)
        .bond(4, 8, 1)
        .bond(5, 9, 1)
}

/// A temporary directory for record and index files, removed on drop.
pub struct TestRecordDir {
    dir: TempDir,
}

impl TestRecordDir {
    /// Creates a new temporary directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the path of `name` inside the directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes raw bytes to `name`.
    pub fn write_raw(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.file(name);
        std::fs::write(&path, bytes).expect("Failed to write file");
        path
    }

    /// Writes the concatenation of `records` to `<stem>.sdf`.
    pub fn write_records<S: AsRef<str>>(&self, stem: &str, records: &[S]) -> PathBuf {
        let text: String = records.iter().map(AsRef::as_ref).collect();
        self.write_raw(&format!("{stem}.sdf"), text.as_bytes())
    }

    /// Writes `records` to `<stem>.sdf` and indexes it to `<stem>.index`
    /// with the default layout.
    pub fn indexed<S: AsRef<str>>(&self, stem: &str, records: &[S]) -> (PathBuf, PathBuf) {
        self.indexed_with(stem, records, OffsetLayout::RecordStarts)
    }

    /// Like [`TestRecordDir::indexed`] with an explicit layout.
    pub fn indexed_with<S: AsRef<str>>(
        &self,
        stem: &str,
        records: &[S],
        layout: OffsetLayout,
    ) -> (PathBuf, PathBuf) {
        let record_path = self.write_records(stem, records);
        let index_path = self.file(&format!("{stem}.index"));
        build_index(&record_path, &index_path, &IndexConfig::new().layout(layout))
            .expect("Failed to build index");
        (record_path, index_path)
    }

    /// Reads a file in the directory.
    pub fn read(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.file(name)).expect("Failed to read file")
    }
}

impl Default for TestRecordDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a test with a temporary record directory.
///
/// # Example
///
/// ```rust,ignore
/// use sdfidx_testkit::{plain_record, with_temp_dir};
///
/// #[test]
/// fn my_test() {
///     with_temp_dir(|dir| {
///         let (records, index) = dir.indexed("a", &[plain_record("foo")]);
///         // ... test operations
///     });
/// }
/// ```
pub fn with_temp_dir<F, R>(f: F) -> R
where
    F: FnOnce(&TestRecordDir) -> R,
{
    let dir = TestRecordDir::new();
    f(&dir)
}
