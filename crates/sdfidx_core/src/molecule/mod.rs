//! Minimal V2000 molfile model.
//!
//! Only the parts needed for record selection are parsed: atom coordinates
//! and element symbols, and bonds with their order. Property blocks, data
//! items and charges are ignored.

mod chiral;

use crate::error::{CoreError, CoreResult};
use crate::record::Record;

/// An atom from the atom block.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
    /// Element symbol, e.g. `C`, `Cl`.
    pub element: String,
    /// Implicit hydrogen count, filled in by [`Molecule::hydrogenate`].
    pub hydrogen_count: u32,
}

/// A bond from the bond block. Atom indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    /// First atom.
    pub from: usize,
    /// Second atom.
    pub to: usize,
    /// Bond order (1 single, 2 double, 3 triple, 4 aromatic).
    pub order: u32,
}

impl Bond {
    /// Returns the atom on the other side of the bond from `atom`.
    #[must_use]
    pub const fn other(&self, atom: usize) -> usize {
        if self.from == atom {
            self.to
        } else {
            self.from
        }
    }

    /// Returns true if the bond touches `atom`.
    #[must_use]
    pub const fn touches(&self, atom: usize) -> bool {
        self.from == atom || self.to == atom
    }
}

/// A molecule parsed from a mol block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    /// Atoms in file order.
    pub atoms: Vec<Atom>,
    /// Bonds in file order.
    pub bonds: Vec<Bond>,
}

impl Molecule {
    /// Parses the first V2000 mol block in `text`.
    ///
    /// The counts line is the first line with `V2000` in columns 31–39.
    /// Atom lines shorter than 39 columns and bond lines shorter than 12
    /// columns are skipped, as are bonds that reference a missing atom.
    /// Numeric fields that do not parse read as zero.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidMolecule`] if the text has fewer than four
    /// lines, no counts line, or fewer lines than the counts declare.
    pub fn parse(text: &str) -> CoreResult<Self> {
        let normalized = text.replace("\r\n", "\n");
        let lines: Vec<&str> = normalized.split('\n').collect();
        if lines.len() < 4 {
            return Err(CoreError::invalid_molecule("too few lines"));
        }

        let counts_at = lines
            .iter()
            .position(|line| is_counts_line(line))
            .ok_or_else(|| CoreError::invalid_molecule("V2000 counts line not found"))?;

        let counts = lines[counts_at];
        let atom_count = parse_int(field(counts, 0, 3)).max(0) as usize;
        let bond_count = parse_int(field(counts, 3, 6)).max(0) as usize;

        let body = &lines[counts_at + 1..];
        if body.len() < atom_count + bond_count {
            return Err(CoreError::invalid_molecule(format!(
                "expected {atom_count} atom and {bond_count} bond lines, found {}",
                body.len()
            )));
        }

        let atoms: Vec<Atom> = body[..atom_count]
            .iter()
            .filter(|line| line.len() >= 39)
            .map(|line| Atom {
                x: parse_float(field(line, 0, 10)),
                y: parse_float(field(line, 10, 20)),
                z: parse_float(field(line, 20, 30)),
                element: field(line, 31, 34).trim().to_string(),
                hydrogen_count: 0,
            })
            .collect();

        let bonds = body[atom_count..atom_count + bond_count]
            .iter()
            .filter(|line| line.len() >= 12)
            .filter_map(|line| {
                let from = atom_number(field(line, 0, 3), atoms.len())?;
                let to = atom_number(field(line, 3, 6), atoms.len())?;
                Some(Bond {
                    from,
                    to,
                    order: parse_int(field(line, 6, 9)).max(0) as u32,
                })
            })
            .collect();

        Ok(Self { atoms, bonds })
    }

    /// Parses the mol block held by a record.
    ///
    /// # Errors
    ///
    /// See [`Molecule::parse`].
    pub fn from_record(record: &Record) -> CoreResult<Self> {
        Self::parse(&record.text())
    }

    /// Indices of bonds touching `atom`.
    pub fn bonds_of(&self, atom: usize) -> impl Iterator<Item = usize> + '_ {
        self.bonds
            .iter()
            .enumerate()
            .filter(move |(_, bond)| bond.touches(atom))
            .map(|(index, _)| index)
    }

    /// Fills in implicit hydrogen counts from standard valences.
    ///
    /// Carbon has valence 4, nitrogen and phosphorus 3, oxygen and sulfur 2.
    /// Other elements keep their current count.
    pub fn hydrogenate(&mut self) {
        let mut bond_order_sums = vec![0u32; self.atoms.len()];
        for bond in &self.bonds {
            bond_order_sums[bond.from] += bond.order;
            if bond.to != bond.from {
                bond_order_sums[bond.to] += bond.order;
            }
        }

        for (atom, used) in self.atoms.iter_mut().zip(bond_order_sums) {
            let valence: u32 = match atom.element.as_str() {
                "C" => 4,
                "N" | "P" => 3,
                "O" | "S" => 2,
                _ => continue,
            };
            atom.hydrogen_count = valence.saturating_sub(used);
        }
    }

    /// Returns true if `atom` is an explicit hydrogen with a single bond.
    ///
    /// Out-of-range indices return false.
    #[must_use]
    pub fn is_terminal_hydrogen(&self, atom: usize) -> bool {
        self.atoms.get(atom).is_some_and(|a| a.element == "H")
            && self.bonds_of(atom).count() == 1
    }
}

/// Byte columns `start..end` of `line`, clamped to the line length.
fn field(line: &str, start: usize, end: usize) -> &str {
    let bytes = line.as_bytes();
    let end = end.min(bytes.len());
    if start >= end {
        return "";
    }
    std::str::from_utf8(&bytes[start..end]).unwrap_or("")
}

/// True if `V2000` appears in byte columns 30..39, whatever the encoding of
/// the rest of the line.
fn is_counts_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= 39 && bytes[30..39].windows(5).any(|w| w == b"V2000")
}

fn parse_int(field: &str) -> i64 {
    field.trim().parse().unwrap_or(0)
}

fn parse_float(field: &str) -> f64 {
    field.trim().parse().unwrap_or(0.0)
}

/// Converts a 1-based atom number to an index, if it names a parsed atom.
fn atom_number(field: &str, atom_count: usize) -> Option<usize> {
    let number = usize::try_from(parse_int(field)).ok()?;
    (1..=atom_count).contains(&number).then(|| number - 1)
}
