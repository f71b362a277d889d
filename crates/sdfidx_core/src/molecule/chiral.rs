//! Chiral carbon detection.

use crate::molecule::Molecule;
use std::collections::HashMap;

impl Molecule {
    /// Returns the 0-based indices of all chiral carbons.
    ///
    /// Call [`Molecule::hydrogenate`] first so implicit hydrogens are known.
    /// The work is polynomial in the molecule size but can still be large
    /// for big fused ring systems; see [`Molecule::chiral_carbons_bounded`].
    #[must_use]
    pub fn chiral_carbons(&self) -> Vec<usize> {
        let mut topology = Topology::new(self, None);
        (0..self.atoms.len())
            .filter(|&atom| topology.is_chiral_carbon(atom))
            .collect()
    }

    /// Like [`Molecule::chiral_carbons`], but gives up after `max_steps`
    /// branch comparisons across the whole molecule.
    ///
    /// Returns `None` when the budget runs out.
    #[must_use]
    pub fn chiral_carbons_bounded(&self, max_steps: usize) -> Option<Vec<usize>> {
        let mut topology = Topology::new(self, Some(max_steps));
        let chiral: Vec<usize> = (0..self.atoms.len())
            .filter(|&atom| topology.is_chiral_carbon(atom))
            .collect();
        (!topology.exhausted).then_some(chiral)
    }

    /// Returns true if the atom at `atom` is a chiral carbon.
    ///
    /// Out-of-range indices return false.
    #[must_use]
    pub fn is_chiral_carbon(&self, atom: usize) -> bool {
        atom < self.atoms.len() && Topology::new(self, None).is_chiral_carbon(atom)
    }
}

/// Key of one branch comparison: the bond and far atom on each side, and
/// the remaining depth.
type BranchPair = (usize, usize, usize, usize, i64);

/// A molecule with a per-atom bond list.
///
/// Branch comparisons are memoized per candidate carbon. Ring systems
/// reach the same pair of branches through many paths, and without the
/// memo the walk is exponential in the depth limit.
struct Topology<'a> {
    mol: &'a Molecule,
    adjacency: Vec<Vec<usize>>,
    max_depth: i64,
    memo: HashMap<BranchPair, bool>,
    steps: usize,
    max_steps: Option<usize>,
    exhausted: bool,
}

impl<'a> Topology<'a> {
    fn new(mol: &'a Molecule, max_steps: Option<usize>) -> Self {
        let mut adjacency = vec![Vec::new(); mol.atoms.len()];
        for (index, bond) in mol.bonds.iter().enumerate() {
            adjacency[bond.from].push(index);
            if bond.to != bond.from {
                adjacency[bond.to].push(index);
            }
        }
        let max_depth = 3 + (mol.atoms.len() as f64).sqrt() as i64;
        Self {
            mol,
            adjacency,
            max_depth,
            memo: HashMap::new(),
            steps: 0,
            max_steps,
            exhausted: false,
        }
    }

    fn is_terminal_hydrogen(&self, atom: usize) -> bool {
        self.mol.atoms[atom].element == "H" && self.adjacency[atom].len() == 1
    }

    /// Hydrogens on `atom` and the bonds leading to its heavier neighbours,
    /// leaving out the bond `via` it was reached through.
    fn substituents(&self, atom: usize, via: Option<usize>) -> (u32, Vec<usize>) {
        let mut hydrogens = self.mol.atoms[atom].hydrogen_count;
        let mut branches = Vec::new();

        for &bond in &self.adjacency[atom] {
            if Some(bond) == via {
                continue;
            }
            let neighbour = self.mol.bonds[bond].other(atom);
            if self.is_terminal_hydrogen(neighbour) {
                hydrogens += 1;
            } else {
                branches.push(bond);
            }
        }

        (hydrogens, branches)
    }

    fn is_chiral_carbon(&mut self, atom: usize) -> bool {
        if self.exhausted || self.mol.atoms[atom].element != "C" {
            return false;
        }
        self.memo.clear();

        let (hydrogens, branches) = self.substituents(atom, None);
        match (branches.len(), hydrogens) {
            (4, 0) | (3, 1) => {}
            _ => return false,
        }

        for (i, &first) in branches.iter().enumerate() {
            for &second in &branches[i + 1..] {
                if self.branches_match(atom, atom, first, second, self.max_depth) {
                    return false;
                }
            }
        }
        !self.exhausted
    }

    /// Compares the branch leaving `from_a` through `bond_a` with the branch
    /// leaving `from_b` through `bond_b`.
    ///
    /// Branches count as equal once the depth budget runs out. An exhausted
    /// step budget also reports a match, which unwinds the walk quickly.
    fn branches_match(
        &mut self,
        from_a: usize,
        from_b: usize,
        bond_a: usize,
        bond_b: usize,
        depth: i64,
    ) -> bool {
        if depth < 0 || self.exhausted {
            return true;
        }

        let (a, b) = (self.mol.bonds[bond_a], self.mol.bonds[bond_b]);
        let (next_a, next_b) = (a.other(from_a), b.other(from_b));
        let key = (bond_a, next_a, bond_b, next_b, depth);
        if let Some(&matched) = self.memo.get(&key) {
            return matched;
        }

        self.steps += 1;
        if self.max_steps.is_some_and(|max| self.steps > max) {
            self.exhausted = true;
            return true;
        }

        let matched = a.order == b.order
            && self.substituents_match(next_a, next_b, bond_a, bond_b, depth);
        self.memo.insert(key, matched);
        matched
    }

    /// Compares the atoms at the far end of two branches and, one level
    /// down, every pair of their onward branches.
    fn substituents_match(
        &mut self,
        next_a: usize,
        next_b: usize,
        bond_a: usize,
        bond_b: usize,
        depth: i64,
    ) -> bool {
        if self.mol.atoms[next_a].element != self.mol.atoms[next_b].element {
            return false;
        }

        let (hydrogens_a, branches_a) = self.substituents(next_a, Some(bond_a));
        let (hydrogens_b, branches_b) = self.substituents(next_b, Some(bond_b));
        if hydrogens_a != hydrogens_b || branches_a.len() != branches_b.len() {
            return false;
        }

        for &branch_a in &branches_a {
            let mut found = false;
            for &branch_b in &branches_b {
                if self.branches_match(next_a, next_b, branch_a, branch_b, depth - 1) {
                    found = true;
                    break;
                }
            }
            if !found {
                return false;
            }
        }
        true
    }
}
