//! Benchmark utilities.

use rand::seq::SliceRandom;
use rand::Rng;
use sdfidx_testkit::MolBlock;

const ELEMENTS: &[&str] = &["C", "C", "C", "C", "N", "O", "O", "S", "Cl"];

/// Generate a delimiter-terminated record of roughly `size` bytes.
pub fn random_record<R: Rng + ?Sized>(rng: &mut R, size: usize) -> String {
    let mut text = String::with_capacity(size + 6);
    while text.len() < size {
        let line_len = rng.gen_range(8..72).min(size - text.len());
        text.extend((0..line_len).map(|_| char::from(rng.gen_range(b'A'..=b'Z'))));
        text.push('\n');
    }
    text.push_str("$$$$\n");
    text
}

/// Generate the text of a record file with `count` records of about
/// `size` bytes each.
pub fn generate_record_file(count: usize, size: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| random_record(&mut rng, size)).collect()
}

/// Generate a tree-shaped molecule with `atoms` atoms.
pub fn random_molecule<R: Rng + ?Sized>(rng: &mut R, atoms: usize) -> MolBlock {
    let mut block = MolBlock::new("bench");
    for atom in 1..=atoms.max(1) {
        let element = ELEMENTS.choose(rng).copied().unwrap_or("C");
        block = block.atom(element);
        if atom > 1 {
            block = block.bond(rng.gen_range(1..atom), atom, 1);
        }
    }
    block
}

/// Generate the text of a record file holding `count` molecules.
pub fn generate_molecule_file(count: usize, atoms: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| random_molecule(&mut rng, atoms).to_text())
        .collect()
}
