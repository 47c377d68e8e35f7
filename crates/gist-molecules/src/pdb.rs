//! PDB cut parsing into molecule graphs.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::graph::{Atom, Bond, MoleculeGraph};

/// Turns a PDB file written by the structure toolkit into a graph.
pub trait MoleculeParser: Send + Sync {
    /// `Ok(None)` when the file holds no usable molecule.
    fn parse(&self, path: &Path) -> Result<Option<MoleculeGraph>>;
}

/// Extra distance allowed over the summed covalent radii, in Å.
const BOND_TOLERANCE: f64 = 0.45;

/// Atoms closer than this are overlapping, not bonded.
const MIN_BOND_LENGTH: f64 = 0.4;

const DEFAULT_RADIUS: f64 = 0.8;

/// Reads `ATOM`/`HETATM` records of the first model and infers bonds from
/// covalent radii.
#[derive(Debug, Clone)]
pub struct PdbGraphParser {
    remove_hydrogens: bool,
}

impl Default for PdbGraphParser {
    fn default() -> Self {
        Self {
            remove_hydrogens: true,
        }
    }
}

impl PdbGraphParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hydrogens(mut self, keep: bool) -> Self {
        self.remove_hydrogens = !keep;
        self
    }

    /// `None` for a malformed coordinate record or a file with no heavy atoms.
    pub fn parse_str(&self, text: &str) -> Option<MoleculeGraph> {
        let mut atoms = Vec::new();
        for line in text.lines() {
            if line.starts_with("ENDMDL") {
                break;
            }
            if !(line.starts_with("ATOM") || line.starts_with("HETATM")) {
                continue;
            }
            let Some(atom) = parse_atom_record(line) else {
                warn!("Malformed coordinate record: {line}");
                return None;
            };
            if self.remove_hydrogens && matches!(atom.element.as_str(), "H" | "D") {
                continue;
            }
            atoms.push(atom);
        }
        if atoms.is_empty() {
            return None;
        }
        let bonds = infer_bonds(&atoms);
        debug!(atoms = atoms.len(), bonds = bonds.len(), "Parsed molecule");
        Some(MoleculeGraph { atoms, bonds })
    }
}

impl MoleculeParser for PdbGraphParser {
    fn parse(&self, path: &Path) -> Result<Option<MoleculeGraph>> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.parse_str(&text))
    }
}

fn column(line: &str, start: usize, end: usize) -> Option<&str> {
    let end = end.min(line.len());
    line.get(start..end).map(str::trim)
}

fn parse_atom_record(line: &str) -> Option<Atom> {
    if line.len() < 54 {
        return None;
    }
    let serial = column(line, 6, 11)?.parse().ok()?;
    let name = column(line, 12, 16)?.to_string();
    let residue_name = column(line, 17, 20)?.to_string();
    let chain = column(line, 21, 22)?.to_string();
    let residue_seq = column(line, 22, 26)?.parse().ok()?;
    let x = column(line, 30, 38)?.parse().ok()?;
    let y = column(line, 38, 46)?.parse().ok()?;
    let z = column(line, 46, 54)?.parse().ok()?;

    let element = match column(line, 76, 78) {
        Some(symbol) if !symbol.is_empty() => normalize_element(symbol),
        _ => element_from_name(&name)?,
    };

    Some(Atom {
        serial,
        name,
        element,
        residue_name,
        residue_seq,
        chain,
        hetero: line.starts_with("HETATM"),
        position: [x, y, z],
    })
}

/// `CL` -> `Cl`.
fn normalize_element(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn element_from_name(name: &str) -> Option<String> {
    let letter = name.chars().find(|c| c.is_ascii_alphabetic())?;
    Some(letter.to_ascii_uppercase().to_string())
}

fn covalent_radius(element: &str) -> f64 {
    match element {
        "H" | "D" => 0.31,
        "B" => 0.84,
        "C" => 0.76,
        "N" => 0.71,
        "O" => 0.66,
        "F" => 0.57,
        "Na" => 1.66,
        "Mg" => 1.41,
        "P" => 1.07,
        "S" => 1.05,
        "Cl" => 1.02,
        "K" => 2.03,
        "Ca" => 1.76,
        "Mn" => 1.39,
        "Fe" => 1.32,
        "Zn" => 1.22,
        "Se" => 1.20,
        "Br" => 1.20,
        "I" => 1.39,
        _ => DEFAULT_RADIUS,
    }
}

/// Distance-based bonding over a spatial grid. Only neighboring cells are
/// compared, so the cell edge is the longest possible bond in this molecule.
fn infer_bonds(atoms: &[Atom]) -> Vec<Bond> {
    let radii: Vec<f64> = atoms.iter().map(|a| covalent_radius(&a.element)).collect();
    let max_radius = radii.iter().cloned().fold(DEFAULT_RADIUS, f64::max);
    let grid_size = 2.0 * max_radius + BOND_TOLERANCE;

    let mut grid: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
    for (i, atom) in atoms.iter().enumerate() {
        let [x, y, z] = atom.position;
        let cell = (
            (x / grid_size).floor() as i64,
            (y / grid_size).floor() as i64,
            (z / grid_size).floor() as i64,
        );
        grid.entry(cell).or_default().push(i);
    }

    let mut bonds = Vec::new();
    for (&(cx, cy, cz), members) in &grid {
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(neighbors) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &i in members {
                        for &j in neighbors {
                            if i >= j {
                                continue;
                            }
                            let dist = atoms[i].distance(&atoms[j]);
                            if dist > MIN_BOND_LENGTH
                                && dist <= radii[i] + radii[j] + BOND_TOLERANCE
                            {
                                bonds.push(Bond::new(i, j));
                            }
                        }
                    }
                }
            }
        }
    }
    bonds.sort();
    bonds
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETHANOL: &str = "\
HETATM    1  C1  LIG L   1       0.000   0.000   0.000  1.00  0.00           C
HETATM    2  C2  LIG L   1       1.520   0.000   0.000  1.00  0.00           C
HETATM    3  O1  LIG L   1       2.020   1.350   0.000  1.00  0.00           O
HETATM    4  H1  LIG L   1      -0.500   0.900   0.000  1.00  0.00           H
END
";

    #[test]
    fn test_parse_ligand_cut() {
        let graph = PdbGraphParser::new().parse_str(ETHANOL).unwrap();
        assert_eq!(graph.num_atoms(), 3);
        assert_eq!(graph.bonds, vec![Bond::new(0, 1), Bond::new(1, 2)]);
        assert!(graph.atoms.iter().all(|a| a.hetero && a.chain == "L"));
        assert_eq!(graph.atoms[2].element, "O");
    }

    #[test]
    fn test_keep_hydrogens() {
        let graph = PdbGraphParser::new()
            .with_hydrogens(true)
            .parse_str(ETHANOL)
            .unwrap();
        assert_eq!(graph.num_atoms(), 4);
        assert!(graph.bonds.contains(&Bond::new(0, 3)));
    }

    #[test]
    fn test_empty_and_malformed() {
        let parser = PdbGraphParser::new();
        assert!(parser.parse_str("REMARK nothing here\nEND\n").is_none());
        assert!(parser
            .parse_str("HETATM    1  C1  LIG L   1       0.000   xxxxx   0.000  1.00  0.00           C\n")
            .is_none());
    }

    #[test]
    fn test_element_fallback_and_case() {
        let line = "ATOM      1  CA  ALA A   1      11.104   6.134  -6.504  1.00  0.00";
        let atom = parse_atom_record(line).unwrap();
        assert_eq!(atom.element, "C");
        assert_eq!(atom.residue_seq, 1);
        assert!(atom.is_backbone());
        assert_eq!(normalize_element("CL"), "Cl");
    }

    #[test]
    fn test_first_model_only() {
        let text = format!("MODEL        1\n{ETHANOL}ENDMDL\nMODEL        2\n{ETHANOL}ENDMDL\n");
        let graph = PdbGraphParser::new().parse_str(&text).unwrap();
        assert_eq!(graph.num_atoms(), 3);
    }
}
