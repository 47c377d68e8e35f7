//! Molecule and complex graphs.
//!
//! A [`ComplexGraph`] is the per-complex artifact the scorer loads:
//! ligand and pocket graphs kept separate, serialized as JSON next to the
//! PDB cuts they were parsed from.

use std::path::Path;

use gist_common::ComplexId;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub serial: u32,
    pub name: String,
    /// Capitalized element symbol, e.g. `C`, `Cl`, `Zn`.
    pub element: String,
    pub residue_name: String,
    pub residue_seq: i32,
    pub chain: String,
    pub hetero: bool,
    pub position: [f64; 3],
}

impl Atom {
    pub fn distance(&self, other: &Atom) -> f64 {
        let [x0, y0, z0] = self.position;
        let [x1, y1, z1] = other.position;
        ((x0 - x1).powi(2) + (y0 - y1).powi(2) + (z0 - z1).powi(2)).sqrt()
    }

    /// Polypeptide backbone atom (`N`, `CA`, `C`, `O`) of a standard residue.
    pub fn is_backbone(&self) -> bool {
        !self.hetero && matches!(self.name.as_str(), "N" | "CA" | "C" | "O")
    }
}

/// Undirected bond between two atom indices, stored with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
}

impl Bond {
    pub fn new(i: usize, j: usize) -> Self {
        if i <= j {
            Self { a: i, b: j }
        } else {
            Self { a: j, b: i }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoleculeGraph {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl MoleculeGraph {
    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Bond count per atom, indexed like `atoms`.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.atoms.len()];
        for bond in &self.bonds {
            degrees[bond.a] += 1;
            degrees[bond.b] += 1;
        }
        degrees
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexGraph {
    pub complex_id: ComplexId,
    /// Interaction distance the complex was cut for, in Å.
    pub cutoff: f64,
    pub ligand: MoleculeGraph,
    pub pocket: MoleculeGraph,
}

impl ComplexGraph {
    pub async fn write(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec(self)?;
        fs::write(path, bytes).await?;
        debug!(
            complex = %self.complex_id,
            ligand_atoms = self.ligand.num_atoms(),
            pocket_atoms = self.pocket.num_atoms(),
            "Wrote complex graph to {:?}",
            path
        );
        Ok(())
    }

    pub async fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
