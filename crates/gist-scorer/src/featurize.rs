//! Complex graph to model input.
//!
//! Node order is all ligand atoms followed by all pocket atoms. Edges are
//! stored in both directions.

use gist_molecules::{Atom, ComplexGraph, MoleculeGraph};
use serde::{Deserialize, Serialize};

const ELEMENTS: [&str; 9] = ["C", "N", "O", "S", "F", "P", "Cl", "Br", "I"];
const MAX_DEGREE: usize = 5;
const RESIDUE_CLASSES: usize = 5;

/// Element (9 + other), degree (0..=5), residue class, side, backbone.
pub const NODE_FEATURE_DIM: usize = ELEMENTS.len() + 1 + MAX_DEGREE + 1 + RESIDUE_CLASSES + 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    /// `NODE_FEATURE_DIM` values per node.
    pub x: Vec<Vec<f32>>,
    pub pos: Vec<[f64; 3]>,
    pub edge_index_intra: Vec<[usize; 2]>,
    pub edge_index_inter: Vec<[usize; 2]>,
    pub y: u32,
}

impl GraphData {
    pub fn num_nodes(&self) -> usize {
        self.x.len()
    }
}

pub fn featurize(complex: &ComplexGraph, label: u32, dis_threshold: f64) -> GraphData {
    let num_ligand = complex.ligand.num_atoms();

    let mut x = Vec::with_capacity(num_ligand + complex.pocket.num_atoms());
    let mut pos = Vec::with_capacity(x.capacity());
    for (graph, is_ligand) in [(&complex.ligand, true), (&complex.pocket, false)] {
        for (atom, degree) in graph.atoms.iter().zip(graph.degrees()) {
            x.push(atom_features(atom, degree, is_ligand));
            pos.push(atom.position);
        }
    }

    let mut edge_index_intra = Vec::new();
    push_bonds(&mut edge_index_intra, &complex.ligand, 0);
    push_bonds(&mut edge_index_intra, &complex.pocket, num_ligand);

    let mut edge_index_inter = Vec::new();
    for (i, ligand_atom) in complex.ligand.atoms.iter().enumerate() {
        for (j, pocket_atom) in complex.pocket.atoms.iter().enumerate() {
            if ligand_atom.distance(pocket_atom) < dis_threshold {
                let j = num_ligand + j;
                edge_index_inter.push([i, j]);
                edge_index_inter.push([j, i]);
            }
        }
    }

    GraphData {
        x,
        pos,
        edge_index_intra,
        edge_index_inter,
        y: label,
    }
}

fn push_bonds(edges: &mut Vec<[usize; 2]>, graph: &MoleculeGraph, offset: usize) {
    for bond in &graph.bonds {
        edges.push([bond.a + offset, bond.b + offset]);
        edges.push([bond.b + offset, bond.a + offset]);
    }
}

fn atom_features(atom: &Atom, degree: usize, is_ligand: bool) -> Vec<f32> {
    let mut features = vec![0.0; NODE_FEATURE_DIM];

    let element = ELEMENTS
        .iter()
        .position(|e| *e == atom.element)
        .unwrap_or(ELEMENTS.len());
    features[element] = 1.0;

    let mut offset = ELEMENTS.len() + 1;
    features[offset + degree.min(MAX_DEGREE)] = 1.0;

    offset += MAX_DEGREE + 1;
    let class = if is_ligand {
        RESIDUE_CLASSES - 1
    } else {
        residue_class(&atom.residue_name)
    };
    features[offset + class] = 1.0;

    offset += RESIDUE_CLASSES;
    features[offset] = if is_ligand { 1.0 } else { 0.0 };
    features[offset + 1] = if atom.is_backbone() { 1.0 } else { 0.0 };

    features
}

/// Hydrophobic, polar, positive, negative, other.
fn residue_class(residue: &str) -> usize {
    match residue {
        "ALA" | "VAL" | "LEU" | "ILE" | "MET" | "PHE" | "TRP" | "PRO" | "GLY" => 0,
        "SER" | "THR" | "CYS" | "TYR" | "ASN" | "GLN" => 1,
        "LYS" | "ARG" | "HIS" => 2,
        "ASP" | "GLU" => 3,
        _ => 4,
    }
}
