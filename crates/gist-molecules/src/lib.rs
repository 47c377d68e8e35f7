//! gist-molecules — Complex extraction from predicted structures.
//!
//! For every predicted structure this crate:
//! 1. Cuts out the ligand chain and the residues around it (PyMOL)
//! 2. Parses both cuts into molecule graphs
//! 3. Keeps the complex only if both parse, and assigns it a synthetic label
//! 4. Writes the metadata table that the scorer joins on

pub mod config;
pub mod error;
pub mod extractor;
pub mod graph;
pub mod pdb;
pub mod toolkit;

pub use config::ExtractionConfig;
pub use error::{ExtractError, Result};
pub use extractor::{
    ComplexExtractor, ExtractionReport, StructureOutcome, COMPLEXES_DIR, METADATA_FILE,
};
pub use graph::{Atom, Bond, ComplexGraph, MoleculeGraph};
pub use pdb::{MoleculeParser, PdbGraphParser};
pub use toolkit::{ExtractionRequest, PymolToolkit, StructureToolkit};
