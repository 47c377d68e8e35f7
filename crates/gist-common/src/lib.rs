//! gist-common — Shared identity scheme, tables, and errors used across all gist crates.
//!
//! Every stage of the pipeline names its files after the same `(protein, ligand)` pair:
//! job specs and predicted structures use the job id `{protein_id}_{ligand_id}`, complex
//! directories use the separator-free complex id `{protein_id}{ligand_id}`.

pub mod error;
pub mod ids;
pub mod metadata;
pub mod records;

// Re-export commonly used types
pub use error::{GistError, Result};
pub use ids::{ComplexId, JobId, StructureName, JOB_ID_SEPARATOR};
pub use metadata::{read_metadata, write_metadata, MetadataRow};
pub use records::{read_ligands, read_proteins, LigandRecord, ProteinRecord};
