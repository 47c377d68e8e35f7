//! Extraction runs against a scripted toolkit standing in for PyMOL.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use gist_common::{read_metadata, ComplexId};
use gist_molecules::{
    ComplexExtractor, ComplexGraph, ExtractError, ExtractionConfig, ExtractionRequest,
    PdbGraphParser, StructureOutcome, StructureToolkit,
};
use tempfile::tempdir;

const LIGAND_PDB: &str = "\
HETATM    1  C1  LIG L   1       0.000   0.000   0.000  1.00  0.00           C
HETATM    2  C2  LIG L   1       1.520   0.000   0.000  1.00  0.00           C
HETATM    3  O1  LIG L   1       2.020   1.350   0.000  1.00  0.00           O
END
";

const POCKET_PDB: &str = "\
ATOM      1  N   ALA A   7       4.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  ALA A   7       5.460   0.000   0.000  1.00  0.00           C
ATOM      3  C   ALA A   7       6.000   1.420   0.000  1.00  0.00           C
ATOM      4  O   ALA A   7       5.300   2.420   0.000  1.00  0.00           O
END
";

#[derive(Default)]
struct ScriptedToolkit {
    missing_chains: HashSet<String>,
    empty_pockets: HashSet<String>,
}

#[async_trait]
impl StructureToolkit for ScriptedToolkit {
    async fn extract(&self, request: &ExtractionRequest<'_>) -> gist_molecules::Result<()> {
        if self.missing_chains.contains(request.ligand_chain) {
            return Err(ExtractError::ChainNotFound {
                structure: request.structure.to_path_buf(),
                chain: request.ligand_chain.to_string(),
                available: vec!["A".to_string()],
            });
        }
        let stem = request
            .structure
            .file_stem()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        let pocket = if self.empty_pockets.contains(&stem) {
            "END\n"
        } else {
            POCKET_PDB
        };
        fs::write(request.ligand_out, LIGAND_PDB)?;
        fs::write(request.pocket_out, pocket)?;
        Ok(())
    }
}

fn structures(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), "data_\n").unwrap();
    }
}

fn labels(metadata: &Path) -> Vec<(String, u32)> {
    read_metadata(metadata)
        .unwrap()
        .into_iter()
        .map(|row| (row.complex_id.to_string(), row.label))
        .collect()
}

#[tokio::test]
async fn test_labels_follow_sorted_order() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    structures(
        input.path(),
        &[
            "P2_L1_model.cif",
            "P1_L2_model.cif",
            "P1_L1_model.cif",
            "P1_L1_seed2.cif",
            "badname.cif",
        ],
    );
    fs::write(input.path().join(".DS_Store"), "").unwrap();

    let extractor = ComplexExtractor::new(
        ScriptedToolkit::default(),
        PdbGraphParser::new(),
        ExtractionConfig::default(),
    );
    let report = extractor.run(input.path(), output.path()).await.unwrap();

    assert_eq!(
        labels(&report.metadata_path),
        vec![
            ("P1L1".to_string(), 0),
            ("P1L2".to_string(), 1),
            ("P2L1".to_string(), 2),
        ]
    );
    assert_eq!(report.outcomes.len(), 5);
    assert!(matches!(
        report.outcomes[1].1,
        StructureOutcome::Skipped { .. }
    ));
    assert!(matches!(
        report.outcomes[4].1,
        StructureOutcome::Failed { .. }
    ));

    let complex_dir = output.path().join("complexes").join("P1L1");
    assert!(complex_dir.join("P1L1_ligand.pdb").is_file());
    assert!(complex_dir.join("P1L1_pocket.pdb").is_file());
    let complex = ComplexGraph::read(&complex_dir.join("P1L1_4A.complex.json"))
        .await
        .unwrap();
    assert_eq!(complex.complex_id, ComplexId::new("P1", "L1"));
    assert_eq!(complex.ligand.num_atoms(), 3);
    assert_eq!(complex.pocket.num_atoms(), 4);
}

#[tokio::test]
async fn test_rejected_complex_is_removed() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    structures(
        input.path(),
        &["P1_L1_model.cif", "P1_L2_model.cif", "P2_L1_model.cif"],
    );

    let toolkit = ScriptedToolkit {
        empty_pockets: HashSet::from(["P1_L2_model".to_string()]),
        ..Default::default()
    };
    let extractor =
        ComplexExtractor::new(toolkit, PdbGraphParser::new(), ExtractionConfig::default());
    let report = extractor.run(input.path(), output.path()).await.unwrap();

    match &report.outcomes[1].1 {
        StructureOutcome::Rejected { reason } => {
            assert!(reason.contains("P1L2_pocket.pdb"), "{reason}");
            assert!(!reason.contains("P1L2_ligand.pdb"), "{reason}");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(!output.path().join("complexes").join("P1L2").exists());
    assert_eq!(
        labels(&report.metadata_path),
        vec![("P1L1".to_string(), 0), ("P2L1".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_missing_chain_aborts_strict_run() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    structures(input.path(), &["P1_L1_model.cif", "P1_L2_model.cif"]);

    let toolkit = ScriptedToolkit {
        missing_chains: HashSet::from(["L1".to_string()]),
        ..Default::default()
    };
    let extractor =
        ComplexExtractor::new(toolkit, PdbGraphParser::new(), ExtractionConfig::default());
    let err = extractor.run(input.path(), output.path()).await.unwrap_err();

    match err {
        ExtractError::ChainNotFound { chain, structure, .. } => {
            assert_eq!(chain, "L1");
            assert!(structure.ends_with("P1_L1_model.cif"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!output.path().join("complexes").join("P1L1").exists());
    assert!(!output.path().join("metadata.csv").exists());
}

#[tokio::test]
async fn test_missing_chain_lenient_run_continues() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    structures(input.path(), &["P1_L1_model.cif", "P1_L2_model.cif"]);

    let toolkit = ScriptedToolkit {
        missing_chains: HashSet::from(["L1".to_string()]),
        ..Default::default()
    };
    let extractor =
        ComplexExtractor::new(toolkit, PdbGraphParser::new(), ExtractionConfig::lenient());
    let report = extractor.run(input.path(), output.path()).await.unwrap();

    assert!(matches!(
        &report.outcomes[0].1,
        StructureOutcome::Failed { error } if error.contains("L1")
    ));
    assert_eq!(labels(&report.metadata_path), vec![("P1L2".to_string(), 0)]);
}

#[tokio::test]
async fn test_colliding_complex_ids_fail_second_pair() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    structures(input.path(), &["P1_1L_model.cif", "P11_L_model.cif"]);

    let extractor = ComplexExtractor::new(
        ScriptedToolkit::default(),
        PdbGraphParser::new(),
        ExtractionConfig::default(),
    );
    let report = extractor.run(input.path(), output.path()).await.unwrap();

    assert!(report.outcomes[0].0.ends_with("P11_L_model.cif"));
    assert!(matches!(
        report.outcomes[0].1,
        StructureOutcome::Accepted { label: 0, .. }
    ));
    match &report.outcomes[1].1 {
        StructureOutcome::Failed { error } => {
            assert!(error.contains("collides with P11_L"), "{error}");
            assert!(!error.contains("already extracted"), "{error}");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(labels(&report.metadata_path), vec![("P11L".to_string(), 0)]);
}
