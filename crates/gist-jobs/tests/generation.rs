//! Job files written for a small protein and ligand table.

use gist_common::{LigandRecord, ProteinRecord};
use gist_jobs::JobGenerator;
use serde_json::Value;
use tempfile::tempdir;

#[tokio::test]
async fn test_single_pair_job_file() {
    let out = tempdir().unwrap();
    let proteins = vec![ProteinRecord::new("P1", "MKT")];
    let ligands = vec![LigandRecord::new("L1", "CCO")];

    let report = JobGenerator::new()
        .run(&proteins, &ligands, out.path())
        .await
        .unwrap();
    assert_eq!(report.jobs_written, 1);

    let text = std::fs::read_to_string(out.path().join("P1_L1.json")).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["name"], "P1_L1");
    assert_eq!(value["sequences"][0]["protein"]["sequence"], "MKT");
    assert_eq!(value["sequences"][1]["ligand"]["smiles"], "CCO");
    assert_eq!(value["modelSeeds"], serde_json::json!([1, 2]));
    assert_eq!(value["dialect"], "alphafold3");
    assert_eq!(value["version"], 1);
}

#[tokio::test]
async fn test_cross_product_count_and_idempotence() {
    let out = tempdir().unwrap();
    let proteins: Vec<ProteinRecord> = (0..3)
        .map(|i| ProteinRecord::new(format!("P{i}"), "MKTAYIAK"))
        .collect();
    let ligands: Vec<LigandRecord> = (0..4)
        .map(|i| LigandRecord::new(format!("L{i}"), "C1=CC=CC=C1\\O"))
        .collect();

    let generator = JobGenerator::new();
    let first = generator.run(&proteins, &ligands, out.path()).await.unwrap();
    assert_eq!(first.jobs_written, 12);
    let snapshot: Vec<Vec<u8>> = first
        .files
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();

    let second = generator.run(&proteins, &ligands, out.path()).await.unwrap();
    assert_eq!(first.files, second.files);
    for (path, before) in second.files.iter().zip(snapshot) {
        assert_eq!(std::fs::read(path).unwrap(), before, "{path:?} changed");
    }

    let count = std::fs::read_dir(out.path()).unwrap().count();
    assert_eq!(count, 12);
}

#[tokio::test]
async fn test_smiles_backslash_survives_file() {
    let out = tempdir().unwrap();
    let proteins = vec![ProteinRecord::new("P1", "MKT")];
    let ligands = vec![LigandRecord::new("L1", "F/C=C\\F")];

    JobGenerator::new()
        .run(&proteins, &ligands, out.path())
        .await
        .unwrap();

    let text = std::fs::read_to_string(out.path().join("P1_L1.json")).unwrap();
    assert!(text.contains(r#""smiles": "F/C=C\\F""#));
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["sequences"][1]["ligand"]["smiles"], "F/C=C\\F");
}
