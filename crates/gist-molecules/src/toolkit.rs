//! Structure toolkit: chain and pocket cuts from a predicted structure.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{ExtractError, Result};

/// One structure's worth of cutting work.
#[derive(Debug, Clone)]
pub struct ExtractionRequest<'a> {
    pub structure: &'a Path,
    pub ligand_chain: &'a str,
    /// Residues with any atom within this distance of the ligand chain, in Å.
    pub pocket_radius: f64,
    pub ligand_out: &'a Path,
    pub pocket_out: &'a Path,
}

/// Writes the ligand chain and its pocket as two PDB files.
///
/// Waters and hydrogens are removed before selection. A structure without
/// the requested chain yields [`ExtractError::ChainNotFound`].
#[async_trait]
pub trait StructureToolkit: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest<'_>) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct ScriptStatus {
    chains: Vec<String>,
    found: bool,
}

/// Headless PyMOL (`pymol -cq script.py`).
pub struct PymolToolkit {
    executable_path: PathBuf,
}

impl Default for PymolToolkit {
    fn default() -> Self {
        Self::new("pymol")
    }
}

impl PymolToolkit {
    pub fn new<P: AsRef<Path>>(executable_path: P) -> Self {
        Self {
            executable_path: executable_path.as_ref().to_path_buf(),
        }
    }

    fn script(request: &ExtractionRequest<'_>, status_path: &Path) -> Result<String> {
        // JSON string literals are valid Python string literals.
        let structure = serde_json::to_string(&request.structure.to_string_lossy())?;
        let chain = serde_json::to_string(request.ligand_chain)?;
        let ligand_out = serde_json::to_string(&request.ligand_out.to_string_lossy())?;
        let pocket_out = serde_json::to_string(&request.pocket_out.to_string_lossy())?;
        let status = serde_json::to_string(&status_path.to_string_lossy())?;
        let radius = request.pocket_radius;

        Ok(format!(
            r#"import json
from pymol import cmd

cmd.load({structure}, "complex")
cmd.remove("resn HOH")
cmd.remove("hydrogens")
chains = cmd.get_chains("complex")
found = {chain} in chains
if found:
    cmd.select("ligand", "complex and chain " + {chain})
    cmd.select("pocket", "byres (ligand around {radius})")
    cmd.save({ligand_out}, "ligand")
    cmd.save({pocket_out}, "pocket")
with open({status}, "w") as handle:
    json.dump({{"chains": chains, "found": found}}, handle)
cmd.quit()
"#
        ))
    }
}

#[async_trait]
impl StructureToolkit for PymolToolkit {
    async fn extract(&self, request: &ExtractionRequest<'_>) -> Result<()> {
        info!(
            "Extracting chain {} and {} Å pocket from {:?}",
            request.ligand_chain, request.pocket_radius, request.structure
        );

        let scratch = tempfile::tempdir()?;
        let script_path = scratch.path().join("extract.py");
        let status_path = scratch.path().join("status.json");
        fs::write(&script_path, Self::script(request, &status_path)?).await?;

        let output = Command::new(&self.executable_path)
            .arg("-cq")
            .arg(&script_path)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Toolkit {
                structure: request.structure.to_path_buf(),
                message: stderr.trim().to_string(),
            });
        }

        let status: ScriptStatus = match fs::read(&status_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(_) => {
                return Err(ExtractError::Toolkit {
                    structure: request.structure.to_path_buf(),
                    message: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                })
            }
        };

        if !status.found {
            return Err(ExtractError::ChainNotFound {
                structure: request.structure.to_path_buf(),
                chain: request.ligand_chain.to_string(),
                available: status.chains,
            });
        }

        for out in [request.ligand_out, request.pocket_out] {
            if !out.is_file() {
                return Err(ExtractError::Toolkit {
                    structure: request.structure.to_path_buf(),
                    message: format!("expected output not written: {out:?}"),
                });
            }
        }

        debug!("PyMOL wrote {:?} and {:?}", request.ligand_out, request.pocket_out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_quotes_paths() {
        let request = ExtractionRequest {
            structure: Path::new("/data/P1_L1_model.cif"),
            ligand_chain: "L1",
            pocket_radius: 5.0,
            ligand_out: Path::new("/out/P1L1/P1L1_ligand.pdb"),
            pocket_out: Path::new("/out/P1L1/P1L1_pocket.pdb"),
        };
        let script = PymolToolkit::script(&request, Path::new("/tmp/status.json")).unwrap();
        assert!(script.contains(r#"cmd.load("/data/P1_L1_model.cif", "complex")"#));
        assert!(script.contains(r#"found = "L1" in chains"#));
        assert!(script.contains("byres (ligand around 5)"));
        assert!(script.contains(r#"cmd.save("/out/P1L1/P1L1_pocket.pdb", "pocket")"#));
        assert!(script.contains(r#"json.dump({"chains": chains, "found": found}, handle)"#));
    }

    #[tokio::test]
    async fn test_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let structure = dir.path().join("P1_L1_model.cif");
        let ligand_out = dir.path().join("l.pdb");
        let pocket_out = dir.path().join("p.pdb");
        let request = ExtractionRequest {
            structure: &structure,
            ligand_chain: "L1",
            pocket_radius: 5.0,
            ligand_out: &ligand_out,
            pocket_out: &pocket_out,
        };
        let toolkit = PymolToolkit::new(dir.path().join("no-such-pymol"));
        assert!(matches!(
            toolkit.extract(&request).await,
            Err(ExtractError::Io(_))
        ));
    }
}
