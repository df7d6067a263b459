use super::error::PipelineError;
use super::read_structure;
use crate::core::models::system::MolecularSystem;
use serde::Serialize;
use std::fs;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Heavy-atom distance below which an inter-residue contact counts as a
/// clash.
pub const CLASH_CUTOFF_ANGSTROMS: f64 = 2.1;

/// Mean per-residue confidence, read from the B-factor column of predicted
/// models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidueConfidence {
    pub chain: char,
    pub resnum: isize,
    pub plddt: f64,
}

/// Summary statistics over the per-residue confidence values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QcReport {
    pub per_residue: Vec<ResidueConfidence>,
    pub clashes: usize,
    pub pae_mean: Option<f64>,
}

impl QcReport {
    pub fn confidence_stats(&self) -> Option<ConfidenceStats> {
        if self.per_residue.is_empty() {
            return None;
        }
        let mut values: Vec<f64> = self.per_residue.iter().map(|r| r.plddt).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        let n = values.len();
        let median = if n % 2 == 1 {
            values[n / 2]
        } else {
            (values[n / 2 - 1] + values[n / 2]) / 2.0
        };
        Some(ConfidenceStats {
            mean: values.iter().sum::<f64>() / n as f64,
            median,
            min: values[0],
            max: values[n - 1],
        })
    }
}

/// Collects mean B-factor per polymer residue, in chain order.
pub fn residue_confidence(system: &MolecularSystem) -> Vec<ResidueConfidence> {
    let mut out = Vec::new();
    for &chain_id in system.chains_in_order() {
        let Some(chain) = system.chain(chain_id) else {
            continue;
        };
        for &residue_id in chain.residues() {
            let Some(residue) = system.residue(residue_id) else {
                continue;
            };
            if !residue.is_polymer() || residue.atoms().is_empty() {
                continue;
            }
            let values: Vec<f64> = residue
                .atoms()
                .iter()
                .filter_map(|&atom_id| system.atom(atom_id))
                .map(|atom| atom.b_factor)
                .collect();
            if values.is_empty() {
                continue;
            }
            out.push(ResidueConfidence {
                chain: chain.id,
                resnum: residue.number,
                plddt: values.iter().sum::<f64>() / values.len() as f64,
            });
        }
    }
    out
}

/// Counts heavy-atom pairs from different residues closer than
/// [`CLASH_CUTOFF_ANGSTROMS`].
pub fn count_clashes(system: &MolecularSystem) -> usize {
    let heavy: Vec<_> = system
        .atoms_iter()
        .filter(|(_, atom)| !atom.is_hydrogen())
        .map(|(_, atom)| (atom.residue_id, atom.position))
        .collect();

    let cutoff_sq = CLASH_CUTOFF_ANGSTROMS * CLASH_CUTOFF_ANGSTROMS;
    let mut clashes = 0;
    for i in 0..heavy.len() {
        for j in (i + 1)..heavy.len() {
            if heavy[i].0 == heavy[j].0 {
                continue;
            }
            if (heavy[i].1 - heavy[j].1).norm_squared() < cutoff_sq {
                clashes += 1;
            }
        }
    }
    clashes
}

/// Reads a predicted-aligned-error document and reduces it to its mean.
///
/// Both shapes the predictor emits are accepted: `{"pae": [[...]]}` and a
/// bare matrix.
pub fn mean_pae(path: &Path) -> Result<Option<f64>, PipelineError> {
    let file = File::open(path)?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .map_err(crate::tools::ToolError::from)?;
    let matrix = match &value {
        serde_json::Value::Object(map) => map.get("pae").cloned(),
        serde_json::Value::Array(_) => Some(value.clone()),
        _ => None,
    };

    let mut sum = 0.0;
    let mut count = 0usize;
    fn accumulate(value: &serde_json::Value, sum: &mut f64, count: &mut usize) {
        match value {
            serde_json::Value::Array(items) => {
                for item in items {
                    accumulate(item, sum, count);
                }
            }
            serde_json::Value::Number(number) => {
                if let Some(v) = number.as_f64() {
                    *sum += v;
                    *count += 1;
                }
            }
            _ => {}
        }
    }
    if let Some(matrix) = matrix {
        accumulate(&matrix, &mut sum, &mut count);
    }

    Ok((count > 0).then(|| sum / count as f64))
}

/// Runs the quality check on a structure file and writes the report bundle
/// into `outdir`: `report.txt`, `plddt_per_residue.csv`, and `pae_mean.txt`
/// when a PAE document was given.
pub fn run(
    structure_path: &Path,
    pae_path: Option<&Path>,
    outdir: &Path,
) -> Result<QcReport, PipelineError> {
    fs::create_dir_all(outdir)?;

    let system = read_structure(structure_path)?;
    let report = QcReport {
        per_residue: residue_confidence(&system),
        clashes: count_clashes(&system),
        pae_mean: match pae_path {
            Some(path) if path.exists() => mean_pae(path)?,
            _ => None,
        },
    };

    write_report_files(&report, outdir)?;
    info!(outdir = %outdir.display(), clashes = report.clashes, "quality check complete");
    Ok(report)
}

fn write_report_files(report: &QcReport, outdir: &Path) -> Result<PathBuf, PipelineError> {
    let report_path = outdir.join("report.txt");
    let mut text = File::create(&report_path)?;
    writeln!(text, "=== Quality Report ===")?;
    match report.confidence_stats() {
        Some(stats) => writeln!(
            text,
            "pLDDT: mean={:.2}, median={:.2}, min={:.2}, max={:.2}",
            stats.mean, stats.median, stats.min, stats.max
        )?,
        None => writeln!(text, "pLDDT: no polymer residues")?,
    }
    if let Some(pae_mean) = report.pae_mean {
        writeln!(text, "PAE:   mean={:.2} (lower is better)", pae_mean)?;
    }
    writeln!(
        text,
        "Clashes (heavy atom, <{:.1}A, inter-residue): {}",
        CLASH_CUTOFF_ANGSTROMS, report.clashes
    )?;

    let mut csv_writer = csv::Writer::from_path(outdir.join("plddt_per_residue.csv"))?;
    csv_writer.write_record(["chain", "resnum", "plddt"])?;
    for residue in &report.per_residue {
        csv_writer.write_record([
            residue.chain.to_string(),
            residue.resnum.to_string(),
            format!("{:.2}", residue.plddt),
        ])?;
    }
    csv_writer.flush()?;

    if let Some(pae_mean) = report.pae_mean {
        fs::write(outdir.join("pae_mean.txt"), format!("{:.3}\n", pae_mean))?;
    }

    Ok(report_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::chain::ChainType;
    use crate::core::models::residue::ResidueKind;
    use nalgebra::Point3;

    fn system_with_bfactors() -> MolecularSystem {
        let mut system = MolecularSystem::new();
        let chain = system.add_chain('A', ChainType::Protein);
        let r1 = system
            .add_residue(chain, 1, "GLY", ResidueKind::Polymer)
            .unwrap();
        let r2 = system
            .add_residue(chain, 2, "ALA", ResidueKind::Polymer)
            .unwrap();

        let mut n = Atom::new("N", r1, Point3::new(0.0, 0.0, 0.0));
        n.b_factor = 80.0;
        let mut ca = Atom::new("CA", r1, Point3::new(10.0, 0.0, 0.0));
        ca.b_factor = 90.0;
        let mut ca2 = Atom::new("CA", r2, Point3::new(20.0, 0.0, 0.0));
        ca2.b_factor = 70.0;
        system.add_atom_to_residue(r1, n).unwrap();
        system.add_atom_to_residue(r1, ca).unwrap();
        system.add_atom_to_residue(r2, ca2).unwrap();
        system
    }

    #[test]
    fn residue_confidence_is_mean_of_atom_bfactors() {
        let system = system_with_bfactors();
        let confidence = residue_confidence(&system);
        assert_eq!(confidence.len(), 2);
        assert_eq!(confidence[0].plddt, 85.0);
        assert_eq!(confidence[1].plddt, 70.0);
    }

    #[test]
    fn confidence_stats_summarize_per_residue_values() {
        let report = QcReport {
            per_residue: vec![
                ResidueConfidence { chain: 'A', resnum: 1, plddt: 60.0 },
                ResidueConfidence { chain: 'A', resnum: 2, plddt: 90.0 },
                ResidueConfidence { chain: 'A', resnum: 3, plddt: 70.0 },
            ],
            clashes: 0,
            pae_mean: None,
        };
        let stats = report.confidence_stats().unwrap();
        assert!((stats.mean - 73.333).abs() < 1e-3);
        assert_eq!(stats.median, 70.0);
        assert_eq!(stats.min, 60.0);
        assert_eq!(stats.max, 90.0);
    }

    #[test]
    fn empty_report_has_no_stats() {
        let report = QcReport {
            per_residue: Vec::new(),
            clashes: 0,
            pae_mean: None,
        };
        assert!(report.confidence_stats().is_none());
    }

    #[test]
    fn count_clashes_flags_close_inter_residue_heavy_pairs() {
        let mut system = MolecularSystem::new();
        let chain = system.add_chain('A', ChainType::Protein);
        let r1 = system
            .add_residue(chain, 1, "GLY", ResidueKind::Polymer)
            .unwrap();
        let r2 = system
            .add_residue(chain, 2, "GLY", ResidueKind::Polymer)
            .unwrap();

        // Two heavy atoms 1.0 A apart across residues: one clash.
        let a = Atom::new("CA", r1, Point3::new(0.0, 0.0, 0.0));
        let b = Atom::new("CA", r2, Point3::new(1.0, 0.0, 0.0));
        // Hydrogen at clash distance: ignored.
        let h = Atom::new("HA", r2, Point3::new(0.5, 0.0, 0.0)).with_element("H");
        // Intra-residue heavy pair at close distance: ignored.
        let c = Atom::new("C", r1, Point3::new(0.5, 0.5, 0.0));
        system.add_atom_to_residue(r1, a).unwrap();
        system.add_atom_to_residue(r2, b).unwrap();
        system.add_atom_to_residue(r2, h).unwrap();
        system.add_atom_to_residue(r1, c).unwrap();

        // CA(r1)-CA(r2) clash plus C(r1)-CA(r2) at ~0.71 A.
        assert_eq!(count_clashes(&system), 2);
    }

    #[test]
    fn distant_atoms_do_not_clash() {
        let system = system_with_bfactors();
        assert_eq!(count_clashes(&system), 0);
    }

    #[test]
    fn mean_pae_accepts_wrapped_and_bare_matrices() {
        let dir = tempfile::tempdir().unwrap();

        let wrapped = dir.path().join("wrapped.json");
        fs::write(&wrapped, r#"{"pae": [[0.0, 2.0], [4.0, 6.0]]}"#).unwrap();
        assert_eq!(mean_pae(&wrapped).unwrap(), Some(3.0));

        let bare = dir.path().join("bare.json");
        fs::write(&bare, "[[1.0, 3.0]]").unwrap();
        assert_eq!(mean_pae(&bare).unwrap(), Some(2.0));

        let unrelated = dir.path().join("unrelated.json");
        fs::write(&unrelated, r#"{"scores": [1.0]}"#).unwrap();
        assert_eq!(mean_pae(&unrelated).unwrap(), None);
    }

    #[test]
    fn run_writes_report_bundle() {
        use crate::core::io::pdb::PdbFile;
        use crate::core::io::traits::StructureFile;

        let dir = tempfile::tempdir().unwrap();
        let structure_path = dir.path().join("model.pdb");
        PdbFile::write_to_path(&system_with_bfactors(), &structure_path).unwrap();

        let pae_path = dir.path().join("pae.json");
        fs::write(&pae_path, r#"{"pae": [[5.0, 7.0]]}"#).unwrap();

        let outdir = dir.path().join("qc");
        let report = run(&structure_path, Some(&pae_path), &outdir).unwrap();

        assert_eq!(report.per_residue.len(), 2);
        assert_eq!(report.pae_mean, Some(6.0));

        let text = fs::read_to_string(outdir.join("report.txt")).unwrap();
        assert!(text.starts_with("=== Quality Report ==="));
        assert!(text.contains("pLDDT: mean="));
        assert!(text.contains("PAE:   mean=6.00"));

        let csv_text = fs::read_to_string(outdir.join("plddt_per_residue.csv")).unwrap();
        assert!(csv_text.starts_with("chain,resnum,plddt"));
        assert!(csv_text.contains("A,1,85.00"));

        let pae_text = fs::read_to_string(outdir.join("pae_mean.txt")).unwrap();
        assert_eq!(pae_text, "6.000\n");
    }
}
