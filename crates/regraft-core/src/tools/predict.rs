use super::{ToolError, run_command};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Filename marker of the predictor's top-ranked model.
///
/// This is the only contract the pipeline has with the predictor's output
/// directory layout.
pub const RANK1_MARKER: &str = "rank_001";

/// Extension of the structure files the predictor emits.
const MODEL_EXTENSION: &str = "pdb";

/// Invocation settings for the external structure predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorSettings {
    /// Predictor executable.
    pub exe: PathBuf,
    /// Model-type token passed through verbatim.
    pub model_type: String,
    /// Number of recycling iterations.
    pub recycles: u32,
    /// Number of models to produce per sequence.
    pub num_models: u32,
    /// Whether to run the accelerated (GPU) relax on the predictor side.
    pub accelerated_relax: bool,
}

impl Default for PredictorSettings {
    fn default() -> Self {
        Self {
            exe: PathBuf::from("colabfold_batch"),
            model_type: "alphafold2_ptm".to_string(),
            recycles: 3,
            num_models: 5,
            accelerated_relax: false,
        }
    }
}

impl PredictorSettings {
    /// Predicts structures for every sequence in `fasta`, writing ranked
    /// model files into `outdir`.
    ///
    /// Round 1 of the pipeline always passes `use_templates = false`; round 2
    /// enables it after the balancing stage has produced a template list.
    pub fn predict(&self, fasta: &Path, outdir: &Path, use_templates: bool) -> Result<(), ToolError> {
        fs::create_dir_all(outdir)?;

        let mut command = Command::new(&self.exe);
        command
            .arg("--model-type")
            .arg(&self.model_type)
            .arg("--num-recycle")
            .arg(self.recycles.to_string())
            .arg("--num-models")
            .arg(self.num_models.to_string());
        if use_templates {
            command.arg("--use-templates");
        }
        if self.accelerated_relax {
            command.arg("--use-gpu-relax");
        }
        command.arg(fasta).arg(outdir);

        run_command(&mut command, &self.exe.to_string_lossy())
    }
}

/// Locates the rank-1 model file in a predictor output directory.
///
/// When `window_name` is given the match is narrowed to files carrying that
/// window's record name, so multi-window runs select per window. Candidates
/// are sorted by name so the result is deterministic. Returns `None` when no
/// file matches; the orchestrator turns that into `PredictionMissing`.
pub fn find_rank1_model(dir: &Path, window_name: Option<&str>) -> Result<Option<PathBuf>, ToolError> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(MODEL_EXTENSION) {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.contains(RANK1_MARKER) {
            continue;
        }
        if let Some(window) = window_name
            && !file_name.contains(window)
        {
            continue;
        }
        candidates.push(path);
    }

    candidates.sort();
    Ok(candidates.into_iter().next())
}
