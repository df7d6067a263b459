use super::config::RepairConfig;
use super::error::PipelineError;
use super::prepare::{self, WindowSpec};
use super::progress::{Progress, ProgressReporter};
use super::qc::{self, QcReport};
use super::{read_structure, write_structure};
use crate::engine::{blend, graft};
use crate::tools::hhr::{self, TemplateList};
use crate::tools::predict;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Final artifacts of a completed repair run.
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    /// The repaired model (minimized when minimization was enabled).
    pub final_model: PathBuf,
    /// Quality-check report for the final model.
    pub report: QcReport,
    /// Template list produced by the balancing stage, when it ran.
    pub templates: Option<TemplateList>,
}

/// Runs the full repair state machine:
/// `PREPARE -> PREDICT_R1 -> [BALANCE]? -> PREDICT_R2 -> [BLEND]? -> GRAFT ->
/// MINIMIZE? -> QC`.
///
/// Stages execute strictly in order; each consumes files written by its
/// predecessor and blocks until its external tool finishes. Any failure
/// aborts the whole run. Round 2 of prediction exists to use the balanced
/// template list, so it runs exactly when balancing ran; otherwise round 1's
/// output feeds the rest of the pipeline.
#[instrument(skip_all, name = "repair_workflow")]
pub fn run(
    config: &RepairConfig,
    reporter: &ProgressReporter,
) -> Result<RepairOutcome, PipelineError> {
    fs::create_dir_all(&config.workdir)?;

    // === PREPARE ===
    reporter.report(Progress::StageStart { name: "prepare" });
    let prepared = prepare::run(config)?;
    reporter.report(Progress::StageFinish);

    // === PREDICT_R1 (always template-free) ===
    reporter.report(Progress::StageStart {
        name: "predict round 1",
    });
    let round1_dir = config.workdir.join("predict_r1");
    config
        .predictor
        .predict(&prepared.windows_fasta_path, &round1_dir, false)?;
    reporter.report(Progress::StageFinish);

    // === BALANCE (optional) ===
    let templates = match &config.balance {
        Some(balance) => {
            reporter.report(Progress::StageStart { name: "balance" });
            let search_dir = config.workdir.join("search");
            let hhr_path = balance
                .search
                .search(&prepared.windows_fasta_path, &search_dir)?;
            let list = hhr::parse_hit_report_path(&hhr_path, balance.top)?;
            list.save(&search_dir.join("templates.json"))?;
            info!(hits = list.templates.len(), "balanced template list ready");
            reporter.report(Progress::StageFinish);
            Some(list)
        }
        None => None,
    };

    // === PREDICT_R2 (template-aware; runs exactly when BALANCE ran) ===
    let model_dir = if templates.is_some() {
        reporter.report(Progress::StageStart {
            name: "predict round 2",
        });
        let round2_dir = config.workdir.join("predict_r2");
        config
            .predictor
            .predict(&prepared.windows_fasta_path, &round2_dir, true)?;
        reporter.report(Progress::StageFinish);
        round2_dir
    } else {
        round1_dir
    };

    // Rank-1 selection, one model per window.
    let rank1_models = select_rank1_models(&model_dir, &prepared.windows)?;
    for model in &rank1_models {
        info!(model = %model.display(), "selected rank-1 model");
    }

    // === BLEND (optional) ===
    let graft_dir = config.workdir.join("graft");
    fs::create_dir_all(&graft_dir)?;
    let mut graft_template = prepared.clean_path.clone();
    if let Some(alpha) = config.blend_alpha {
        reporter.report(Progress::StageStart { name: "blend" });
        let blended_path = graft_dir.join("template_blended.pdb");
        blend_stage(&graft_template, &rank1_models, &prepared.windows, alpha, &blended_path)?;
        graft_template = blended_path;
        reporter.report(Progress::StageFinish);
    }

    // === GRAFT ===
    reporter.report(Progress::StageStart { name: "graft" });
    let grafted_path = graft_dir.join("model_grafted.pdb");
    graft_stage(&graft_template, &rank1_models, &prepared.windows, &grafted_path)?;
    reporter.report(Progress::StageFinish);

    // === MINIMIZE (optional) ===
    let final_model = config.workdir.join("model_repaired.pdb");
    match &config.minimize {
        Some(minimizer) => {
            reporter.report(Progress::StageStart { name: "minimize" });
            minimizer.minimize(&grafted_path, &final_model)?;
            reporter.report(Progress::StageFinish);
        }
        None => {
            fs::copy(&grafted_path, &final_model)?;
        }
    }

    // === QC ===
    reporter.report(Progress::StageStart {
        name: "quality check",
    });
    let qc_dir = config.workdir.join("qc");
    let report = qc::run(&final_model, None, &qc_dir)?;
    reporter.report(Progress::StageFinish);

    info!(final_model = %final_model.display(), "repair pipeline complete");
    Ok(RepairOutcome {
        final_model,
        report,
        templates,
    })
}

/// Selects the rank-1 model for every window.
///
/// With a single window any rank-1 file qualifies; with several, the match is
/// narrowed by window record name. A window with no rank-1 model aborts the
/// pipeline.
pub(crate) fn select_rank1_models(
    model_dir: &Path,
    windows: &[WindowSpec],
) -> Result<Vec<PathBuf>, PipelineError> {
    let mut models = Vec::with_capacity(windows.len());
    for window in windows {
        let narrowed = (windows.len() > 1).then_some(window.name.as_str());
        let found = predict::find_rank1_model(model_dir, narrowed)?;
        let model = found.ok_or_else(|| PipelineError::PredictionMissing {
            dir: model_dir.to_path_buf(),
            pattern: match narrowed {
                Some(name) => format!("*{}*{}*", name, predict::RANK1_MARKER),
                None => format!("*{}*", predict::RANK1_MARKER),
            },
        })?;
        models.push(model);
    }
    Ok(models)
}

/// The blending stage as one load-mutate-write transaction.
fn blend_stage(
    template_path: &Path,
    models: &[PathBuf],
    windows: &[WindowSpec],
    alpha: f64,
    output: &Path,
) -> Result<(), PipelineError> {
    let mut template = read_structure(template_path)?;
    for (window, model) in windows.iter().zip(models) {
        let predicted = read_structure(model)?;
        blend::blend(&mut template, &predicted, &[window.range], alpha)?;
    }
    write_structure(&template, output)
}

/// The grafting stage as one load-mutate-write transaction, using the
/// window-derived mappings.
pub(crate) fn graft_stage(
    template_path: &Path,
    models: &[PathBuf],
    windows: &[WindowSpec],
    output: &Path,
) -> Result<(), PipelineError> {
    let mut template = read_structure(template_path)?;
    for (window, model) in windows.iter().zip(models) {
        let predicted = read_structure(model)?;
        graft::graft(&mut template, &predicted, &[window.derived_mapping()])?;
    }
    write_structure(&template, output)
}
