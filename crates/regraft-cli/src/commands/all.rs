use crate::cli::AllArgs;
use crate::commands::parse_sites;
use crate::config::FileConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use regraft::core::selection::parse_ranges;
use regraft::tools::minimize::{MinimizerSettings, Platform};
use regraft::tools::predict::PredictorSettings;
use regraft::tools::search::SearchSettings;
use regraft::workflows::config::{BalanceSettings, RepairConfigBuilder};
use regraft::workflows::progress::ProgressReporter;
use regraft::workflows::repair;
use tracing::info;

pub fn run(args: AllArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    let ranges = parse_ranges(&args.ranges)?;
    let mut builder = RepairConfigBuilder::new()
        .template(args.template.clone())
        .ranges(ranges)
        .predictor(merge_predictor(&args, &file))
        .flank(args.flank.or(file.flank).unwrap_or(25))
        .workdir(args.workdir.clone());

    if let Some(sites) = &args.sites {
        builder = builder.sites(parse_sites(sites)?);
    }
    if let Some(alpha) = args.blend_alpha.or(file.blend_alpha) {
        builder = builder.blend_alpha(alpha);
    }
    if let Some(balance) = merge_balance(&args, &file)? {
        builder = builder.balance(balance);
    }
    if let Some(minimize) = merge_minimize(&args, &file)? {
        builder = builder.minimize(minimize);
    }
    let config = builder.build()?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting the repair pipeline...");
    info!("Invoking the repair workflow.");
    let outcome = repair::run(&config, &reporter)?;

    println!("✓ Repaired model: {}", outcome.final_model.display());
    if let Some(templates) = &outcome.templates {
        println!("✓ Balanced templates: {} hit(s)", templates.templates.len());
    }
    if let Some(stats) = outcome.report.confidence_stats() {
        println!("✓ pLDDT mean {:.2}, clashes {}", stats.mean, outcome.report.clashes);
    }
    Ok(())
}

fn merge_predictor(args: &AllArgs, file: &FileConfig) -> PredictorSettings {
    let from_file = file.predictor.clone().unwrap_or_default();
    let defaults = PredictorSettings::default();
    PredictorSettings {
        exe: args
            .predictor_exe
            .clone()
            .or(from_file.exe)
            .unwrap_or(defaults.exe),
        model_type: args
            .model_type
            .clone()
            .or(from_file.model_type)
            .unwrap_or(defaults.model_type),
        recycles: args.recycles.or(from_file.recycles).unwrap_or(defaults.recycles),
        num_models: args
            .num_models
            .or(from_file.num_models)
            .unwrap_or(defaults.num_models),
        accelerated_relax: args.gpu_relax || from_file.gpu_relax.unwrap_or(false),
    }
}

fn merge_balance(args: &AllArgs, file: &FileConfig) -> Result<Option<BalanceSettings>> {
    let from_file = file.balance.clone().unwrap_or_default();
    if !args.balance && file.balance.is_none() {
        return Ok(None);
    }

    let db_uniref = args
        .db_uniref
        .clone()
        .or(from_file.db_uniref)
        .ok_or_else(|| CliError::Argument("balancing requires --db-uniref".to_string()))?;
    let db_pdb = args
        .db_pdb
        .clone()
        .or(from_file.db_pdb)
        .ok_or_else(|| CliError::Argument("balancing requires --db-pdb".to_string()))?;

    let mut search = SearchSettings::new(db_uniref, db_pdb);
    if let Some(threads) = args.threads.or(from_file.threads) {
        search.threads = threads;
    }
    let mut balance = BalanceSettings::new(search);
    if let Some(top) = args.top.or(from_file.top) {
        balance.top = top;
    }
    Ok(Some(balance))
}

fn merge_minimize(args: &AllArgs, file: &FileConfig) -> Result<Option<MinimizerSettings>> {
    let from_file = file.minimize.clone().unwrap_or_default();
    if !args.minimize && file.minimize.is_none() {
        return Ok(None);
    }

    let platform_text = args.platform.clone().or(from_file.platform);
    let platform = match platform_text {
        Some(text) => text
            .parse::<Platform>()
            .map_err(|e| CliError::Argument(format!("{e}")))?,
        None => Platform::default(),
    };

    let mut settings = MinimizerSettings {
        platform,
        ..MinimizerSettings::default()
    };
    if let Some(exe) = args.minimizer_exe.clone().or(from_file.exe) {
        settings.exe = exe;
    }
    Ok(Some(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn parse_all(argv: &[&str]) -> AllArgs {
        let cli = Cli::parse_from(argv);
        match cli.command {
            Commands::All(args) => args,
            _ => panic!("expected the all subcommand"),
        }
    }

    #[test]
    fn cli_flags_override_file_values() {
        let args = parse_all(&[
            "regraft", "all", "-t", "t.pdb", "-w", "w", "-r", "A:1-5",
            "--model-type", "cli_model", "--recycles", "7",
        ]);
        let file = FileConfig {
            predictor: Some(crate::config::FilePredictor {
                exe: None,
                model_type: Some("file_model".to_string()),
                recycles: Some(1),
                num_models: Some(2),
                gpu_relax: Some(false),
            }),
            ..FileConfig::default()
        };

        let merged = merge_predictor(&args, &file);
        assert_eq!(merged.model_type, "cli_model");
        assert_eq!(merged.recycles, 7);
        assert_eq!(merged.num_models, 2);
    }

    #[test]
    fn balance_requires_both_databases() {
        let args = parse_all(&[
            "regraft", "all", "-t", "t.pdb", "-w", "w", "-r", "A:1-5",
            "--balance", "--db-uniref", "/db/uniref",
        ]);
        let err = merge_balance(&args, &FileConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Argument(_)));
    }

    #[test]
    fn minimize_defaults_to_cpu_platform() {
        let args = parse_all(&[
            "regraft", "all", "-t", "t.pdb", "-w", "w", "-r", "A:1-5", "--minimize",
        ]);
        let settings = merge_minimize(&args, &FileConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(settings.platform, Platform::Cpu);
    }

    #[test]
    fn no_balance_flag_and_no_file_section_disables_balancing() {
        let args = parse_all(&["regraft", "all", "-t", "t.pdb", "-w", "w", "-r", "A:1-5"]);
        assert!(merge_balance(&args, &FileConfig::default()).unwrap().is_none());
    }
}
