use crate::cli::GraftArgs;
use crate::error::{CliError, Result};
use regraft::core::io::pdb::PdbFile;
use regraft::core::io::traits::StructureFile;
use regraft::core::selection::parse_mappings;
use regraft::engine::graft::graft;
use regraft::tools::minimize::{MinimizerSettings, Platform};
use tracing::info;

pub fn run(args: GraftArgs) -> Result<()> {
    let mappings = parse_mappings(&args.mappings)?;

    let mut template = PdbFile::read_from_path(&args.template).map_err(|e| {
        CliError::FileParsing {
            path: args.template.clone(),
            source: e.into(),
        }
    })?;
    let predicted = PdbFile::read_from_path(&args.pred).map_err(|e| CliError::FileParsing {
        path: args.pred.clone(),
        source: e.into(),
    })?;

    info!(mappings = mappings.len(), "grafting predicted coordinates");
    graft(&mut template, &predicted, &mappings)?;

    if args.minimize {
        let platform: Platform = args
            .platform
            .parse()
            .map_err(|e| CliError::Argument(format!("{e}")))?;
        let minimizer = MinimizerSettings {
            exe: args.minimizer_exe,
            platform,
        };

        let grafted_path = args.output.with_extension("grafted.pdb");
        PdbFile::write_to_path(&template, &grafted_path).map_err(|e| CliError::FileParsing {
            path: grafted_path.clone(),
            source: e.into(),
        })?;
        minimizer.minimize(&grafted_path, &args.output)?;
    } else {
        PdbFile::write_to_path(&template, &args.output).map_err(|e| CliError::FileParsing {
            path: args.output.clone(),
            source: e.into(),
        })?;
    }

    println!("✓ Wrote {}", args.output.display());
    Ok(())
}
