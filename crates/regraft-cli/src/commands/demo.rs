use crate::cli::DemoArgs;
use crate::error::{CliError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regraft::core::io::pdb::PdbFile;
use regraft::core::io::traits::StructureFile;
use tracing::info;

/// Picks a random contiguous deletion range on a chain and prints the range,
/// its midpoint site, and its length, ready to paste into `prep`/`all`.
pub fn run(args: DemoArgs) -> Result<()> {
    let system = PdbFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    let chain_id = system
        .find_chain_by_id(args.chain)
        .ok_or_else(|| CliError::Argument(format!("chain '{}' not found", args.chain)))?;
    let chain = system
        .chain(chain_id)
        .ok_or_else(|| CliError::Argument(format!("chain '{}' not found", args.chain)))?;
    let resnums: Vec<isize> = chain
        .residues()
        .iter()
        .filter_map(|&id| system.residue(id))
        .filter(|r| r.is_polymer())
        .map(|r| r.number)
        .collect();
    if resnums.is_empty() {
        return Err(CliError::Argument(format!(
            "no polymer residues on chain '{}'",
            args.chain
        )));
    }
    if args.minlen == 0 || args.minlen > args.maxlen {
        return Err(CliError::Argument(format!(
            "invalid gap length bounds {}..{}",
            args.minlen, args.maxlen
        )));
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let length = rng.gen_range(args.minlen..=args.maxlen) as isize;
    let start_min = resnums[0];
    let start_max = resnums[resnums.len() - 1] - length + 1;
    if start_max < start_min {
        return Err(CliError::Argument(format!(
            "chain '{}' is too short for a gap of length {length}",
            args.chain
        )));
    }

    let start = rng.gen_range(start_min..=start_max);
    let end = start + length - 1;
    let center = (start + end).div_euclid(2);

    info!(chain = %args.chain, start, end, "picked random gap");
    println!("RANGE={}:{}-{}", args.chain, start, end);
    println!("SITES={center}");
    println!("LENGTH={length}");
    Ok(())
}
