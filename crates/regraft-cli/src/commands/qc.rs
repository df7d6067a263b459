use crate::cli::QcArgs;
use crate::error::Result;
use regraft::workflows::qc;
use tracing::info;

pub fn run(args: QcArgs) -> Result<()> {
    info!("Running the quality check.");
    let report = qc::run(&args.structure, args.pae.as_deref(), &args.outdir)?;

    match report.confidence_stats() {
        Some(stats) => println!(
            "✓ pLDDT mean {:.2} (median {:.2}, range {:.2}..{:.2})",
            stats.mean, stats.median, stats.min, stats.max
        ),
        None => println!("✓ No polymer residues to score."),
    }
    if let Some(pae_mean) = report.pae_mean {
        println!("✓ PAE mean {:.2}", pae_mean);
    }
    println!("✓ Clashes: {}", report.clashes);
    println!("✓ Report written to: {}", args.outdir.display());
    Ok(())
}
