use crate::cli::PrepArgs;
use crate::commands::parse_sites;
use crate::error::Result;
use regraft::core::selection::parse_ranges;
use regraft::workflows::config::RepairConfigBuilder;
use regraft::workflows::prepare;
use tracing::info;

pub fn run(args: PrepArgs) -> Result<()> {
    let ranges = parse_ranges(&args.ranges)?;
    let mut builder = RepairConfigBuilder::new()
        .template(args.template)
        .workdir(args.out)
        .ranges(ranges)
        .flank(args.flank);
    if let Some(sites) = &args.sites {
        builder = builder.sites(parse_sites(sites)?);
    }
    let config = builder.build()?;

    info!("Running the preparation stage.");
    let prepared = prepare::run(&config)?;

    println!("✓ Cleaned template:  {}", prepared.clean_path.display());
    println!("✓ Masked template:   {}", prepared.masked_path.display());
    println!("✓ Full sequence:     {}", prepared.full_fasta_path.display());
    println!("✓ Repair windows:    {}", prepared.windows_fasta_path.display());
    for window in &prepared.windows {
        println!(
            "  {} ({} residues, mapping {})",
            window.name,
            window.len(),
            window.derived_mapping()
        );
    }
    Ok(())
}
