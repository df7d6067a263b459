use crate::cli::HhsearchArgs;
use crate::error::Result;
use regraft::tools::hhr;
use regraft::tools::search::SearchSettings;
use tracing::info;

pub fn run(args: HhsearchArgs) -> Result<()> {
    let mut settings = SearchSettings::new(args.db_uniref, args.db_pdb);
    settings.threads = args.threads;

    info!("Running the homology search.");
    let hhr_path = settings.search(&args.fasta, &args.out)?;

    let list = hhr::parse_hit_report_path(&hhr_path, args.top)?;
    let json_path = args.out.join("templates.json");
    list.save(&json_path)?;

    println!("✓ Hit report:    {}", hhr_path.display());
    println!(
        "✓ Template list: {} ({} hit(s))",
        json_path.display(),
        list.templates.len()
    );
    Ok(())
}
