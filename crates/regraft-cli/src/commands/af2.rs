use crate::cli::Af2Args;
use crate::error::Result;
use regraft::tools::predict::PredictorSettings;
use tracing::info;

pub fn run(args: Af2Args) -> Result<()> {
    let settings = PredictorSettings {
        exe: args.predictor_exe,
        model_type: args.model_type,
        recycles: args.recycles,
        num_models: args.num_models,
        accelerated_relax: args.gpu_relax,
    };

    info!("Running the structure predictor.");
    settings.predict(&args.fasta, &args.out, args.use_templates)?;

    println!("✓ Predictor outputs in: {}", args.out.display());
    Ok(())
}
