use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "REGRAFT CLI - Repairs missing residue spans in protein structures by predicting the gap and grafting the prediction back into the template.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pick a random contiguous gap on a chain and print its range and site.
    Demo(DemoArgs),
    /// Clean and mask the template, extract sequences, derive repair windows.
    Prep(PrepArgs),
    /// Run the homology search and select top-ranked templates.
    Hhsearch(HhsearchArgs),
    /// Run the external structure predictor on a window FASTA.
    Af2(Af2Args),
    /// Graft predicted coordinates into a template (optionally minimize).
    Graft(GraftArgs),
    /// Quality-check a structure: confidence, clashes, optional PAE.
    Qc(QcArgs),
    /// Run the full repair pipeline end to end.
    All(AllArgs),
}

/// Arguments for the `demo` subcommand.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Input structure to pick a gap on.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Chain to pick the gap on.
    #[arg(long, default_value = "A", value_name = "CHAIN")]
    pub chain: char,

    /// Minimum gap length in residues.
    #[arg(long, default_value_t = 8, value_name = "INT")]
    pub minlen: usize,

    /// Maximum gap length in residues.
    #[arg(long, default_value_t = 20, value_name = "INT")]
    pub maxlen: usize,

    /// Seed for reproducible gap selection.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,
}

/// Arguments for the `prep` subcommand.
#[derive(Args, Debug)]
pub struct PrepArgs {
    /// Raw template structure with the gap region still present.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub template: PathBuf,

    /// Repair ranges, e.g. A:100-120[,B:10-20].
    #[arg(short, long, required = true, value_name = "RANGES")]
    pub ranges: String,

    /// Explicit repair sites, comma-separated, one per range.
    /// Defaults to the integer midpoint of each range.
    #[arg(short, long, value_name = "SITES")]
    pub sites: Option<String>,

    /// Residues of sequence context on each side of a repair region.
    #[arg(short, long, default_value_t = 25, value_name = "INT")]
    pub flank: usize,

    /// Artifact directory.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub out: PathBuf,
}

/// Arguments for the `hhsearch` subcommand.
#[derive(Args, Debug)]
pub struct HhsearchArgs {
    /// Query sequences in FASTA format.
    #[arg(long, required = true, value_name = "PATH")]
    pub fasta: PathBuf,

    /// Sequence database for the MSA build (HHblits).
    #[arg(long = "db-uniref", required = true, value_name = "PATH")]
    pub db_uniref: PathBuf,

    /// Template database for the profile search (HHsearch).
    #[arg(long = "db-pdb", required = true, value_name = "PATH")]
    pub db_pdb: PathBuf,

    /// Output directory.
    #[arg(long, required = true, value_name = "DIR")]
    pub out: PathBuf,

    /// CPU threads handed to both tools.
    #[arg(long, default_value_t = 4, value_name = "INT")]
    pub threads: u32,

    /// How many top-ranked hits to keep.
    #[arg(long, default_value_t = 5, value_name = "INT")]
    pub top: usize,
}

/// Arguments for the `af2` subcommand.
#[derive(Args, Debug)]
pub struct Af2Args {
    /// Window sequences in FASTA format.
    #[arg(long, required = true, value_name = "PATH")]
    pub fasta: PathBuf,

    /// Output directory for ranked model files.
    #[arg(long, required = true, value_name = "DIR")]
    pub out: PathBuf,

    /// Predictor model-type token, passed through verbatim.
    #[arg(long = "model-type", default_value = "alphafold2_ptm", value_name = "NAME")]
    pub model_type: String,

    /// Number of recycling iterations.
    #[arg(long, default_value_t = 3, value_name = "INT")]
    pub recycles: u32,

    /// Number of models to produce per sequence.
    #[arg(long = "num-models", default_value_t = 5, value_name = "INT")]
    pub num_models: u32,

    /// Let the predictor use structural templates.
    #[arg(long = "use-templates")]
    pub use_templates: bool,

    /// Run the predictor's accelerated (GPU) relax.
    #[arg(long = "gpu-relax")]
    pub gpu_relax: bool,

    /// Predictor executable.
    #[arg(long = "predictor-exe", default_value = "colabfold_batch", value_name = "PATH")]
    pub predictor_exe: PathBuf,
}

/// Arguments for the `graft` subcommand.
#[derive(Args, Debug)]
pub struct GraftArgs {
    /// Template structure carrying the residues to overwrite.
    #[arg(long, required = true, value_name = "PATH")]
    pub template: PathBuf,

    /// Predicted structure supplying the coordinates.
    #[arg(long, required = true, value_name = "PATH")]
    pub pred: PathBuf,

    /// Residue mappings, e.g. A:100-130=1-31[,B:..=..].
    #[arg(long = "map", required = true, value_name = "MAPPINGS")]
    pub mappings: String,

    /// Output structure path.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Relax the grafted model with the external minimizer.
    #[arg(long)]
    pub minimize: bool,

    /// Minimizer compute backend (CPU, CUDA, or OpenCL).
    #[arg(long, default_value = "CPU", value_name = "NAME")]
    pub platform: String,

    /// Minimizer executable.
    #[arg(long = "minimizer-exe", default_value = "openmm-minimize", value_name = "PATH")]
    pub minimizer_exe: PathBuf,
}

/// Arguments for the `qc` subcommand.
#[derive(Args, Debug)]
pub struct QcArgs {
    /// Structure to check.
    #[arg(long, required = true, value_name = "PATH")]
    pub structure: PathBuf,

    /// Predicted-aligned-error document (JSON).
    #[arg(long, value_name = "PATH")]
    pub pae: Option<PathBuf>,

    /// Report output directory.
    #[arg(long, required = true, value_name = "DIR")]
    pub outdir: PathBuf,
}

/// Arguments for the `all` subcommand.
#[derive(Args, Debug)]
pub struct AllArgs {
    /// Raw template structure with the gap region still present.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub template: PathBuf,

    /// Artifact directory; each stage writes beneath it.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub workdir: PathBuf,

    /// Repair ranges, e.g. A:100-120[,B:10-20].
    #[arg(short, long, required = true, value_name = "RANGES")]
    pub ranges: String,

    /// Explicit repair sites, comma-separated, one per range.
    #[arg(short, long, value_name = "SITES")]
    pub sites: Option<String>,

    /// Pipeline configuration file in TOML format; CLI flags win over it.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Residues of sequence context on each side of a repair region.
    #[arg(short, long, value_name = "INT")]
    pub flank: Option<usize>,

    /// Predictor model-type token.
    #[arg(long = "model-type", value_name = "NAME")]
    pub model_type: Option<String>,

    /// Number of recycling iterations.
    #[arg(long, value_name = "INT")]
    pub recycles: Option<u32>,

    /// Number of models to produce per sequence.
    #[arg(long = "num-models", value_name = "INT")]
    pub num_models: Option<u32>,

    /// Run the predictor's accelerated (GPU) relax.
    #[arg(long = "gpu-relax")]
    pub gpu_relax: bool,

    /// Predictor executable.
    #[arg(long = "predictor-exe", value_name = "PATH")]
    pub predictor_exe: Option<PathBuf>,

    /// Enable the template-balancing stage (requires the two databases).
    #[arg(long)]
    pub balance: bool,

    /// Sequence database for the MSA build.
    #[arg(long = "db-uniref", value_name = "PATH")]
    pub db_uniref: Option<PathBuf>,

    /// Template database for the profile search.
    #[arg(long = "db-pdb", value_name = "PATH")]
    pub db_pdb: Option<PathBuf>,

    /// CPU threads for the homology search.
    #[arg(long, value_name = "INT")]
    pub threads: Option<u32>,

    /// How many top-ranked hits survive into the template list.
    #[arg(long, value_name = "INT")]
    pub top: Option<usize>,

    /// Blend weight of predicted coordinates (0..1) before grafting.
    #[arg(long = "blend-alpha", value_name = "FLOAT")]
    pub blend_alpha: Option<f64>,

    /// Relax the grafted model with the external minimizer.
    #[arg(long)]
    pub minimize: bool,

    /// Minimizer compute backend (CPU, CUDA, or OpenCL).
    #[arg(long, value_name = "NAME")]
    pub platform: Option<String>,

    /// Minimizer executable.
    #[arg(long = "minimizer-exe", value_name = "PATH")]
    pub minimizer_exe: Option<PathBuf>,
}
