use crate::core::io::fasta::FastaError;
use crate::core::io::pdb::PdbError;
use crate::core::selection::SelectionError;
use crate::engine::error::EngineError;
use crate::tools::ToolError;
use crate::workflows::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Structure file '{path}': {source}", path = path.display())]
    Structure {
        path: PathBuf,
        #[source]
        source: PdbError,
    },

    #[error("Sequence file '{path}': {source}", path = path.display())]
    Sequence {
        path: PathBuf,
        #[source]
        source: FastaError,
    },

    #[error("No rank-1 model matching '{pattern}' under '{dir}'", dir = dir.display())]
    PredictionMissing { dir: PathBuf, pattern: String },

    #[error("Quality report: {0}")]
    Report(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
