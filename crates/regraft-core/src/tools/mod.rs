//! # Tools Module
//!
//! Contract-level wrappers around the external collaborators of the repair
//! pipeline: the structure predictor, the homology search pair, and the
//! energy minimizer, plus the parser for the search hit report.
//!
//! Each wrapper only shells out and waits; any internal parallelism (threads,
//! GPU) belongs to the tool and is opaque here beyond the thread/device
//! values passed through. A non-zero exit status from any tool is
//! [`ToolError::ExternalToolFailure`] and aborts the pipeline.

pub mod hhr;
pub mod minimize;
pub mod predict;
pub mod search;

use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to launch '{tool}': {source}")]
    Launch {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("'{tool}' exited with {status}")]
    ExternalToolFailure { tool: String, status: ExitStatus },

    #[error("Failed to encode or decode template list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hit report '{path}' could not be read: {source}", path = path.display())]
    ReportUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Runs an external command to completion, mapping launch failures and
/// non-zero exits to [`ToolError`].
pub(crate) fn run_command(command: &mut Command, tool: &str) -> Result<(), ToolError> {
    info!(tool, command = ?command, "invoking external tool");
    let status = command.status().map_err(|source| ToolError::Launch {
        tool: tool.to_string(),
        source,
    })?;
    if !status.success() {
        return Err(ToolError::ExternalToolFailure {
            tool: tool.to_string(),
            status,
        });
    }
    Ok(())
}
