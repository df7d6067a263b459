//! # Workflows Module
//!
//! High-level orchestration of the gap-repair pipeline. This is the entry
//! point for end-users of the library.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Pipeline parameters and their builder
//! - **Preparation** ([`prepare`]) - Cleaning, masking, sequence extraction,
//!   and window/mapping derivation
//! - **Repair** ([`repair`]) - The strict forward state machine
//!   `PREPARE -> PREDICT_R1 -> [BALANCE]? -> PREDICT_R2 -> [BLEND]? -> GRAFT
//!   -> MINIMIZE? -> QC`
//! - **Quality Check** ([`qc`]) - Confidence and clash reporting
//! - **Progress Monitoring** ([`progress`]) - Stage reporting callbacks
//! - **Error Handling** ([`error`]) - Pipeline error taxonomy
//!
//! Every stage is a fresh load-mutate-write transaction on the artifact
//! directory; no structure survives a stage boundary in memory. Any stage
//! failure aborts the whole run with no retry and no rollback of artifacts
//! already written.

pub mod config;
pub mod error;
pub mod prepare;
pub mod progress;
pub mod qc;
pub mod repair;

use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::system::MolecularSystem;
use error::PipelineError;
use std::path::Path;

/// Loads a structure, attributing failures to the offending path.
pub(crate) fn read_structure(path: &Path) -> Result<MolecularSystem, PipelineError> {
    PdbFile::read_from_path(path).map_err(|source| PipelineError::Structure {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a structure, attributing failures to the offending path.
pub(crate) fn write_structure(
    system: &MolecularSystem,
    path: &Path,
) -> Result<(), PipelineError> {
    PdbFile::write_to_path(system, path).map_err(|source| PipelineError::Structure {
        path: path.to_path_buf(),
        source,
    })
}
