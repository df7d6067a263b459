//! Input/output for the structure and sequence file formats the pipeline
//! exchanges with its external collaborators.
//!
//! [`pdb`] implements fixed-column PDB reading/writing behind the
//! [`traits::StructureFile`] interface; [`fasta`] covers the sequence files
//! submitted to the predictor and the homology search.

pub mod fasta;
pub mod pdb;
pub mod traits;
