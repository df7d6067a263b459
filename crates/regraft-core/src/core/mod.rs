//! # Core Module
//!
//! Fundamental building blocks for gap repair: molecular data structures,
//! the residue selection grammar, and file I/O.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains, and
//!   the complete system with stable identifiers
//! - **Selection Grammar** ([`selection`]) - Textual residue ranges and
//!   template-to-prediction residue mappings
//! - **File I/O** ([`io`]) - PDB structure files and FASTA sequence files
//! - **Utilities** ([`utils`]) - Residue-name classification tables

pub mod io;
pub mod models;
pub mod selection;
pub mod utils;
