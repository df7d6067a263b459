//! # Core Models Module
//!
//! Data structures used to represent molecular systems, providing the
//! foundation for all grafting and blending operations.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom representation with coordinates and element
//! - [`residue`] - Residue structure and polymer/ligand/water classification
//! - [`chain`] - Chain organization and metadata
//! - [`system`] - Complete molecular system with all components
//! - [`ids`] - Unique identifier types for atoms, residues, and chains

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod system;
