//! # REGRAFT Core Library
//!
//! A library for repairing a missing residue span (a "gap") in a protein
//! structure: the gap sequence is predicted with an external
//! structure-prediction model, the prediction is spliced back into the
//! original structure ("grafted"), and the result is optionally relaxed with
//! an external energy minimization.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict layered architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models
//!   (`MolecularSystem`), the residue range/mapping selection grammar, and
//!   structure/sequence I/O utilities.
//!
//! - **[`engine`]: The Logic Core.** Implements the coordinate algorithms:
//!   residue location, per-atom coordinate transplantation, and the grafting
//!   and blending window operations with their exactness invariants.
//!
//! - **[`tools`]: The Collaborator Boundary.** Thin, contract-level wrappers
//!   around the external structure predictor, homology search, and energy
//!   minimizer, plus the hit-report parser.
//!
//! - **[`workflows`]: The Public API.** Ties the layers together into the
//!   multi-stage repair pipeline (prepare, predict, balance, blend, graft,
//!   minimize, quality-check). This is the entry point for end-users.

pub mod core;
pub mod engine;
pub mod tools;
pub mod workflows;
