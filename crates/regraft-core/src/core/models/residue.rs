use super::ids::{AtomId, ChainId};
use crate::core::utils::codes;
use std::collections::HashMap;

/// Coarse classification of a residue within a structure.
///
/// Only `Polymer` residues participate in sequence numbering, ranges, and
/// grafting; ligands and waters are background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidueKind {
    Polymer,
    Ligand,
    Water,
}

impl ResidueKind {
    /// Classifies a residue by its three-letter name.
    pub fn classify(name: &str) -> Self {
        if codes::is_water(name) {
            ResidueKind::Water
        } else if codes::is_amino_acid(name) {
            ResidueKind::Polymer
        } else {
            ResidueKind::Ligand
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: isize,                      // Residue sequence number from source file
    pub name: String,                       // Name of the residue (e.g., "ALA", "GLY")
    pub kind: ResidueKind,                  // Polymer / ligand / water classification
    pub chain_id: ChainId,                  // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,          // Atoms belonging to this residue, in file order
    atom_name_map: HashMap<String, AtomId>, // Map from trimmed atom name to its stable ID
}

impl Residue {
    pub(crate) fn new(number: isize, name: &str, kind: ResidueKind, chain_id: ChainId) -> Self {
        Self {
            number,
            name: name.trim().to_string(),
            kind,
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        // First atom with a given name wins; later duplicates (e.g. leftover
        // alternate locations) stay addressable only by iteration order.
        self.atom_name_map
            .entry(atom_name.trim().to_string())
            .or_insert(atom_id);
    }

    pub(crate) fn remove_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.retain(|&id| id != atom_id);
        if self.atom_name_map.get(atom_name.trim()) == Some(&atom_id) {
            self.atom_name_map.remove(atom_name.trim());
        }
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    /// Looks up an atom by its whitespace-trimmed name.
    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name.trim()).copied()
    }

    pub fn is_polymer(&self) -> bool {
        self.kind == ResidueKind::Polymer
    }

    pub fn one_letter_code(&self) -> Option<char> {
        codes::one_letter_code(&self.name)
    }
}
