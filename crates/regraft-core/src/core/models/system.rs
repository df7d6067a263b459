use super::atom::Atom;
use super::chain::{Chain, ChainType};
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::{Residue, ResidueKind};
use slotmap::SlotMap;
use std::collections::HashMap;

/// Represents a complete molecular system with atoms, residues, and chains.
///
/// This struct is the central data structure for the repair pipeline. It
/// preserves file order for chains, residues, and atoms (grafting depends on
/// ordered traversal) and maintains lookup maps for chain ids and residue
/// numbers.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Primary storage for atoms using a slot map for stable ID management.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues using a slot map for stable ID management.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains using a slot map for stable ID management.
    chains: SlotMap<ChainId, Chain>,
    /// Chains in file order; the writer and flattening traversals follow this.
    chain_order: Vec<ChainId>,
    /// Lookup map for finding residues by chain ID and residue number.
    residue_id_map: HashMap<(ChainId, isize), ResidueId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn residue_mut(&mut self, id: ResidueId) -> Option<&mut Residue> {
        self.residues.get_mut(id)
    }

    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues.iter()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    pub fn chain_mut(&mut self, id: ChainId) -> Option<&mut Chain> {
        self.chains.get_mut(id)
    }

    /// Returns chain IDs in file order.
    pub fn chains_in_order(&self) -> &[ChainId] {
        &self.chain_order
    }

    /// Finds a chain ID by its single-character identifier.
    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Finds a residue ID by its chain ID and residue number.
    pub fn find_residue_by_id(
        &self,
        chain_id: ChainId,
        residue_number: isize,
    ) -> Option<ResidueId> {
        self.residue_id_map
            .get(&(chain_id, residue_number))
            .copied()
    }

    /// Adds a new chain to the system or returns the existing one.
    ///
    /// Idempotent: if a chain with the given ID already exists, the existing
    /// chain ID is returned without creating a duplicate.
    pub fn add_chain(&mut self, id: char, chain_type: ChainType) -> ChainId {
        if let Some(&existing) = self.chain_id_map.get(&id) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(id, chain_type));
        self.chain_id_map.insert(id, chain_id);
        self.chain_order.push(chain_id);
        chain_id
    }

    /// Adds a new residue to a chain or returns the existing one with the
    /// same `(chain, number)` key.
    ///
    /// Returns `None` if the chain does not exist.
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        name: &str,
        kind: ResidueKind,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, residue_number);

        let residue_id = *self.residue_id_map.entry(key).or_insert_with(|| {
            let residue = Residue::new(residue_number, name, kind, chain_id);
            self.residues.insert(residue)
        });

        if !chain.residues.contains(&residue_id) {
            chain.residues.push(residue_id);
        }

        Some(residue_id)
    }

    /// Adds an atom to a specific residue.
    ///
    /// Returns `None` if the residue does not exist.
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }

        let name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        let residue = self.residues.get_mut(residue_id)?;
        residue.add_atom(&name, atom_id);

        Some(atom_id)
    }

    /// Removes an atom from the system, updating its parent residue.
    pub fn remove_atom(&mut self, atom_id: AtomId) -> Option<Atom> {
        let atom = self.atoms.remove(atom_id)?;
        if let Some(residue) = self.residues.get_mut(atom.residue_id) {
            residue.remove_atom(&atom.name, atom_id);
        }
        Some(atom)
    }

    /// Removes a residue and all its atoms, updating the parent chain and the
    /// residue lookup map.
    pub fn remove_residue(&mut self, residue_id: ResidueId) -> Option<Residue> {
        let residue = self.residues.get(residue_id)?.clone();

        for atom_id in residue.atoms().to_vec() {
            self.remove_atom(atom_id);
        }

        if let Some(chain) = self.chains.get_mut(residue.chain_id) {
            chain.residues.retain(|&id| id != residue_id);
        }

        self.residue_id_map
            .remove(&(residue.chain_id, residue.number));

        self.residues.remove(residue_id)
    }

    /// Removes every chain that no longer contains any residue.
    pub fn remove_empty_chains(&mut self) {
        let empty: Vec<ChainId> = self
            .chain_order
            .iter()
            .copied()
            .filter(|&id| self.chains.get(id).is_none_or(|c| c.residues.is_empty()))
            .collect();
        for chain_id in empty {
            if let Some(chain) = self.chains.remove(chain_id) {
                self.chain_id_map.remove(&chain.id);
            }
            self.chain_order.retain(|&id| id != chain_id);
        }
    }

    /// Removes every ligand and water residue, leaving only the polymer.
    pub fn remove_non_polymer_residues(&mut self) {
        let targets: Vec<ResidueId> = self
            .residues
            .iter()
            .filter(|(_, r)| !r.is_polymer())
            .map(|(id, _)| id)
            .collect();
        for residue_id in targets {
            self.remove_residue(residue_id);
        }
    }

    /// Renumbers the polymer residues of every chain consecutively starting
    /// at `start_at`, rebuilding the residue lookup map.
    ///
    /// Non-polymer residues keep their numbers but stay addressable through
    /// the rebuilt map.
    pub fn renumber_polymer_residues(&mut self, start_at: isize) {
        for &chain_id in &self.chain_order {
            let Some(chain) = self.chains.get(chain_id) else {
                continue;
            };
            let ordered = chain.residues.clone();
            let mut next = start_at;
            for residue_id in ordered {
                let Some(residue) = self.residues.get_mut(residue_id) else {
                    continue;
                };
                if residue.is_polymer() {
                    residue.number = next;
                    next += 1;
                }
            }
        }

        self.residue_id_map.clear();
        for (residue_id, residue) in self.residues.iter() {
            self.residue_id_map
                .insert((residue.chain_id, residue.number), residue_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn two_residue_chain() -> (MolecularSystem, ChainId, ResidueId, ResidueId) {
        let mut system = MolecularSystem::new();
        let chain_id = system.add_chain('A', ChainType::Protein);
        let gly_id = system
            .add_residue(chain_id, 1, "GLY", ResidueKind::Polymer)
            .unwrap();
        let ala_id = system
            .add_residue(chain_id, 2, "ALA", ResidueKind::Polymer)
            .unwrap();
        let n = Atom::new("N", gly_id, Point3::new(0.0, 0.0, 0.0));
        let ca = Atom::new("CA", gly_id, Point3::new(1.4, 0.0, 0.0));
        let ala_ca = Atom::new("CA", ala_id, Point3::new(2.0, 1.0, 0.0));
        system.add_atom_to_residue(gly_id, n).unwrap();
        system.add_atom_to_residue(gly_id, ca).unwrap();
        system.add_atom_to_residue(ala_id, ala_ca).unwrap();
        (system, chain_id, gly_id, ala_id)
    }

    #[test]
    fn system_creation_and_access() {
        let (system, chain_id, gly_id, ala_id) = two_residue_chain();

        assert_eq!(system.atoms_iter().count(), 3);
        assert_eq!(system.residues_iter().count(), 2);
        assert_eq!(system.chains_in_order().len(), 1);
        assert!(system.find_chain_by_id('B').is_none());

        assert_eq!(system.find_residue_by_id(chain_id, 1), Some(gly_id));
        assert_eq!(system.find_residue_by_id(chain_id, 2), Some(ala_id));
        assert_eq!(system.residue(gly_id).unwrap().name, "GLY");
    }

    #[test]
    fn add_chain_is_idempotent() {
        let mut system = MolecularSystem::new();
        let first = system.add_chain('A', ChainType::Protein);
        let second = system.add_chain('A', ChainType::Protein);
        assert_eq!(first, second);
        assert_eq!(system.chains_in_order().len(), 1);
    }

    #[test]
    fn residue_removal_updates_system() {
        let (mut system, chain_id, gly_id, _) = two_residue_chain();

        let removed = system.remove_residue(gly_id).unwrap();
        assert_eq!(removed.name, "GLY");
        assert_eq!(system.residues_iter().count(), 1);
        assert!(system.find_residue_by_id(chain_id, 1).is_none());
        assert_eq!(system.atoms_iter().count(), 1);
        assert_eq!(system.chain(chain_id).unwrap().residues().len(), 1);
    }

    #[test]
    fn remove_empty_chains_drops_emptied_chain() {
        let (mut system, chain_id, gly_id, ala_id) = two_residue_chain();
        system.remove_residue(gly_id);
        system.remove_residue(ala_id);
        system.remove_empty_chains();
        assert!(system.chain(chain_id).is_none());
        assert!(system.find_chain_by_id('A').is_none());
        assert!(system.chains_in_order().is_empty());
    }

    #[test]
    fn remove_non_polymer_residues_keeps_polymer_only() {
        let (mut system, _, _, _) = two_residue_chain();
        let water_chain = system.add_chain('W', ChainType::Water);
        let hoh_id = system
            .add_residue(water_chain, 201, "HOH", ResidueKind::Water)
            .unwrap();
        system
            .add_atom_to_residue(hoh_id, Atom::new("O", hoh_id, Point3::origin()))
            .unwrap();

        system.remove_non_polymer_residues();
        system.remove_empty_chains();

        assert_eq!(system.residues_iter().count(), 2);
        assert!(system.residues_iter().all(|(_, r)| r.is_polymer()));
        assert!(system.find_chain_by_id('W').is_none());
    }

    #[test]
    fn renumber_polymer_residues_renumbers_each_chain_from_start() {
        let mut system = MolecularSystem::new();
        let a = system.add_chain('A', ChainType::Protein);
        system.add_residue(a, 17, "GLY", ResidueKind::Polymer).unwrap();
        system.add_residue(a, 19, "ALA", ResidueKind::Polymer).unwrap();
        let b = system.add_chain('B', ChainType::Protein);
        system.add_residue(b, 5, "SER", ResidueKind::Polymer).unwrap();

        system.renumber_polymer_residues(1);

        let a_first = system.find_residue_by_id(a, 1).unwrap();
        let a_second = system.find_residue_by_id(a, 2).unwrap();
        assert_eq!(system.residue(a_first).unwrap().name, "GLY");
        assert_eq!(system.residue(a_second).unwrap().name, "ALA");
        assert!(system.find_residue_by_id(a, 17).is_none());
        let b_first = system.find_residue_by_id(b, 1).unwrap();
        assert_eq!(system.residue(b_first).unwrap().name, "SER");
    }

    #[test]
    fn chain_order_is_preserved() {
        let mut system = MolecularSystem::new();
        let c = system.add_chain('C', ChainType::Protein);
        let a = system.add_chain('A', ChainType::Protein);
        let b = system.add_chain('B', ChainType::Protein);
        assert_eq!(system.chains_in_order(), &[c, a, b]);
    }
}
