use crate::core::models::ids::{ChainId, ResidueId};
use crate::core::models::system::MolecularSystem;

/// Finds the first polymer residue in a chain with the given sequence number.
///
/// The chain's residues are scanned in file order; non-polymer residues are
/// skipped. The caller decides the policy when no residue matches: blending
/// skips, grafting fails.
pub fn find_polymer_residue(
    system: &MolecularSystem,
    chain_id: ChainId,
    residue_number: isize,
) -> Option<ResidueId> {
    let chain = system.chain(chain_id)?;
    chain.residues().iter().copied().find(|&residue_id| {
        system
            .residue(residue_id)
            .is_some_and(|r| r.is_polymer() && r.number == residue_number)
    })
}

/// Flattens the polymer residues of a structure into one ordered list.
///
/// The list follows chain order, then residue order within each chain. It is
/// the bridge between "position in the predicted window" (1-based) and the
/// actual residue object, and assumes the predictor's output chain order
/// matches window order.
pub fn flatten_polymer_residues(system: &MolecularSystem) -> Vec<ResidueId> {
    let mut flattened = Vec::new();
    for &chain_id in system.chains_in_order() {
        let Some(chain) = system.chain(chain_id) else {
            continue;
        };
        for &residue_id in chain.residues() {
            if system.residue(residue_id).is_some_and(|r| r.is_polymer()) {
                flattened.push(residue_id);
            }
        }
    }
    flattened
}
