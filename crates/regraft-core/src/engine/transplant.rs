use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;

/// How transplanted coordinates combine with the target's existing ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransplantMode {
    /// Target position := source position.
    Replace,
    /// Target position := `(1-alpha)*target + alpha*source` per axis;
    /// 0 keeps the target, 1 takes the source.
    Blend { alpha: f64 },
}

/// Copies or blends per-atom coordinates from a source residue onto a target
/// residue, matching atoms by whitespace-trimmed name.
///
/// Target atoms with no name match in the source are left untouched: partial
/// sidechain mismatches must not fail the whole operation. No atoms are added
/// or removed. Unknown residue IDs make the call a no-op.
pub fn transplant(
    target: &mut MolecularSystem,
    target_residue: ResidueId,
    source: &MolecularSystem,
    source_residue: ResidueId,
    mode: TransplantMode,
) {
    let (Some(target_res), Some(source_res)) =
        (target.residue(target_residue), source.residue(source_residue))
    else {
        return;
    };

    let pairs: Vec<(AtomId, AtomId)> = target_res
        .atoms()
        .iter()
        .filter_map(|&target_atom_id| {
            let name = target.atom(target_atom_id)?.name.trim();
            source_res
                .get_atom_id_by_name(name)
                .map(|source_atom_id| (target_atom_id, source_atom_id))
        })
        .collect();

    for (target_atom_id, source_atom_id) in pairs {
        let Some(source_pos) = source.atom(source_atom_id).map(|a| a.position) else {
            continue;
        };
        let Some(target_atom) = target.atom_mut(target_atom_id) else {
            continue;
        };
        match mode {
            TransplantMode::Replace => target_atom.position = source_pos,
            TransplantMode::Blend { alpha } => {
                let t = target_atom.position;
                target_atom.position = Point3::new(
                    (1.0 - alpha) * t.x + alpha * source_pos.x,
                    (1.0 - alpha) * t.y + alpha * source_pos.y,
                    (1.0 - alpha) * t.z + alpha * source_pos.z,
                );
            }
        }
    }
}
