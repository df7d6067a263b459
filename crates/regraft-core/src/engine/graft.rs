use super::error::EngineError;
use super::query;
use super::transplant::{TransplantMode, transplant};
use crate::core::models::system::MolecularSystem;
use crate::core::selection::ResidueMapping;
use tracing::debug;

/// Grafts predicted coordinates onto the template over the mapped windows.
///
/// This is the authoritative repair, so it is exact: every mapping is
/// processed in list order and any lookup failure aborts the whole operation.
/// A window-length mismatch is a hard stop rather than a clamp, because
/// silently truncating would misalign every subsequent residue. Only 3-D
/// positions change; chain topology, residue count, and numbering are
/// preserved.
pub fn graft(
    template: &mut MolecularSystem,
    predicted: &MolecularSystem,
    mappings: &[ResidueMapping],
) -> Result<(), EngineError> {
    let predicted_sequence = query::flatten_polymer_residues(predicted);

    for mapping in mappings {
        let chain_id = template
            .find_chain_by_id(mapping.chain_id)
            .ok_or(EngineError::ChainNotFound {
                chain_id: mapping.chain_id,
            })?;

        let length = mapping.template_len();
        if length != mapping.pred_len() {
            return Err(EngineError::LengthMismatch {
                chain_id: mapping.chain_id,
                template_len: length,
                predicted_len: mapping.pred_len(),
            });
        }

        debug!(mapping = %mapping, "grafting window");

        for i in 0..length as isize {
            let template_resnum = mapping.template_start + i;
            let predicted_index = mapping.pred_start + i;
            if predicted_index < 1 || predicted_index as usize > predicted_sequence.len() {
                return Err(EngineError::IndexOutOfRange {
                    index: predicted_index,
                    len: predicted_sequence.len(),
                });
            }

            let template_residue = query::find_polymer_residue(template, chain_id, template_resnum)
                .ok_or(EngineError::ResidueNotFound {
                    chain_id: mapping.chain_id,
                    residue_number: template_resnum,
                })?;

            transplant(
                template,
                template_residue,
                predicted,
                predicted_sequence[predicted_index as usize - 1],
                TransplantMode::Replace,
            );
        }
    }

    Ok(())
}
