use super::error::EngineError;
use super::query;
use super::transplant::{TransplantMode, transplant};
use crate::core::models::system::MolecularSystem;
use crate::core::selection::ResidueRange;
use tracing::debug;

/// Blends template and predicted coordinates over plain residue ranges.
///
/// Blending is advisory: it pre-conditions a second prediction round, so
/// partial coverage is acceptable. The predicted index is derived
/// positionally (the `i`-th residue of a range maps to the `i`-th residue of
/// the flattened predicted sequence, 1-based, restarting per range). A
/// missing template residue is skipped, and a range stops early without
/// error once the cursor runs past the end of the predicted sequence. An
/// unknown chain is still an error: there is nothing at all to blend.
pub fn blend(
    template: &mut MolecularSystem,
    predicted: &MolecularSystem,
    ranges: &[ResidueRange],
    alpha: f64,
) -> Result<(), EngineError> {
    let predicted_sequence = query::flatten_polymer_residues(predicted);

    for range in ranges {
        let chain_id = template
            .find_chain_by_id(range.chain_id)
            .ok_or(EngineError::ChainNotFound {
                chain_id: range.chain_id,
            })?;

        debug!(range = %range, alpha, "blending window");

        for (offset, template_resnum) in (range.start..=range.end).enumerate() {
            let predicted_index = offset + 1;
            if predicted_index > predicted_sequence.len() {
                break;
            }
            let Some(template_residue) =
                query::find_polymer_residue(template, chain_id, template_resnum)
            else {
                continue;
            };
            transplant(
                template,
                template_residue,
                predicted,
                predicted_sequence[predicted_index - 1],
                TransplantMode::Blend { alpha },
            );
        }
    }

    Ok(())
}
