use super::config::{ConfigError, RepairConfig};
use super::error::PipelineError;
use super::{read_structure, write_structure};
use crate::core::io::fasta::{self, FastaRecord};
use crate::core::models::ids::ChainId;
use crate::core::models::system::MolecularSystem;
use crate::core::selection::{ResidueMapping, ResidueRange};
use crate::engine::error::EngineError;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// One flanked sequence window derived from a repair range.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub range: ResidueRange,
    /// Repair site reported for this window (the range midpoint by default).
    pub site: isize,
    /// First chain-sequence position covered by the window, 1-based.
    pub window_start: isize,
    /// Last chain-sequence position covered by the window, 1-based inclusive.
    pub window_end: isize,
    /// FASTA record name; rank-1 selection narrows by it on multi-window runs.
    pub name: String,
    pub sequence: String,
}

impl WindowSpec {
    pub fn len(&self) -> usize {
        (self.window_end - self.window_start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The mapping implied by this window's placement: the repair range
    /// occupies the predicted positions it holds within the window sequence.
    pub fn derived_mapping(&self) -> ResidueMapping {
        ResidueMapping::new(
            self.range.chain_id,
            self.range.start,
            self.range.end,
            self.range.start - self.window_start + 1,
            self.range.end - self.window_start + 1,
        )
    }
}

/// Artifacts produced by the preparation stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedInputs {
    pub clean_path: PathBuf,
    pub masked_path: PathBuf,
    pub full_fasta_path: PathBuf,
    pub windows_fasta_path: PathBuf,
    pub windows: Vec<WindowSpec>,
}

/// One-letter sequence of a chain's polymer residues, in order.
///
/// Residues with no known one-letter code are written as 'X' so sequence
/// positions stay aligned with residue numbering.
pub fn chain_sequence(system: &MolecularSystem, chain_id: ChainId) -> String {
    let Some(chain) = system.chain(chain_id) else {
        return String::new();
    };
    chain
        .residues()
        .iter()
        .filter_map(|&residue_id| system.residue(residue_id))
        .filter(|residue| residue.is_polymer())
        .map(|residue| residue.one_letter_code().unwrap_or('X'))
        .collect()
}

/// Deletes the polymer residues covered by the ranges, physically creating
/// the gap, then drops any chain left empty.
pub fn mask_ranges(system: &mut MolecularSystem, ranges: &[ResidueRange]) {
    let targets: Vec<_> = system
        .residues_iter()
        .filter(|(_, residue)| {
            residue.is_polymer()
                && system.chain(residue.chain_id).is_some_and(|chain| {
                    ranges
                        .iter()
                        .any(|range| range.contains(chain.id, residue.number))
                })
        })
        .map(|(residue_id, _)| residue_id)
        .collect();
    for residue_id in targets {
        system.remove_residue(residue_id);
    }
    system.remove_empty_chains();
}

/// Derives the flanked windows for every range, validating each against its
/// chain sequence.
///
/// The window spans `[start - flank, end + flank]` clamped to the chain, so
/// the repair range always sits inside it and the derived mapping is valid by
/// construction once the range itself fits the sequence.
pub fn build_windows(
    system: &MolecularSystem,
    ranges: &[ResidueRange],
    sites: &[isize],
    flank: usize,
) -> Result<Vec<WindowSpec>, PipelineError> {
    let flank = flank as isize;
    let mut windows = Vec::with_capacity(ranges.len());

    for (range, &site) in ranges.iter().zip(sites) {
        let chain_id = system
            .find_chain_by_id(range.chain_id)
            .ok_or(EngineError::ChainNotFound {
                chain_id: range.chain_id,
            })?;
        let sequence = chain_sequence(system, chain_id);
        let sequence_len = sequence.len();
        if range.start < 1 || range.end as usize > sequence_len {
            return Err(ConfigError::RangeOutsideSequence {
                range: *range,
                sequence_len,
            }
            .into());
        }

        let window_start = (range.start - flank).max(1);
        let window_end = (range.end + flank).min(sequence_len as isize);
        let window_sequence = sequence[(window_start - 1) as usize..window_end as usize].to_string();

        windows.push(WindowSpec {
            range: *range,
            site,
            window_start,
            window_end,
            name: format!("win_pos{site}_range{window_start}-{window_end}"),
            sequence: window_sequence,
        });
    }

    Ok(windows)
}

/// Checks caller-supplied mappings against the window-derived ones.
///
/// A disagreement is a configuration error: grafting with a mapping that
/// contradicts how the windows were actually built would be a silent wrong
/// repair.
pub fn validate_mappings(
    windows: &[WindowSpec],
    supplied: &[ResidueMapping],
) -> Result<(), ConfigError> {
    for (window, mapping) in windows.iter().zip(supplied) {
        let derived = window.derived_mapping();
        if *mapping != derived {
            return Err(ConfigError::MappingMismatch {
                supplied: *mapping,
                derived,
            });
        }
    }
    Ok(())
}

/// Runs the preparation stage: clean, mask, extract sequences, derive
/// windows, and write every artifact into `<workdir>/prep`.
pub fn run(config: &RepairConfig) -> Result<PreparedInputs, PipelineError> {
    let prep_dir = config.workdir.join("prep");
    fs::create_dir_all(&prep_dir)?;

    let mut clean = read_structure(&config.template)?;
    clean.remove_empty_chains();
    clean.remove_non_polymer_residues();
    clean.remove_empty_chains();
    clean.renumber_polymer_residues(1);

    let clean_path = prep_dir.join("template_clean.pdb");
    write_structure(&clean, &clean_path)?;

    let mut masked = clean.clone();
    mask_ranges(&mut masked, &config.ranges);
    let masked_path = prep_dir.join("template_masked.pdb");
    write_structure(&masked, &masked_path)?;

    let full_records: Vec<FastaRecord> = clean
        .chains_in_order()
        .iter()
        .map(|&chain_id| {
            let id = clean.chain(chain_id).map(|c| c.id).unwrap_or('?');
            FastaRecord::new(id.to_string(), chain_sequence(&clean, chain_id))
        })
        .filter(|record| !record.sequence.is_empty())
        .collect();
    let full_fasta_path = prep_dir.join("full.fasta");
    fasta::write_path(&full_records, &full_fasta_path).map_err(|source| {
        PipelineError::Sequence {
            path: full_fasta_path.clone(),
            source,
        }
    })?;

    let windows = build_windows(&clean, &config.ranges, &config.sites, config.flank)?;
    if let Some(supplied) = &config.mappings {
        validate_mappings(&windows, supplied)?;
    }

    let window_records: Vec<FastaRecord> = windows
        .iter()
        .map(|window| FastaRecord::new(window.name.clone(), window.sequence.clone()))
        .collect();
    let windows_fasta_path = prep_dir.join("windows.fasta");
    fasta::write_path(&window_records, &windows_fasta_path).map_err(|source| {
        PipelineError::Sequence {
            path: windows_fasta_path.clone(),
            source,
        }
    })?;

    info!(
        windows = windows.len(),
        clean = %clean_path.display(),
        "preparation complete"
    );

    Ok(PreparedInputs {
        clean_path,
        masked_path,
        full_fasta_path,
        windows_fasta_path,
        windows,
    })
}
