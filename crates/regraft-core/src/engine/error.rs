use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EngineError {
    #[error("Chain '{chain_id}' not found in template structure")]
    ChainNotFound { chain_id: char },

    #[error("Template residue {chain_id}:{residue_number} not found")]
    ResidueNotFound {
        chain_id: char,
        residue_number: isize,
    },

    #[error(
        "Window length mismatch for chain '{chain_id}': template {template_len} vs predicted {predicted_len}"
    )]
    LengthMismatch {
        chain_id: char,
        template_len: usize,
        predicted_len: usize,
    },

    #[error("Predicted index {index} out of range (1..={len})")]
    IndexOutOfRange { index: isize, len: usize },
}
